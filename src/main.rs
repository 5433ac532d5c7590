use std::env;
use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use actix_web::http::Method;
use actix_web::{get, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use log::{error, info};

use catalog::{Catalog, CatalogError};
use code::{RunRequest, RunResponse};
use runner::{JavaRunner, OutcomeKind, Runner};

mod catalog;
mod code;
mod runner;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CATALOG_PATH: &str = "catalog.json";

fn get_server_port() -> u16 {
    env::var("APP_PORT")
        .unwrap_or_else(|_| DEFAULT_PORT.to_string())
        .parse()
        .unwrap_or(DEFAULT_PORT)
}

fn get_catalog_path() -> PathBuf {
    env::var("CATALOG_PATH")
        .unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string())
        .into()
}

// Keeps the underlying kind for I/O failures (a missing file stays
// NotFound); only parse failures become InvalidData.
fn startup_error(err: CatalogError) -> io::Error {
    match err {
        CatalogError::Io(err) => err,
        parse => io::Error::new(io::ErrorKind::InvalidData, parse),
    }
}

#[get("/sections/")]
async fn get_sections(catalog: web::Data<Catalog>) -> impl Responder {
    HttpResponse::Ok().json(catalog.sections())
}

#[get("/topics/{section_id}/")]
async fn get_topics(catalog: web::Data<Catalog>, path: web::Path<i64>) -> impl Responder {
    HttpResponse::Ok().json(catalog.topics_of(path.into_inner()))
}

#[get("/questions/{topic_id}/")]
async fn get_questions(catalog: web::Data<Catalog>, path: web::Path<i64>) -> impl Responder {
    HttpResponse::Ok().json(catalog.questions_of(path.into_inner()))
}

// Registered for every method: the endpoint answers 200 with explanatory
// text instead of an HTTP error, whatever goes wrong. The body is parsed by
// hand for the same reason, a malformed body must not become a 400.
async fn run_java(
    runner: web::Data<JavaRunner>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    if req.method() != Method::POST {
        return HttpResponse::Ok().json(RunResponse {
            output: "Invalid request method".to_string(),
        });
    }

    let request: RunRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            return HttpResponse::Ok().json(RunResponse {
                output: format!("Invalid request body: {}", err),
            })
        }
    };

    let outcome = runner.run(&request.code);
    match outcome.kind {
        OutcomeKind::Success => info!("run finished: success"),
        kind => info!("run finished: {:?}", kind),
    }
    HttpResponse::Ok().json(RunResponse {
        output: outcome.text,
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let catalog_path = get_catalog_path();
    let catalog = match Catalog::load(&catalog_path) {
        Ok(catalog) => web::Data::new(catalog),
        Err(err) => {
            error!("failed to load catalog {}: {}", catalog_path.display(), err);
            return Err(startup_error(err));
        }
    };
    let runner = web::Data::new(Runner::java());

    let port = get_server_port();
    info!("listening on {}:{}", Ipv4Addr::UNSPECIFIED, port);
    HttpServer::new(move || {
        App::new()
            .app_data(catalog.clone())
            .app_data(runner.clone())
            .service(get_sections)
            .service(get_topics)
            .service(get_questions)
            .service(web::resource("/run-java/").to(run_java))
    })
    .bind((Ipv4Addr::UNSPECIFIED, port))?
    .run()
    .await
}
