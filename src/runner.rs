use std::env::temp_dir;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use uuid::Uuid;

lazy_static::lazy_static! {
    pub static ref TMPDIR: PathBuf = {
        let mut dir = temp_dir();
        dir.push("masterclass");
        dir
    };
}

/// Fixed filename the Java entry-point convention requires. The submitted
/// source is assumed (not verified) to declare a public class `Main`.
const SOURCE_FILE: &str = "Main.java";
const ENTRY_POINT: &str = "Main";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    CompileError,
    RuntimeError,
    InfraError,
}

/// Tagged result of one execution request. Only `text` crosses the wire;
/// the kind is for logging and tests.
#[derive(Debug)]
pub struct RunOutcome {
    pub kind: OutcomeKind,
    pub text: String,
}

impl RunOutcome {
    fn new(kind: OutcomeKind, text: impl Into<String>) -> Self {
        RunOutcome {
            kind,
            text: text.into(),
        }
    }
}

/// Captured streams and status of a finished subprocess, decoded lossily so
/// non-UTF-8 output never aborts a request.
#[derive(Debug)]
pub struct Captured {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Captured {
    fn from(out: std::process::Output) -> Self {
        Captured {
            success: out.status.success(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        }
    }
}

/// Compile capability: turn the source file in `workspace` into something
/// the paired `Executor` can run. Blocking.
pub trait Compiler: Send + Sync {
    fn compile(&self, workspace: &Path, source: &Path) -> io::Result<Captured>;
}

/// Execute capability: run the compiled entry point with `workspace` as its
/// classpath/module root. Blocking.
pub trait Executor: Send + Sync {
    fn execute(&self, workspace: &Path) -> io::Result<Captured>;
}

/// `javac`, located via the ambient search path.
pub struct Javac;

impl Compiler for Javac {
    fn compile(&self, workspace: &Path, source: &Path) -> io::Result<Captured> {
        Command::new("javac")
            .arg(source)
            .current_dir(workspace)
            .output()
            .map(Captured::from)
    }
}

/// `java`, located via the ambient search path.
pub struct Java;

impl Executor for Java {
    fn execute(&self, workspace: &Path) -> io::Result<Captured> {
        Command::new("java")
            .arg("-cp")
            .arg(workspace)
            .arg(ENTRY_POINT)
            .current_dir(workspace)
            .output()
            .map(Captured::from)
    }
}

/// Ephemeral per-request directory under [`TMPDIR`]. Removed on drop, so
/// teardown happens on every exit path of a run, early returns and panics
/// included.
struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    fn create() -> io::Result<Workspace> {
        let mut dir = TMPDIR.clone();
        dir.push(Uuid::new_v4().to_string());
        fs::create_dir_all(&dir)?;
        debug!("created workspace {}", dir.display());
        Ok(Workspace { dir })
    }

    fn write_source(&self, code: &str) -> io::Result<PathBuf> {
        let path = self.dir.join(SOURCE_FILE);
        let mut file = File::create(&path)?;
        file.write_all(code.as_bytes())?;
        Ok(path)
    }

    fn path(&self) -> &Path {
        &self.dir
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_dir_all(&self.dir) {
            log::warn!("failed to remove workspace {}: {}", self.dir.display(), err);
        } else {
            debug!("removed workspace {}", self.dir.display());
        }
    }
}

/// Two-phase code runner over an injected compiler/executor pair. Holds no
/// mutable state, so concurrent requests need no locking; isolation comes
/// from each run owning its own [`Workspace`].
pub struct Runner<C, E> {
    compiler: C,
    executor: E,
}

pub type JavaRunner = Runner<Javac, Java>;

impl Runner<Javac, Java> {
    pub fn java() -> JavaRunner {
        Runner::with(Javac, Java)
    }
}

impl<C: Compiler, E: Executor> Runner<C, E> {
    pub fn with(compiler: C, executor: E) -> Self {
        Runner { compiler, executor }
    }

    /// Runs one submission to completion. Never fails: internal faults come
    /// back as an `InfraError` outcome.
    pub fn run(&self, code: &str) -> RunOutcome {
        match self.try_run(code) {
            Ok(outcome) => outcome,
            Err(err) => RunOutcome::new(OutcomeKind::InfraError, err.to_string()),
        }
    }

    fn try_run(&self, code: &str) -> io::Result<RunOutcome> {
        let workspace = Workspace::create()?;
        let source = workspace.write_source(code)?;

        let compiled = self.compiler.compile(workspace.path(), &source)?;
        if !compiled.success {
            return Ok(RunOutcome::new(OutcomeKind::CompileError, compiled.stderr));
        }

        let ran = self.executor.execute(workspace.path())?;
        if !ran.stdout.is_empty() {
            return Ok(RunOutcome::new(OutcomeKind::Success, ran.stdout));
        }
        if !ran.stderr.is_empty() {
            return Ok(RunOutcome::new(OutcomeKind::RuntimeError, ran.stderr));
        }
        // Program ran and produced nothing on either stream.
        Ok(RunOutcome::new(OutcomeKind::Success, String::new()))
    }
}
