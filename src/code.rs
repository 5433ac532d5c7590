use serde::{Deserialize, Serialize};

/// Body of a `POST /run-java/` request. A missing `code` field compiles an
/// empty file rather than rejecting the request.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub code: String,
}

/// Wire shape of every runner response: one text field, whatever the
/// outcome. Compile diagnostics, runtime stderr, infrastructure faults and
/// program output all travel in `output`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResponse {
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_code_field_defaults_to_empty() {
        let req: RunRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.code, "");
    }

    #[test]
    fn present_code_field_is_taken_verbatim() {
        let req: RunRequest = serde_json::from_str(r#"{"code": "class Main {}"}"#).unwrap();
        assert_eq!(req.code, "class Main {}");
    }
}
