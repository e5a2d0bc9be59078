//! JSON wire types and request-body validation.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{FieldError, GcopError, Result};
use crate::llm::CommitContext;

/// Body of `POST /generate_commit_message`. Every field is required.
///
/// Built by [`parse_commit_request`] rather than a serde derive, which would
/// stop at the first bad field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessageRequest {
    pub diff_text: String,
    pub branch_name: String,
    pub changed_files: Vec<String>,
    pub author_name: String,
    pub existing_message: String,
}

impl From<CommitMessageRequest> for CommitContext {
    fn from(req: CommitMessageRequest) -> Self {
        CommitContext {
            diff_text: req.diff_text,
            branch_name: req.branch_name,
            changed_files: req.changed_files,
            author_name: req.author_name,
            existing_message: req.existing_message,
        }
    }
}

/// Successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitMessageResponse {
    pub commit_message: String,
}

/// `GET /` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

/// Parses and validates a raw request body.
///
/// Reports every bad field at once as [`GcopError::Validation`], in the
/// order the fields are declared. Unknown fields are ignored.
pub fn parse_commit_request(body: &[u8]) -> Result<CommitMessageRequest> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        GcopError::Validation(vec![FieldError::new(
            "",
            "JSON decode error",
            "json_invalid",
        )])
    })?;

    let Value::Object(fields) = value else {
        return Err(GcopError::Validation(vec![FieldError::new(
            "",
            "Input should be a valid dictionary or object to extract fields from",
            "model_attributes_type",
        )]));
    };

    let mut errors = Vec::new();
    let diff_text = string_field(&fields, "diff_text", &mut errors);
    let branch_name = string_field(&fields, "branch_name", &mut errors);
    let changed_files = string_list_field(&fields, "changed_files", &mut errors);
    let author_name = string_field(&fields, "author_name", &mut errors);
    let existing_message = string_field(&fields, "existing_message", &mut errors);

    if !errors.is_empty() {
        return Err(GcopError::Validation(errors));
    }

    Ok(CommitMessageRequest {
        diff_text: diff_text.unwrap_or_default(),
        branch_name: branch_name.unwrap_or_default(),
        changed_files: changed_files.unwrap_or_default(),
        author_name: author_name.unwrap_or_default(),
        existing_message: existing_message.unwrap_or_default(),
    })
}

fn missing(field: &str) -> FieldError {
    FieldError::new(field, "Field required", "missing")
}

fn string_field(
    fields: &Map<String, Value>,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match fields.get(name) {
        None => {
            errors.push(missing(name));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(
                name,
                "Input should be a valid string",
                "string_type",
            ));
            None
        }
    }
}

fn string_list_field(
    fields: &Map<String, Value>,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<String>> {
    let items = match fields.get(name) {
        None => {
            errors.push(missing(name));
            return None;
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.push(FieldError::new(
                name,
                "Input should be a valid list",
                "list_type",
            ));
            return None;
        }
    };

    let before = errors.len();
    let files: Vec<String> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            Value::String(s) => Some(s.clone()),
            _ => {
                let mut error =
                    FieldError::new(name, "Input should be a valid string", "string_type");
                error.loc.push(index.to_string());
                errors.push(error);
                None
            }
        })
        .collect();

    (errors.len() == before).then_some(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn full_body() -> Value {
        json!({
            "diff_text": "diff --git a/x b/x",
            "branch_name": "main",
            "changed_files": ["x"],
            "author_name": "Jane",
            "existing_message": ""
        })
    }

    fn validation_errors(body: &[u8]) -> Vec<FieldError> {
        match parse_commit_request(body) {
            Err(GcopError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_valid_body() {
        let body = serde_json::to_vec(&full_body()).unwrap();
        let req = parse_commit_request(&body).unwrap();
        assert_eq!(req.branch_name, "main");
        assert_eq!(req.changed_files, vec!["x".to_string()]);
        assert_eq!(req.existing_message, "");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let mut body = full_body();
        body["extra"] = json!(42);
        assert!(parse_commit_request(&serde_json::to_vec(&body).unwrap()).is_ok());
    }

    #[test]
    fn test_missing_field() {
        let mut body = full_body();
        body.as_object_mut().unwrap().remove("branch_name");
        let errors = validation_errors(&serde_json::to_vec(&body).unwrap());
        assert_eq!(errors, vec![FieldError::new("branch_name", "Field required", "missing")]);
        assert_eq!(
            serde_json::to_value(&errors[0]).unwrap(),
            json!({"loc": ["body", "branch_name"], "msg": "Field required", "type": "missing"})
        );
    }

    #[test]
    fn test_all_missing_fields_reported_in_order() {
        let errors = validation_errors(b"{}");
        let fields: Vec<&str> = errors.iter().map(|e| e.loc[1].as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "diff_text",
                "branch_name",
                "changed_files",
                "author_name",
                "existing_message"
            ]
        );
    }

    #[test]
    fn test_wrong_types() {
        let mut body = full_body();
        body["diff_text"] = json!(12);
        body["changed_files"] = json!("x");
        let errors = validation_errors(&serde_json::to_vec(&body).unwrap());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, "string_type");
        assert_eq!(errors[1].kind, "list_type");
    }

    #[test]
    fn test_null_is_wrong_type_not_missing() {
        let mut body = full_body();
        body["existing_message"] = Value::Null;
        let errors = validation_errors(&serde_json::to_vec(&body).unwrap());
        assert_eq!(errors[0].kind, "string_type");
    }

    #[test]
    fn test_bad_list_item_location() {
        let mut body = full_body();
        body["changed_files"] = json!(["ok.rs", 7]);
        let errors = validation_errors(&serde_json::to_vec(&body).unwrap());
        assert_eq!(errors[0].loc, vec!["body", "changed_files", "1"]);
    }

    #[test]
    fn test_invalid_json() {
        let errors = validation_errors(b"{not json");
        assert_eq!(errors[0].kind, "json_invalid");
        assert_eq!(errors[0].loc, vec!["body"]);
    }

    #[test]
    fn test_non_object_body() {
        let errors = validation_errors(b"[1, 2]");
        assert_eq!(errors[0].kind, "model_attributes_type");
    }

    #[test]
    fn test_blank_diff_is_not_a_validation_error() {
        let mut body = full_body();
        body["diff_text"] = json!("   ");
        assert!(parse_commit_request(&serde_json::to_vec(&body).unwrap()).is_ok());
    }
}
