//! Rendering of outgoing JSON and error responses.

use std::error::Error;

use serde::Serialize;

use crate::http::{HttpResponse, CONTENT_TYPE_JSON};

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Encode `data` as the JSON body of a response with `status`.
///
/// An encoding failure is written into the body as plain text; the status is
/// kept.
pub fn json_response<T: Serialize + ?Sized>(status: u16, data: &T) -> HttpResponse {
    let body = serde_json::to_string(data).unwrap_or_else(|e| e.to_string());
    HttpResponse {
        status,
        reason: String::new(),
        headers: vec![("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())],
        body,
    }
}

/// Render `err` as `{"error": "<message>"}` and log it. Without an error the
/// body is `null`.
pub fn error_response(status: u16, err: Option<&dyn Error>) -> HttpResponse {
    match err {
        Some(err) => {
            let message = err.to_string();
            tracing::error!(status, error_message = %message, "adapter response error");
            json_response(status, &ErrorBody { error: &message })
        }
        None => json_response(status, &()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::error::{ApiError, StatusCodeError};

    #[test]
    fn error_is_wrapped_in_json() {
        let err = ApiError::Status(StatusCodeError {
            code: 400,
            response_message: "violationPropertyPaths={1: claim }".to_string(),
            ..StatusCodeError::default()
        });
        let resp = error_response(400, Some(&err));
        assert_eq!(resp.status, 400);
        assert_eq!(resp.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(body, serde_json::json!({"error": "violationPropertyPaths={1: claim }"}));
    }

    #[test]
    fn missing_error_renders_null() {
        let resp = error_response(204, None);
        assert_eq!(resp.body, "null");
    }

    #[test]
    fn unencodable_data_writes_error_text() {
        let mut bad = BTreeMap::new();
        bad.insert((1, 2), "tuple keys are not valid JSON object keys");
        let resp = json_response(500, &bad);
        assert_eq!(resp.status, 500);
        assert!(resp.body.contains("key must be a string"));
    }
}
