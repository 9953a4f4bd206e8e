//! Status classification for backend responses.
//!
//! Every helper runs `check_status_code` before touching the body for the
//! caller's destination type. A 200 always passes. Anything else becomes an
//! `ApiError`, enriched with the CISL violation listing when the backend sent
//! one.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ApiError, StatusCodeError};
use crate::http::HttpResponse;

/// Structured validation failure returned by the FC middleware.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CislError {
    #[serde(deserialize_with = "null_as_default")]
    pub class_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub violations: Vec<Violation>,
}

/// An explicit JSON `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One field-level failure inside a `CislError`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Violation {
    pub class_id: String,
    pub error_code: String,
    pub message: String,
    pub message_type: String,
    pub property_path: String,
    pub severity: String,
}

/// Map a completed response onto `Ok(())` or the matching `ApiError`.
pub fn check_status_code(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }

    let cisl = match serde_json::from_str::<CislError>(&response.body) {
        Ok(cisl) if !cisl.class_id.is_empty() => cisl,
        _ => {
            return Err(StatusCodeError {
                code: response.status,
                status: response.status_text(),
                response_message: response.body.clone(),
                cisl_error: CislError::default(),
            }
            .into())
        }
    };

    if cisl.violations.is_empty() {
        tracing::warn!(
            status = response.status,
            class_id = %cisl.class_id,
            "backend error without violations"
        );
        return Err(ApiError::Unclassified {
            code: response.status,
            status: response.status_text(),
            body: response.body.clone(),
        });
    }

    tracing::error!(
        status = response.status,
        class_id = %cisl.class_id,
        violations = cisl.violations.len(),
        "request failed"
    );
    Err(StatusCodeError {
        code: response.status,
        status: response.status_text(),
        response_message: violation_message(&cisl.violations),
        cisl_error: cisl,
    }
    .into())
}

/// Render violations as one line: property paths first, then messages.
pub fn violation_message(violations: &[Violation]) -> String {
    let mut paths = String::new();
    let mut messages = String::new();
    for (i, violation) in violations.iter().enumerate() {
        paths.push_str(&format!("{}: {}\n", i + 1, violation.property_path));
        messages.push_str(&format!("{}: {}\n", i + 1, violation.message));
    }
    format!("violationPropertyPaths={{{paths}}}\n\n\n\nviolationMessages={{{messages}}}").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            reason: String::new(),
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    const TWO_VIOLATIONS: &str = r#"{
        "classId": "ValidationError",
        "count": 2,
        "violations": [
            {"classId": "v", "errorCode": "E1", "message": "must not be blank", "messageType": "ERROR", "propertyPath": "claim.policyNumber", "severity": "HIGH"},
            {"classId": "v", "errorCode": "E2", "message": "invalid date", "messageType": "ERROR", "propertyPath": "claim.dateOfLoss", "severity": "LOW"}
        ]
    }"#;

    #[test]
    fn ok_status_passes_regardless_of_body() {
        assert!(check_status_code(&response(200, "")).is_ok());
        assert!(check_status_code(&response(200, "not json")).is_ok());
        assert!(check_status_code(&response(200, TWO_VIOLATIONS)).is_ok());
    }

    #[test]
    fn other_success_codes_are_still_errors() {
        let err = check_status_code(&response(201, "created")).unwrap_err();
        assert!(matches!(err, ApiError::Status(StatusCodeError { code: 201, .. })));
    }

    #[test]
    fn non_json_body_becomes_message() {
        let err = check_status_code(&response(502, "bad gateway")).unwrap_err();
        match err {
            ApiError::Status(e) => {
                assert_eq!(e.code, 502);
                assert_eq!(e.response_message, "bad gateway");
                assert_eq!(e.cisl_error, CislError::default());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_class_id_becomes_raw_message() {
        let body = r#"{"classId":"","violations":[{"message":"ignored"}]}"#;
        let err = check_status_code(&response(400, body)).unwrap_err();
        assert_eq!(err.to_string(), body);
    }

    #[test]
    fn violations_are_numbered_in_order_on_one_line() {
        let err = check_status_code(&response(400, TWO_VIOLATIONS)).unwrap_err();
        let ApiError::Status(e) = err else {
            panic!("expected status error");
        };
        assert_eq!(
            e.response_message,
            "violationPropertyPaths={1: claim.policyNumber 2: claim.dateOfLoss }    \
             violationMessages={1: must not be blank 2: invalid date }"
        );
        assert!(!e.response_message.contains('\n'));
        assert_eq!(e.cisl_error.violations.len(), 2);
        assert_eq!(e.cisl_error.count, 2);
    }

    #[test]
    fn class_id_without_violations_is_unclassified() {
        let body = r#"{"classId":"ServerError","count":0,"violations":[]}"#;
        let err = check_status_code(&response(500, body)).unwrap_err();
        match err {
            ApiError::Unclassified { code, body: raw, .. } => {
                assert_eq!(code, 500);
                assert_eq!(raw, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn null_violations_are_unclassified() {
        let err = check_status_code(&response(409, r#"{"classId":"X","count":null,"violations":null}"#)).unwrap_err();
        let ApiError::Unclassified { code, body, .. } = err else {
            panic!("expected unclassified, got {err:?}");
        };
        assert_eq!(code, 409);
        assert!(body.contains("\"violations\":null"));
    }

    #[test]
    fn null_class_id_becomes_raw_message() {
        let body = r#"{"classId":null,"violations":null}"#;
        let err = check_status_code(&response(500, body)).unwrap_err();
        assert!(matches!(err, ApiError::Status(_)));
        assert_eq!(err.to_string(), body);
    }

    #[test]
    fn missing_violation_fields_default_to_empty() {
        let body = r#"{"classId":"V","violations":[{"message":"boom"}]}"#;
        let err = check_status_code(&response(400, body)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "violationPropertyPaths={1:  }    violationMessages={1: boom }"
        );
    }
}
