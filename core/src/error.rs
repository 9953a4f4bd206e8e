//! Error types for the FC adapter.
//!
//! # Design
//! Status failures keep the raw code and status line so callers can map them
//! back onto their own HTTP responses. A non-200 body that carries a CISL
//! class id but no violations cannot be rendered meaningfully and lands in
//! `Unclassified` instead of being treated as success.

use thiserror::Error;

use crate::classify::CislError;

/// A non-200 response from the backend.
///
/// `Display` renders only `response_message`, which is either the raw body
/// or the flattened violation listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{response_message}")]
pub struct StatusCodeError {
    pub code: u16,
    pub status: String,
    pub response_message: String,
    pub cisl_error: CislError,
}

impl StatusCodeError {
    pub fn http_status_code(&self) -> u16 {
        self.code
    }
}

/// Errors returned by the request helpers, the typed builder and the translator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, DNS or TLS failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with a status other than 200.
    #[error(transparent)]
    Status(#[from] StatusCodeError),

    /// Non-200 response whose CISL payload has a class id but no violations.
    #[error("unclassified backend error (HTTP {code}): {body}")]
    Unclassified { code: u16, status: String, body: String },

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request context was cancelled before the response arrived.
    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl ApiError {
    /// HTTP status carried by the error, if the backend produced one.
    pub fn http_status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status(e) => Some(e.code),
            ApiError::Unclassified { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ApiError::InvalidUrl {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: e.to_string(),
            }
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
