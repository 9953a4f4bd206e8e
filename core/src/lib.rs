//! Utility layer for the FC adapter service.
//!
//! # Overview
//! Talks to the claims middleware ("FC middleware") and an optional
//! translation service over JSON/HTTP. Every call goes through the same
//! pipeline: build an `HttpRequest`, send it under a `RequestContext`,
//! classify the `HttpResponse`, then decode it.
//!
//! # Design
//! - Helpers are generic over `HttpTransport`; `ReqwestTransport` is the
//!   production implementation, tests substitute in-memory ones.
//! - `check_status_code` runs before any decoding and turns CISL validation
//!   payloads into a one-line violation listing.
//! - `FcsObject` closes the set of objects the middleware accepts; routing is
//!   exhaustive and goes through the injected `RpcClient`.
//! - Logging uses the span carried by the `RequestContext`, never a global sink.

pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod fcs;
pub mod http;
pub mod request;
pub mod response;
pub mod rpc;
pub mod translate;
pub mod transport;
pub mod types;
pub mod util;

#[cfg(test)]
mod testing;

pub use classify::{check_status_code, CislError, Violation};
pub use config::{AdapterConfig, ConfigError, TranslatorConfig};
pub use context::RequestContext;
pub use error::{ApiError, StatusCodeError};
pub use fcs::{fcs_request_builder, FcsObject, FcsResponse};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{
    delete_json_resource, fetch_resource, patch_json_resource, post_form_data, post_json_resource, put_json_resource,
};
pub use rpc::{HttpRpcClient, RpcClient};
pub use translate::{translate, Translator, TranslatorServerResponse};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{Claim, Comment, Person, Property};
