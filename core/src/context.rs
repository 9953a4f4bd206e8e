//! Per-call request context.
//!
//! A `RequestContext` travels with every helper call. It carries the
//! cancellation token and optional deadline that bound the network round-trip,
//! outgoing metadata that is forwarded as request headers, and the tracing
//! span that request logs are recorded under.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Span;

/// Metadata key used to forward the caller's auth token downstream.
pub const AUTH_METADATA_KEY: &str = "cookie";

#[derive(Debug, Clone)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
    metadata: Vec<(String, String)>,
    span: Span,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// A context that never times out and is only cancelled explicitly.
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: None,
            metadata: Vec::new(),
            span: tracing::info_span!("fc_request"),
        }
    }

    /// A fresh context whose outgoing metadata carries `token` as the cookie
    /// header for downstream RPC calls.
    pub fn with_auth(token: &str) -> Self {
        Self::new().with_metadata(AUTH_METADATA_KEY, token)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Bind this context to an externally owned token. Cancelling the token
    /// aborts any in-flight call made with this context.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Add or replace one outgoing metadata entry. Keys are stored lower-case.
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        let key = key.to_ascii_lowercase();
        self.metadata.retain(|(k, _)| *k != key);
        self.metadata.push((key, value.to_string()));
        self
    }

    /// Record request logs under `span` instead of the default one.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// A context sharing this one's deadline, metadata and span, cancelled
    /// whenever this one is.
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
            metadata: self.metadata.clone(),
            span: self.span.clone(),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn metadata(&self) -> &[(String, String)] {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.metadata_value(AUTH_METADATA_KEY)
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}
