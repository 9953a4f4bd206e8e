//! RPC capability used by the typed request builder.

use async_trait::async_trait;
use serde_json::Value;

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::request::json_resource;
use crate::transport::HttpTransport;

/// Performs one JSON call against the FC middleware.
///
/// `path` is relative to whatever base the implementation is bound to. The
/// decoded reply is returned as a JSON value; callers convert it into their
/// destination type.
#[async_trait]
pub trait RpcClient: Send + Sync {
    async fn call(&self, ctx: &RequestContext, method: HttpMethod, path: &str, body: String) -> Result<Value, ApiError>;
}

/// `RpcClient` that dispatches through the JSON request helpers.
///
/// Authentication rides on the context metadata (see
/// `RequestContext::with_auth`), so no bearer token is attached here.
#[derive(Debug, Clone)]
pub struct HttpRpcClient<T> {
    base_url: String,
    transport: T,
}

impl<T: HttpTransport> HttpRpcClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl<T: HttpTransport> RpcClient for HttpRpcClient<T> {
    async fn call(&self, ctx: &RequestContext, method: HttpMethod, path: &str, body: String) -> Result<Value, ApiError> {
        let endpoint = format!("{}{path}", self.base_url);
        let body = match method {
            HttpMethod::Get => None,
            _ => Some(body.as_str()),
        };
        json_resource(ctx, &self.transport, method, &endpoint, None, None, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    #[tokio::test]
    async fn call_joins_base_url_and_forwards_cookie() {
        let transport = RecordingTransport::new().respond(200, r#"{"claim":{"icsRefNo":"ICS-1"}}"#);
        let rpc = HttpRpcClient::new("http://fcs.local/", &transport);
        let ctx = RequestContext::with_auth("jwt");

        let value = rpc
            .call(&ctx, HttpMethod::Post, "/v1/fcs/claim", "{}".to_string())
            .await
            .unwrap();
        assert_eq!(value["claim"]["icsRefNo"], "ICS-1");

        let sent = transport.last_request();
        assert_eq!(sent.url, "http://fcs.local/v1/fcs/claim");
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.header("cookie"), Some("jwt"));
        assert!(sent.header("authorization").is_none());
        assert_eq!(sent.body.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn get_calls_carry_no_body() {
        let transport = RecordingTransport::new().respond(200, "{}");
        let rpc = HttpRpcClient::new("http://fcs.local", &transport);
        rpc.call(&RequestContext::new(), HttpMethod::Get, "/v1/fcs/claim/ICS-1", String::new())
            .await
            .unwrap();
        assert!(transport.last_request().body.is_none());
    }
}
