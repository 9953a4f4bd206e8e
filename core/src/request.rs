//! JSON and form request helpers.
//!
//! # Design
//! Each helper is split the same way: `build_*_request` produces an
//! `HttpRequest` without I/O, `send` executes it under the caller's
//! `RequestContext`, and `parse_json_response` classifies the response before
//! decoding it. The public helpers glue the three together.

use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::Instrument;

use crate::classify::check_status_code;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, CONTENT_TYPE_FORM, CONTENT_TYPE_JSON};
use crate::transport::HttpTransport;

/// Ordered query or form parameters.
pub type Params<'a> = &'a [(&'a str, &'a str)];

/// Build a JSON request for `endpoint`, appending `query` when present.
pub fn build_json_request(
    method: HttpMethod,
    endpoint: &str,
    query: Option<Params<'_>>,
    token: Option<&str>,
    body: Option<&str>,
) -> Result<HttpRequest, ApiError> {
    let url = with_query(endpoint, query)?;
    let mut headers = vec![("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())];
    push_bearer(&mut headers, token);
    Ok(HttpRequest {
        method,
        url,
        headers,
        body: body.map(str::to_string),
    })
}

/// Build a form-encoded POST for `endpoint`.
pub fn build_form_request(endpoint: &str, token: Option<&str>, form: Params<'_>) -> Result<HttpRequest, ApiError> {
    let url = with_query(endpoint, None)?;
    let mut headers = vec![("Content-Type".to_string(), CONTENT_TYPE_FORM.to_string())];
    push_bearer(&mut headers, token);
    Ok(HttpRequest {
        method: HttpMethod::Post,
        url,
        headers,
        body: Some(encode_params(form)),
    })
}

/// Classify `response` and decode its body into `T`.
pub fn parse_json_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status_code(response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Execute `request` bound to `ctx`.
///
/// Context metadata is forwarded as headers unless the request already sets
/// them. The round-trip is abandoned as soon as the context is cancelled or
/// its deadline passes. One log event is recorded per completed response.
pub async fn send<Tr>(ctx: &RequestContext, transport: &Tr, mut request: HttpRequest) -> Result<HttpResponse, ApiError>
where
    Tr: HttpTransport + ?Sized,
{
    for (key, value) in ctx.metadata() {
        if request.header(key).is_none() {
            request.headers.push((key.clone(), value.clone()));
        }
    }
    if ctx.is_cancelled() {
        return Err(ApiError::Cancelled);
    }

    let method = request.method;
    let (host, path) = host_and_path(&request.url);
    let span = ctx.span().clone();
    let cancelled = ctx.cancellation_token().cancelled();
    let call = transport.execute(request).instrument(span.clone());
    let start = Instant::now();

    let response = match ctx.deadline() {
        Some(deadline) => tokio::select! {
            biased;
            _ = cancelled => return Err(ApiError::Cancelled),
            _ = tokio::time::sleep_until(deadline) => return Err(ApiError::DeadlineExceeded),
            result = call => result?,
        },
        None => tokio::select! {
            biased;
            _ = cancelled => return Err(ApiError::Cancelled),
            result = call => result?,
        },
    };

    span.in_scope(|| {
        tracing::info!(
            method = %method,
            duration_ms = start.elapsed().as_millis() as u64,
            host = %host,
            path = %path,
            response_code = response.status,
            "request handled"
        );
    });
    Ok(response)
}

/// Build, send and decode a JSON request with an arbitrary method.
pub async fn json_resource<T, Tr>(
    ctx: &RequestContext,
    transport: &Tr,
    method: HttpMethod,
    endpoint: &str,
    query: Option<Params<'_>>,
    token: Option<&str>,
    body: Option<&str>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    Tr: HttpTransport + ?Sized,
{
    let request = build_json_request(method, endpoint, query, token, body)?;
    let response = send(ctx, transport, request).await?;
    parse_json_response(&response)
}

/// POST a JSON payload and decode the JSON reply.
pub async fn post_json_resource<T, Tr>(
    ctx: &RequestContext,
    transport: &Tr,
    endpoint: &str,
    query: Option<Params<'_>>,
    token: Option<&str>,
    body: Option<&str>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    Tr: HttpTransport + ?Sized,
{
    json_resource(ctx, transport, HttpMethod::Post, endpoint, query, token, body).await
}

/// POST `form` URL-encoded and decode the JSON reply.
pub async fn post_form_data<T, Tr>(
    ctx: &RequestContext,
    transport: &Tr,
    endpoint: &str,
    token: Option<&str>,
    form: Params<'_>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    Tr: HttpTransport + ?Sized,
{
    let request = build_form_request(endpoint, token, form)?;
    let response = send(ctx, transport, request).await?;
    parse_json_response(&response)
}

/// GET a JSON resource.
pub async fn fetch_resource<T, Tr>(
    ctx: &RequestContext,
    transport: &Tr,
    endpoint: &str,
    query: Option<Params<'_>>,
    token: Option<&str>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    Tr: HttpTransport + ?Sized,
{
    json_resource(ctx, transport, HttpMethod::Get, endpoint, query, token, None).await
}

pub async fn put_json_resource<T, Tr>(
    ctx: &RequestContext,
    transport: &Tr,
    endpoint: &str,
    query: Option<Params<'_>>,
    token: Option<&str>,
    body: Option<&str>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    Tr: HttpTransport + ?Sized,
{
    json_resource(ctx, transport, HttpMethod::Put, endpoint, query, token, body).await
}

pub async fn patch_json_resource<T, Tr>(
    ctx: &RequestContext,
    transport: &Tr,
    endpoint: &str,
    query: Option<Params<'_>>,
    token: Option<&str>,
    body: Option<&str>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    Tr: HttpTransport + ?Sized,
{
    json_resource(ctx, transport, HttpMethod::Patch, endpoint, query, token, body).await
}

pub async fn delete_json_resource<T, Tr>(
    ctx: &RequestContext,
    transport: &Tr,
    endpoint: &str,
    query: Option<Params<'_>>,
    token: Option<&str>,
    body: Option<&str>,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    Tr: HttpTransport + ?Sized,
{
    json_resource(ctx, transport, HttpMethod::Delete, endpoint, query, token, body).await
}

fn push_bearer(headers: &mut Vec<(String, String)>, token: Option<&str>) {
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        headers.push(("Authorization".to_string(), format!("Bearer {token}")));
    }
}

fn encode_params(params: Params<'_>) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

/// Validate `endpoint` and append the encoded query, keeping the endpoint text
/// otherwise untouched.
fn with_query(endpoint: &str, query: Option<Params<'_>>) -> Result<String, ApiError> {
    url::Url::parse(endpoint).map_err(|e| ApiError::InvalidUrl {
        url: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    match query {
        Some(params) if !params.is_empty() => {
            let sep = if endpoint.contains('?') { '&' } else { '?' };
            Ok(format!("{endpoint}{sep}{}", encode_params(params)))
        }
        _ => Ok(endpoint.to_string()),
    }
}

fn host_and_path(url: &str) -> (String, String) {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let host = match (parsed.host_str(), parsed.port()) {
                (Some(h), Some(p)) => format!("{h}:{p}"),
                (Some(h), None) => h.to_string(),
                _ => String::new(),
            };
            (host, parsed.path().to_string())
        }
        Err(_) => (String::new(), String::new()),
    }
}
