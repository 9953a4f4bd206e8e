//! Client for the optional translation service.
//!
//! When translation is disabled the message is handed back unchanged and no
//! request is made.

use serde::{Deserialize, Serialize};

use crate::config::TranslatorConfig;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::request::post_json_resource;
use crate::transport::HttpTransport;

pub const TRANSLATE_ENDPOINT: &str = "/translate";

/// Messages are always authored in English.
pub const SOURCE_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorServerResponse {
    pub translated_text: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
}

/// Translate `message` into `target_language`, or pass it through when
/// `enabled` is false.
pub async fn translate<Tr>(
    ctx: &RequestContext,
    transport: &Tr,
    enabled: bool,
    url: &str,
    target_language: &str,
    message: &str,
) -> Result<TranslatorServerResponse, ApiError>
where
    Tr: HttpTransport + ?Sized,
{
    if !enabled {
        return Ok(TranslatorServerResponse {
            translated_text: message.to_string(),
        });
    }

    let payload = serde_json::to_string(&TranslateRequest {
        q: message,
        source: SOURCE_LANGUAGE,
        target: target_language,
    })
    .map_err(|e| ApiError::Serialization(e.to_string()))?;

    let endpoint = format!("{}{TRANSLATE_ENDPOINT}", url.trim_end_matches('/'));
    post_json_resource(ctx, transport, &endpoint, None, None, Some(&payload)).await
}

/// A configured translation client.
#[derive(Debug, Clone)]
pub struct Translator<T> {
    config: TranslatorConfig,
    transport: T,
}

impl<T: HttpTransport> Translator<T> {
    pub fn new(config: TranslatorConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate into the configured target language.
    pub async fn translate(&self, ctx: &RequestContext, message: &str) -> Result<String, ApiError> {
        let response = translate(
            ctx,
            &self.transport,
            self.config.enabled,
            &self.config.url,
            &self.config.target_language,
            message,
        )
        .await?;
        Ok(response.translated_text)
    }
}
