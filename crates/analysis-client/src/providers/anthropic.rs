use chess_core::AnalysisReport;
use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::{http_client, read_body, AnalysisProvider, AnalysisRequest, ProviderId};
use crate::error::AnalysisError;
use crate::prompt::{build_system_prompt, build_user_prompt, parse_analysis_response};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_MODEL: &str = "claude-3-opus-20240229";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

pub struct AnthropicProvider {
    base_url: String,
    client: Client,
}

impl AnthropicProvider {
    pub fn new() -> Result<Self, AnalysisError> {
        Self::with_base_url(ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, AnalysisError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }

    pub fn request_body(&self, request: &AnalysisRequest<'_>) -> Value {
        json!({
            "model": ANTHROPIC_MODEL,
            "max_tokens": MAX_TOKENS,
            "system": build_system_prompt(request.language),
            "messages": [
                { "role": "user", "content": build_user_prompt(request.pgn, request.player) }
            ]
        })
    }

    async fn call(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisReport, AnalysisError> {
        debug!(provider = "anthropic", model = ANTHROPIC_MODEL, "Sending analysis request");
        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", request.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(request))
            .send()
            .await?;
        let body = read_body(resp).await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;
        parse_analysis_response(first_text_block(&value))
    }
}

/// First `text` block of `content`.
pub fn first_text_block(response: &Value) -> Option<&str> {
    response
        .get("content")?
        .as_array()?
        .iter()
        .find(|block| block.get("type").and_then(Value::as_str) == Some("text"))?
        .get("text")?
        .as_str()
}

impl AnalysisProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn analyze<'a>(
        &'a self,
        request: &'a AnalysisRequest<'a>,
    ) -> BoxFuture<'a, Result<AnalysisReport, AnalysisError>> {
        Box::pin(self.call(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_block_skips_other_blocks() {
        let response = json!({
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "{\"summary\": \"\"}"}
            ]
        });
        assert_eq!(first_text_block(&response), Some("{\"summary\": \"\"}"));
        assert_eq!(first_text_block(&json!({"content": []})), None);
    }
}
