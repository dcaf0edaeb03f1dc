//! Chat-completions backends: OpenAI, xAI Grok and OpenRouter.

use chess_core::AnalysisReport;
use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::{http_client, read_body, AnalysisProvider, AnalysisRequest, ProviderId};
use crate::error::AnalysisError;
use crate::prompt::{build_system_prompt, build_user_prompt, parse_analysis_response};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GROK_BASE_URL: &str = "https://api.x.ai/v1";
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub struct OpenAiCompatProvider {
    id: ProviderId,
    base_url: String,
    model: String,
    client: Client,
}

impl OpenAiCompatProvider {
    pub fn new(id: ProviderId, base_url: &str, model: &str) -> Result<Self, AnalysisError> {
        Ok(Self {
            id,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: http_client()?,
        })
    }

    pub fn openai() -> Result<Self, AnalysisError> {
        Self::new(ProviderId::OpenAi, OPENAI_BASE_URL, "gpt-4o")
    }

    pub fn grok() -> Result<Self, AnalysisError> {
        Self::new(ProviderId::Grok, GROK_BASE_URL, "grok-1")
    }

    pub fn openrouter() -> Result<Self, AnalysisError> {
        Self::new(ProviderId::OpenRouter, OPENROUTER_BASE_URL, "x-ai/grok-4-fast:free")
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn request_body(&self, request: &AnalysisRequest<'_>) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": build_system_prompt(request.language) },
                { "role": "user", "content": build_user_prompt(request.pgn, request.player) }
            ],
            "response_format": { "type": "json_object" }
        })
    }

    async fn call(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisReport, AnalysisError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(provider = %self.id, model = %self.model, "Sending analysis request");

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(request.api_key)
            .json(&self.request_body(request));
        if self.id == ProviderId::OpenRouter {
            builder = builder.header("X-Title", "ChessTrax AI Coach");
        }

        let body = read_body(builder.send().await?).await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;
        parse_analysis_response(message_content(&value))
    }
}

/// `choices[0].message.content`
pub fn message_content(response: &Value) -> Option<&str> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

impl AnalysisProvider for OpenAiCompatProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn analyze<'a>(
        &'a self,
        request: &'a AnalysisRequest<'a>,
    ) -> BoxFuture<'a, Result<AnalysisReport, AnalysisError>> {
        Box::pin(self.call(request))
    }
}
