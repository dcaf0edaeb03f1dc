//! LLM analysis backends.

pub mod anthropic;
pub mod gemini;
pub mod openai_compat;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chess_core::AnalysisReport;
use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::prompt::Language;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;

/// Model calls can take a while on 50 games.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gemini,
    OpenAi,
    Grok,
    Anthropic,
    OpenRouter,
}

/// Display metadata for a provider.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub name: &'static str,
    pub api_key_label: &'static str,
    pub docs_url: &'static str,
}

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Gemini,
        ProviderId::OpenAi,
        ProviderId::Grok,
        ProviderId::Anthropic,
        ProviderId::OpenRouter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::OpenAi => "openai",
            ProviderId::Grok => "grok",
            ProviderId::Anthropic => "anthropic",
            ProviderId::OpenRouter => "openrouter",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "GEMINI_API_KEY",
            ProviderId::OpenAi => "OPENAI_API_KEY",
            ProviderId::Grok => "XAI_API_KEY",
            ProviderId::Anthropic => "ANTHROPIC_API_KEY",
            ProviderId::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    pub fn info(&self) -> ProviderInfo {
        let (name, api_key_label, docs_url) = match self {
            ProviderId::Gemini => (
                "Google Gemini",
                "Gemini API Key",
                "https://aistudio.google.com/apikey",
            ),
            ProviderId::OpenAi => (
                "OpenAI GPT-4",
                "OpenAI API Key",
                "https://platform.openai.com/api-keys",
            ),
            ProviderId::Grok => ("xAI Grok", "xAI API Key", "https://console.x.ai"),
            ProviderId::Anthropic => (
                "Anthropic Claude 3",
                "Anthropic API Key",
                "https://console.anthropic.com/settings/keys",
            ),
            ProviderId::OpenRouter => (
                "xAI Grok 4 Fast",
                "OpenRouter API Key",
                "https://openrouter.ai/keys",
            ),
        };
        ProviderInfo {
            id: *self,
            name,
            api_key_label,
            docs_url,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| AnalysisError::UnknownProvider(s.to_string()))
    }
}

/// One call to an analysis backend.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    /// Lost games, already capped and joined.
    pub pgn: &'a str,
    pub api_key: &'a str,
    pub player: &'a str,
    pub language: Language,
}

pub trait AnalysisProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn analyze<'a>(
        &'a self,
        request: &'a AnalysisRequest<'a>,
    ) -> BoxFuture<'a, Result<AnalysisReport, AnalysisError>>;
}

pub(crate) fn http_client() -> Result<Client, AnalysisError> {
    Client::builder()
        .user_agent(concat!("ChessTrax/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| AnalysisError::Permanent(format!("HTTP client setup failed: {e}")))
}

/// Turn a backend response into its body text, classifying failures.
pub(crate) async fn read_body(resp: reqwest::Response) -> Result<String, AnalysisError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(AnalysisError::from_status(status.as_u16(), &body));
    }
    Ok(body)
}
