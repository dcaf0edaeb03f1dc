//! Analysis configuration from environment variables

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use tracing::warn;

use crate::prompt::Language;
use crate::providers::ProviderId;
use crate::retry::RetryPolicy;

#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Backend used when a request does not name one
    pub provider: ProviderId,

    /// Output language of the report
    pub language: Language,

    pub retry: RetryPolicy,

    api_keys: HashMap<ProviderId, String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: ProviderId::Gemini,
            language: Language::En,
            retry: RetryPolicy::default(),
            api_keys: HashMap::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let provider = match env::var("LLM_PROVIDER") {
            Ok(name) => name.parse().unwrap_or_else(|e| {
                warn!("{e}, falling back to gemini");
                ProviderId::Gemini
            }),
            Err(_) => ProviderId::Gemini,
        };

        let language = env::var("ANALYSIS_LANGUAGE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let max_attempts = env::var("ANALYSIS_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let base_ms = env::var("ANALYSIS_RETRY_BASE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        let api_keys = ProviderId::ALL
            .into_iter()
            .filter_map(|id| {
                env::var(id.api_key_env())
                    .ok()
                    .filter(|k| !k.trim().is_empty())
                    .map(|k| (id, k.trim().to_string()))
            })
            .collect();

        Self {
            provider,
            language,
            retry: RetryPolicy::new(max_attempts, Duration::from_millis(base_ms)),
            api_keys,
        }
    }

    pub fn with_api_key(mut self, id: ProviderId, key: impl Into<String>) -> Self {
        self.api_keys.insert(id, key.into());
        self
    }

    pub fn api_key(&self, id: ProviderId) -> Option<&str> {
        self.api_keys.get(&id).map(String::as_str)
    }

    /// Providers with a key configured, in display order.
    pub fn configured_providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.api_keys.contains_key(id))
            .collect()
    }
}
