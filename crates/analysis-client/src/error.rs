//! Analysis client error types

use thiserror::Error;

use crate::providers::ProviderId;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Service overloaded or rate limited. Worth another attempt.
    #[error("HTTP {status}: {message}")]
    Transient { status: u16, message: String },

    #[error("Failed to get analysis from AI: {0}")]
    Permanent(String),

    #[error("Failed to get analysis from AI: {0}")]
    RetriesExhausted(String),

    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),

    #[error("No API key configured for {0}")]
    MissingApiKey(ProviderId),

    #[error("Invalid analysis response: {0}")]
    InvalidResponse(String),

    #[error("Failed to fetch games: {0}")]
    Fetch(String),

    #[error("Lichess user not found: {0}")]
    UserNotFound(String),
}

impl AnalysisError {
    /// Classify a non-success HTTP status from an analysis backend.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = body.trim().chars().take(300).collect::<String>();
        match status {
            429 | 503 => AnalysisError::Transient { status, message },
            _ => AnalysisError::Permanent(format!("HTTP {status}: {message}")),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, AnalysisError::Transient { .. })
    }

    /// Final form of an error leaving the retry loop.
    pub(crate) fn finalize(self) -> Self {
        match self {
            AnalysisError::Transient { .. } => AnalysisError::RetriesExhausted(self.to_string()),
            AnalysisError::Permanent(_) | AnalysisError::RetriesExhausted(_) => self,
            other => AnalysisError::Permanent(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => AnalysisError::from_status(status.as_u16(), &e.to_string()),
            None => AnalysisError::Permanent(format!("Request error: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_overload_and_rate_limit_are_transient() {
        assert!(AnalysisError::from_status(503, "overloaded").is_transient());
        assert!(AnalysisError::from_status(429, "slow down").is_transient());
        assert!(!AnalysisError::from_status(500, "boom").is_transient());
        assert!(!AnalysisError::from_status(401, "bad key").is_transient());
    }

    #[test]
    fn test_finalize_prefixes_once() {
        let exhausted = AnalysisError::from_status(503, "overloaded").finalize();
        assert_eq!(
            exhausted.to_string(),
            "Failed to get analysis from AI: HTTP 503: overloaded"
        );
        assert!(matches!(exhausted.finalize(), AnalysisError::RetriesExhausted(_)));

        let invalid = AnalysisError::InvalidResponse("API response was empty.".into()).finalize();
        assert_eq!(
            invalid.to_string(),
            "Failed to get analysis from AI: Invalid analysis response: API response was empty."
        );
    }
}
