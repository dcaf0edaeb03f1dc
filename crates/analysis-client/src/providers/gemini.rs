//! Google Gemini `generateContent` backend.

use chess_core::AnalysisReport;
use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::{http_client, read_body, AnalysisProvider, AnalysisRequest, ProviderId};
use crate::error::AnalysisError;
use crate::prompt::{analysis_schema, build_system_prompt, build_user_prompt, parse_analysis_response};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiProvider {
    base_url: String,
    model: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new() -> Result<Self, AnalysisError> {
        Self::with_base_url(GEMINI_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, AnalysisError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: GEMINI_MODEL.to_string(),
            client: http_client()?,
        })
    }

    pub fn request_body(&self, request: &AnalysisRequest<'_>) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": build_system_prompt(request.language) }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_user_prompt(request.pgn, request.player) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": gemini_schema(analysis_schema())
            }
        })
    }

    async fn call(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisReport, AnalysisError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(provider = "gemini", model = %self.model, "Sending analysis request");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", request.api_key)
            .json(&self.request_body(request))
            .send()
            .await?;
        let body = read_body(resp).await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;
        parse_analysis_response(candidate_text(&value))
    }
}

/// `candidates[0].content.parts[0].text`
pub fn candidate_text(response: &Value) -> Option<&str> {
    response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Gemini spells schema types in upper case (`OBJECT`, `STRING`, ...).
fn gemini_schema(mut schema: Value) -> Value {
    fn walk(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, v) in map.iter_mut() {
                    match v {
                        Value::String(s) if key == "type" => *s = s.to_ascii_uppercase(),
                        _ => walk(v),
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(walk),
            _ => {}
        }
    }
    walk(&mut schema);
    schema
}

impl AnalysisProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
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
    use crate::prompt::Language;

    #[test]
    fn test_schema_types_are_upper_case() {
        let schema = gemini_schema(analysis_schema());
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["summary"]["type"], "STRING");
        assert_eq!(
            schema["properties"]["endgamePractice"]["items"]["properties"]["endgameType"]["type"],
            "STRING"
        );
        // descriptions are untouched
        assert!(schema["properties"]["summary"]["description"]
            .as_str()
            .unwrap()
            .starts_with("A short"));
    }

    #[test]
    fn test_request_asks_for_json() {
        let provider = GeminiProvider::new().unwrap();
        let request = AnalysisRequest {
            pgn: "",
            api_key: "k",
            player: "bob",
            language: Language::Hy,
        };
        let body = provider.request_body(&request);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Armenian"));
    }

    #[test]
    fn test_candidate_text_extraction() {
        let response = json!({"candidates": [{"content": {"parts": [{"text": "x"}]}}]});
        assert_eq!(candidate_text(&response), Some("x"));
        assert_eq!(candidate_text(&json!({})), None);
    }
}
