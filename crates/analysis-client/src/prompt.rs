//! Prompt construction and response decoding.

use std::str::FromStr;

use chess_core::AnalysisReport;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AnalysisError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
    Hy,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Hy => "hy",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::De => "German",
            Language::Hy => "Armenian",
        }
    }

    pub fn tone_instruction(&self) -> &'static str {
        match self {
            Language::De => {
                "Always address the user with the informal German \"Du\". Use a friendly and encouraging tone."
            }
            _ => "Use a friendly and encouraging tone.",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "de" => Ok(Language::De),
            "hy" => Ok(Language::Hy),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// JSON schema the model output must satisfy.
pub fn analysis_schema() -> Value {
    let item = |name: &str, name_desc: &str, explanation_desc: &str| {
        json!({
            "type": "object",
            "properties": {
                name: { "type": "string", "description": name_desc },
                "explanation": { "type": "string", "description": explanation_desc }
            },
            "required": [name, "explanation"]
        })
    };

    json!({
        "type": "object",
        "properties": {
            "openingAnalysis": {
                "type": "object",
                "description": "Analysis of opening performance for White and Black.",
                "properties": {
                    "asWhite": {
                        "type": "string",
                        "description": "Detailed analysis of opening struggles as White, with concrete suggestions for improvement or alternative openings. Mention specific opening names."
                    },
                    "asBlack": {
                        "type": "string",
                        "description": "Detailed analysis of opening struggles as Black, with concrete suggestions for lines to study. Mention specific opening names."
                    }
                },
                "required": ["asWhite", "asBlack"]
            },
            "tacticalMotifs": {
                "type": "array",
                "description": "A list of recurring tactical motifs the user misses.",
                "items": item(
                    "motif",
                    "The name of the tactical motif (e.g., Fork, Pin, Skewer).",
                    "A brief explanation of why the user struggles with this motif."
                )
            },
            "strategicWeaknesses": {
                "type": "array",
                "description": "A list of common strategic errors.",
                "items": item(
                    "weakness",
                    "The name of the strategic weakness (e.g., Poor Pawn Structure, Bad Piece Activity).",
                    "A brief explanation of the strategic error and its consequences."
                )
            },
            "endgamePractice": {
                "type": "array",
                "description": "Recommended endgame types for practice.",
                "items": item(
                    "endgameType",
                    "The type of endgame to study (e.g., Rook and Pawn Endgames).",
                    "Why this endgame type is important for the user based on their games."
                )
            },
            "summary": {
                "type": "string",
                "description": "A short, encouraging summary of the analysis and a suggestion for the single most important area to focus on first."
            }
        },
        "required": ["openingAnalysis", "tacticalMotifs", "strategicWeaknesses", "endgamePractice", "summary"]
    })
}

pub fn build_system_prompt(language: Language) -> String {
    let schema = serde_json::to_string_pretty(&analysis_schema()).unwrap_or_default();
    format!(
        r#"
You are a helpful and insightful chess coach. Your task is to analyze a set of chess games from a user and provide a personalized training plan.
The user wants the output in a specific JSON format.
The entire analysis and all text in the final JSON object must be in {language}.

**Tone and Formatting Rules:**
1. {tone}
2. When you list example games, you MUST precede the list with the keyword "GameId". For example: "... (e.g., GameId abcdefgh, ijklmnop)".
3. The output must be a valid JSON object conforming exactly to this schema, with no additional text or explanations outside the JSON:
```json
{schema}
```
"#,
        language = language.name(),
        tone = language.tone_instruction(),
    )
}

pub fn build_user_prompt(lost_games_pgn: &str, player: &str) -> String {
    format!(
        r#"
Analyze the following chess games that I, Lichess user "{player}", have lost.
Based on these games, create a personalized training plan.
Identify recurring patterns in my mistakes. Do not comment on individual blunders unless they exemplify a recurring pattern.
Focus on actionable advice.

Here are the PGNs of my lost games:
---
{lost_games_pgn}
---

Please provide the analysis in the structured JSON format as requested. Be concise but insightful.
"#
    )
}

/// Decode model output, tolerating a surrounding ```json fence.
pub fn parse_analysis_response(text: Option<&str>) -> Result<AnalysisReport, AnalysisError> {
    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(AnalysisError::InvalidResponse(
            "API response was empty.".to_string(),
        ));
    }

    let body = text.strip_prefix("```json").unwrap_or(text);
    let body = body.strip_prefix('\n').unwrap_or(body);
    let body = body.strip_suffix("```").unwrap_or(body);
    let body = body.strip_suffix('\n').unwrap_or(body);

    serde_json::from_str(body).map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
}
