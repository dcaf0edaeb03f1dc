//! Coaching report returned by the analysis backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningAnalysis {
    pub as_white: String,
    pub as_black: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticalMotif {
    pub motif: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicWeakness {
    pub weakness: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndgamePractice {
    pub endgame_type: String,
    pub explanation: String,
}

/// Structured payload produced by the language model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub opening_analysis: OpeningAnalysis,
    #[serde(default)]
    pub tactical_motifs: Vec<TacticalMotif>,
    #[serde(default)]
    pub strategic_weaknesses: Vec<StrategicWeakness>,
    #[serde(default)]
    pub endgame_practice: Vec<EndgamePractice>,
    pub summary: String,
}

/// A finished analysis together with the context it was produced for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub data: AnalysisReport,
    pub player: String,
    pub game_date_range: String,
    pub analysis_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_uses_schema_names() {
        let json = r#"{
            "openingAnalysis": {"asWhite": "Play e4", "asBlack": "Learn the Caro-Kann"},
            "tacticalMotifs": [{"motif": "Fork", "explanation": "Knight forks"}],
            "strategicWeaknesses": [{"weakness": "Pawn structure", "explanation": "Isolani"}],
            "endgamePractice": [{"endgameType": "Rook endings", "explanation": "Lucena"}],
            "summary": "Focus on tactics."
        }"#;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.opening_analysis.as_black, "Learn the Caro-Kann");
        assert_eq!(report.endgame_practice[0].endgame_type, "Rook endings");

        let back = serde_json::to_value(&report).unwrap();
        assert_eq!(back["tacticalMotifs"][0]["motif"], "Fork");
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let json = r#"{"openingAnalysis": {"asWhite": "", "asBlack": ""}, "summary": "ok"}"#;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert!(report.tactical_motifs.is_empty());
        assert!(report.endgame_practice.is_empty());
    }
}
