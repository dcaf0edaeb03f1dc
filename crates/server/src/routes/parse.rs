use axum::Json;
use chess_core::{parse_pgn_with, DateScope};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::error::AppError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub pgn: String,
    /// Skip detection and filter for this player.
    pub username: Option<String>,
    #[serde(default)]
    pub date_scope: DateScope,
}

/// POST /api/pgn/parse
///
/// Preview of what an analysis would work on.
pub async fn parse_pgn(Json(req): Json<ParseRequest>) -> Result<Json<JsonValue>, AppError> {
    if req.pgn.len() > super::MAX_PGN_BYTES {
        return Err(AppError::BadRequest("PGN file is too large".into()));
    }

    let result = parse_pgn_with(&req.pgn, req.username.as_deref(), req.date_scope);
    Ok(Json(json!({
        "status": result.status(),
        "detectedUser": result.detected_user,
        "gameCount": result.game_count,
        "lostGameCount": result.lost_games_pgn.len(),
        "gameDates": result.game_dates,
        "gameDateRange": result.date_range(),
    })))
}
