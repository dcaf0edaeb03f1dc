use std::sync::Arc;

use analysis_client::{
    AnalysisOutcome, AnalysisPipeline, Language, LichessClient, ProviderId, RunOptions,
};
use axum::{Extension, Json};
use chess_core::DateScope;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::error::AppError;
use crate::usage_log::UsageLog;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequestBody {
    /// Uploaded PGN. When absent the games are fetched for `lichessUser`.
    pub pgn: Option<String>,
    pub lichess_user: Option<String>,
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub language: Option<Language>,
    #[serde(default)]
    pub date_scope: DateScope,
}

/// POST /api/analysis
pub async fn analyze(
    Extension(pipeline): Extension<Arc<AnalysisPipeline>>,
    Extension(lichess): Extension<Arc<LichessClient>>,
    Extension(usage): Extension<UsageLog>,
    Json(req): Json<AnalysisRequestBody>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let lichess_user = req
        .lichess_user
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let pgn = match (req.pgn, lichess_user) {
        (Some(pgn), _) if !pgn.trim().is_empty() => pgn,
        (_, Some(user)) => lichess.fetch_pgn(user).await?,
        _ => {
            return Err(AppError::BadRequest(
                "Provide a PGN file or a Lichess username".into(),
            ))
        }
    };
    if pgn.len() > super::MAX_PGN_BYTES {
        return Err(AppError::BadRequest("PGN file is too large".into()));
    }

    let options = RunOptions {
        provider: req.provider.as_deref().map(str::parse::<ProviderId>).transpose()?,
        api_key: req.api_key,
        language: req.language,
        date_scope: req.date_scope,
    };

    let outcome = pipeline.run_with(&pgn, lichess_user, &options).await?;
    if let AnalysisOutcome::Completed { report } = &outcome {
        // Usage logging must never fail the request.
        if let Err(e) = usage.record(&report.player).await {
            tracing::warn!("Usage logging failed: {e}");
        }
    }
    Ok(Json(outcome))
}

/// GET /api/providers
pub async fn list_providers(
    Extension(pipeline): Extension<Arc<AnalysisPipeline>>,
) -> Json<JsonValue> {
    let config = pipeline.config();
    let providers: Vec<JsonValue> = ProviderId::ALL
        .into_iter()
        .map(|id| {
            json!({
                "info": id.info(),
                "configured": config.api_key(id).is_some(),
            })
        })
        .collect();

    Json(json!({
        "default": config.provider,
        "providers": providers,
    }))
}
