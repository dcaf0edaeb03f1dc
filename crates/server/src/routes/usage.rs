use axum::{Extension, Json};
use serde_json::{json, Value as JsonValue};

use crate::error::AppError;
use crate::usage_log::UsageLog;

/// POST /api/log-usage (also /api/log)
pub async fn log_usage(
    Extension(log): Extension<UsageLog>,
    Json(body): Json<JsonValue>,
) -> Result<Json<JsonValue>, AppError> {
    let username = body
        .get("username")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Invalid username received: {}", body.get("username").unwrap_or(&JsonValue::Null));
            AppError::BadRequest("Invalid username".into())
        })?;

    log.record(username).await?;
    Ok(Json(json!({ "message": "Log saved" })))
}
