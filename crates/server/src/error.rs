use analysis_client::AnalysisError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use report_export::ExportError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Analysis(e) => {
                let status = match e {
                    AnalysisError::UserNotFound(_) => StatusCode::NOT_FOUND,
                    AnalysisError::UnknownProvider(_) | AnalysisError::MissingApiKey(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    _ => {
                        tracing::warn!("Analysis failed: {e}");
                        StatusCode::BAD_GATEWAY
                    }
                };
                (status, e.to_string())
            }
            AppError::Export(e) => {
                tracing::error!("PDF export failed: {e}");
                let status = match e {
                    ExportError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_client::ProviderId;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::BadRequest("Invalid username".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AnalysisError::UserNotFound("ghost".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AnalysisError::MissingApiKey(ProviderId::Gemini).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AnalysisError::RetriesExhausted("HTTP 503: busy".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ExportError::InvalidConfig("scale".into()).into()),
            StatusCode::BAD_REQUEST
        );
    }
}
