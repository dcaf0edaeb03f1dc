use axum::{
    extract::Query,
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chess_core::Report;
use report_export::{plain_text_report, ContentProfile, PdfConfig, PdfExporter, ReportLayout};
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct PdfQuery {
    /// Overrides the configured preset.
    pub profile: Option<ContentProfile>,
}

/// POST /api/export/pdf
pub async fn export_pdf(
    Extension(config): Extension<Config>,
    Query(q): Query<PdfQuery>,
    Json(report): Json<Report>,
) -> Result<Response, AppError> {
    let pdf_config = q.profile.map(PdfConfig::for_content).unwrap_or(config.pdf);
    let layout = ReportLayout::new(&report);
    let artifact = PdfExporter::new(pdf_config)
        .export_with_fallback(&layout, &report.player)
        .await?;

    tracing::info!(
        player = %report.player,
        pages = artifact.page_count,
        bytes = artifact.bytes.len(),
        "Exported analysis PDF"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.name),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// POST /api/export/text
pub async fn export_text(Json(report): Json<Report>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        plain_text_report(&report),
    )
}
