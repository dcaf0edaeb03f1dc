use std::env;
use std::path::PathBuf;

use analysis_client::AnalysisConfig;
use report_export::{ContentProfile, PdfConfig};

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding `usage.log`
    pub usage_log_dir: PathBuf,
    pub analysis: AnalysisConfig,
    pub pdf: PdfConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let profile = match env::var("PDF_CONTENT_PROFILE").as_deref() {
            Ok("text-heavy") => ContentProfile::TextHeavy,
            Ok("image-heavy") => ContentProfile::ImageHeavy,
            _ => ContentProfile::Mixed,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3020),
            usage_log_dir: env::var("USAGE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs/chesstrax")),
            analysis: AnalysisConfig::from_env(),
            pdf: PdfConfig::for_content(profile),
        }
    }
}
