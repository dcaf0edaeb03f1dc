//! Export error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// Rasterization or page assembly failed. Carries the underlying message.
    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("Invalid PDF configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Wrap any failure from the rasterize/compose stage, without stacking
    /// the prefix when it is already a generation error.
    pub fn generation(err: impl std::fmt::Display) -> Self {
        ExportError::PdfGeneration(err.to_string())
    }

    pub(crate) fn rewrap(self) -> Self {
        match self {
            ExportError::PdfGeneration(_) => self,
            other => ExportError::PdfGeneration(other.to_string()),
        }
    }
}
