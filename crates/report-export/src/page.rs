//! A4 page geometry and export settings.

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
/// Millimetres to CSS pixels at 96 DPI.
pub const MM_TO_PX: f32 = 3.779_527_6;
/// Margins are never thinner than this, so the printable area is always
/// strictly smaller than the sheet.
pub const MIN_MARGIN_MM: f32 = 1.0;

/// Rasterization scale used by the mixed-content preset.
pub const PRINT_SCALE_FACTOR: f32 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    fn clamped(self) -> Self {
        let side = |mm: f32| if mm.is_finite() { mm.max(MIN_MARGIN_MM) } else { MIN_MARGIN_MM };
        Self::new(side(self.top), side(self.right), side(self.bottom), side(self.left))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageBreakStrategy {
    /// Split at card/section boundaries.
    #[default]
    Auto,
    /// Slice at fixed page-height intervals.
    Manual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentProfile {
    TextHeavy,
    #[default]
    Mixed,
    ImageHeavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfConfig {
    pub orientation: Orientation,
    /// Millimetres.
    pub margins: Margins,
    pub page_break_strategy: PageBreakStrategy,
    /// Bitmap pixels per document pixel.
    pub scale: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self::for_content(ContentProfile::Mixed)
    }
}

impl PdfConfig {
    pub fn for_content(profile: ContentProfile) -> Self {
        let (margins, scale) = match profile {
            ContentProfile::TextHeavy => (Margins::new(25.0, 20.0, 25.0, 20.0), 2.0),
            ContentProfile::Mixed => (Margins::new(20.0, 15.0, 20.0, 15.0), PRINT_SCALE_FACTOR),
            ContentProfile::ImageHeavy => (Margins::new(15.0, 10.0, 15.0, 10.0), 3.0),
        };
        Self {
            orientation: Orientation::Portrait,
            margins,
            page_break_strategy: PageBreakStrategy::Auto,
            scale,
        }
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ExportError::InvalidConfig(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        let dims = PageDimensions::a4(self);
        if dims.content_width <= 0.0 || dims.content_height <= 0.0 {
            return Err(ExportError::InvalidConfig(
                "margins leave no printable area".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sheet and printable area in CSS pixels (96 DPI).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
    pub content_width: f32,
    pub content_height: f32,
    pub margin_left: f32,
    pub margin_top: f32,
}

impl PageDimensions {
    pub fn a4(config: &PdfConfig) -> Self {
        let (width_mm, height_mm) = match config.orientation {
            Orientation::Portrait => (A4_WIDTH_MM, A4_HEIGHT_MM),
            Orientation::Landscape => (A4_HEIGHT_MM, A4_WIDTH_MM),
        };
        let m = config.margins.clamped();

        let width = width_mm * MM_TO_PX;
        let height = height_mm * MM_TO_PX;
        Self {
            width,
            height,
            content_width: width - (m.left + m.right) * MM_TO_PX,
            content_height: height - (m.top + m.bottom) * MM_TO_PX,
            margin_left: m.left * MM_TO_PX,
            margin_top: m.top * MM_TO_PX,
        }
    }

    /// Document pixels that fit on one page once a document `doc_width`
    /// pixels wide is scaled to the printable width.
    pub fn capacity_for(&self, doc_width: f32) -> f32 {
        self.content_height * doc_width / self.content_width
    }
}

pub fn px_to_mm(px: f32) -> f32 {
    px / MM_TO_PX
}
