//! Bitmap-to-PDF page composition.

use std::path::{Path, PathBuf};

use image::{imageops, DynamicImage, RgbaImage};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, RawImage, RawImageData, RawImageFormat,
    XObjectTransform,
};
use tracing::{debug, info, warn};

use crate::breaks::{calculate_optimal_breaks, BreakPoint};
use crate::error::ExportError;
use crate::layout::{RasterOptions, Rasterizer, RenderedDocument};
use crate::page::{px_to_mm, PageBreakStrategy, PageDimensions, PdfConfig};

pub const APP_NAME: &str = "ChessTrax";

/// Raster scale used by the degraded single-bitmap path.
pub const FALLBACK_SCALE: f32 = 2.0;

/// Offsets closer than this are treated as the same boundary.
const BOUNDARY_EPSILON: f32 = 0.5;

/// Image resolution handed to the PDF writer; 72 DPI makes one bitmap
/// pixel one point before scaling.
const IMAGE_DPI: f32 = 72.0;

/// `ChessTrax_Analysis_<player>.pdf`
pub fn pdf_file_name(player: &str) -> String {
    format!("{APP_NAME}_Analysis_{}.pdf", file_safe(player))
}

/// Name used when the intelligent export failed and the simple path ran.
pub fn fallback_pdf_file_name(player: &str) -> String {
    format!("{APP_NAME}_Analysis_{}_fallback.pdf", file_safe(player))
}

fn file_safe(player: &str) -> String {
    player.replace(['/', '\\'], "_")
}

/// A vertical strip of the document destined for one page, in document
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    pub top: f32,
    pub bottom: f32,
}

impl PageSlice {
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Choose page boundaries from the candidate breaks.
///
/// Each page ends at the furthest candidate that still fits; when no
/// candidate fits the strip is cut at the page height.
pub fn plan_pages(breaks: &[BreakPoint], doc_height: f32, page_height: f32) -> Vec<PageSlice> {
    if doc_height <= 0.0 || page_height <= 0.0 {
        return Vec::new();
    }

    let mut slices = Vec::new();
    let mut top = 0.0_f32;
    while doc_height - top > page_height + BOUNDARY_EPSILON {
        let limit = top + page_height;
        let cut = breaks
            .iter()
            .map(|b| b.y)
            .filter(|&y| y > top + BOUNDARY_EPSILON && y <= limit)
            .fold(None, |best: Option<f32>, y| Some(best.map_or(y, |b| b.max(y))))
            .unwrap_or(limit);
        slices.push(PageSlice { top, bottom: cut });
        top = cut;
    }
    slices.push(PageSlice {
        top,
        bottom: doc_height,
    });
    slices
}

/// A finished PDF held in memory.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl PdfArtifact {
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.name);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), pages = self.page_count, "Wrote PDF");
        Ok(path)
    }
}

/// Exports rendered documents as paginated A4 PDFs.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    config: PdfConfig,
}

impl PdfExporter {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PdfConfig {
        &self.config
    }

    pub fn page_dimensions(&self) -> PageDimensions {
        PageDimensions::a4(&self.config)
    }

    /// Export with content-aware page breaks (or fixed slicing when the
    /// configured strategy is manual).
    pub async fn export<D>(&self, doc: &D, name: &str) -> Result<PdfArtifact, ExportError>
    where
        D: RenderedDocument + Rasterizer + Sync,
    {
        self.config.validate()?;
        let dims = self.page_dimensions();
        let breaks = match self.config.page_break_strategy {
            PageBreakStrategy::Auto => calculate_optimal_breaks(doc, dims.capacity_for(doc.width())),
            PageBreakStrategy::Manual => Vec::new(),
        };
        self.compose(doc, &breaks, &dims, self.config.scale, name).await
    }

    /// Degraded path: one bitmap sliced at fixed page-height intervals.
    pub async fn export_simple<D>(&self, doc: &D, name: &str) -> Result<PdfArtifact, ExportError>
    where
        D: RenderedDocument + Rasterizer + Sync,
    {
        self.config.validate()?;
        let dims = self.page_dimensions();
        self.compose(doc, &[], &dims, FALLBACK_SCALE, name).await
    }

    /// Try the intelligent export and fall back to the simple one.
    pub async fn export_with_fallback<D>(
        &self,
        doc: &D,
        player: &str,
    ) -> Result<PdfArtifact, ExportError>
    where
        D: RenderedDocument + Rasterizer + Sync,
    {
        match self.export(doc, &pdf_file_name(player)).await {
            Ok(artifact) => Ok(artifact),
            Err(e) => {
                warn!(error = %e, "Intelligent PDF export failed, using simple export");
                self.export_simple(doc, &fallback_pdf_file_name(player))
                    .await
            }
        }
    }

    /// Rasterize once, cut the bitmap at the planned boundaries and place
    /// each strip on its own page.
    pub async fn compose<D>(
        &self,
        doc: &D,
        breaks: &[BreakPoint],
        dims: &PageDimensions,
        scale: f32,
        name: &str,
    ) -> Result<PdfArtifact, ExportError>
    where
        D: RenderedDocument + Rasterizer + Sync,
    {
        let bitmap = doc
            .rasterize(&RasterOptions::print(scale))
            .await
            .map_err(ExportError::rewrap)?;

        let doc_width = doc.width();
        let doc_height = doc.height();
        if doc_width <= 0.0 || doc_height <= 0.0 || bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(ExportError::generation("document has no visible content"));
        }

        // Page pixels per document pixel.
        let to_page = dims.content_width / doc_width;
        let slices = if doc_height * to_page <= dims.content_height {
            vec![PageSlice {
                top: 0.0,
                bottom: doc_height,
            }]
        } else {
            plan_pages(breaks, doc_height, dims.capacity_for(doc_width))
        };
        debug!(pages = slices.len(), breaks = breaks.len(), "Planned PDF pages");

        let mut pdf = PdfDocument::new(name);
        let bitmap_per_doc = bitmap.height() as f32 / doc_height;
        let mut pages = Vec::with_capacity(slices.len());
        for slice in &slices {
            let strip = crop_strip(&bitmap, slice, bitmap_per_doc)?;
            pages.push(place_strip(&mut pdf, strip, slice.height() * to_page, dims));
        }

        let page_count = pages.len();
        pdf.with_pages(pages);
        let mut warnings = Vec::new();
        let bytes = pdf.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "PDF writer reported warnings");
        }

        Ok(PdfArtifact {
            name: name.to_string(),
            bytes,
            page_count,
        })
    }
}

fn crop_strip(
    bitmap: &RgbaImage,
    slice: &PageSlice,
    bitmap_per_doc: f32,
) -> Result<RgbaImage, ExportError> {
    let y0 = ((slice.top * bitmap_per_doc).round() as u32).min(bitmap.height());
    let y1 = ((slice.bottom * bitmap_per_doc).round() as u32).min(bitmap.height());
    if y1 <= y0 {
        return Err(ExportError::generation(format!(
            "empty page strip at {:.1}px",
            slice.top
        )));
    }
    Ok(imageops::crop_imm(bitmap, 0, y0, bitmap.width(), y1 - y0).to_image())
}

/// One page with `strip` drawn at the top-left margin, scaled to the
/// printable width. `height_px` is the strip's height on the page.
fn place_strip(
    pdf: &mut PdfDocument,
    strip: RgbaImage,
    height_px: f32,
    dims: &PageDimensions,
) -> PdfPage {
    let strip_width = strip.width();
    let rgb = DynamicImage::ImageRgba8(strip).to_rgb8();
    let image = RawImage {
        width: rgb.width() as usize,
        height: rgb.height() as usize,
        data_format: RawImageFormat::RGB8,
        pixels: RawImageData::U8(rgb.into_raw()),
        tag: Vec::new(),
    };
    let image_id = pdf.add_image(&image);

    let page_width = Mm(px_to_mm(dims.width));
    let page_height = Mm(px_to_mm(dims.height));
    let bottom_mm = px_to_mm(dims.height - dims.margin_top - height_px);
    let scale = Mm(px_to_mm(dims.content_width)).into_pt().0 / strip_width as f32;

    let ops = vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Mm(px_to_mm(dims.margin_left)).into_pt()),
            translate_y: Some(Mm(bottom_mm).into_pt()),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    }];
    PdfPage::new(page_width, page_height, ops)
}
