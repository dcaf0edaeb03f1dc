//! Layout-aware PDF export of coaching reports.
//!
//! A rendered document is measured, candidate page breaks are taken at
//! card and section boundaries, breaks that would strand small fragments
//! are dropped, and the rasterized document is cut into A4 pages.

pub mod breaks;
pub mod compositor;
pub mod error;
pub mod layout;
pub mod orphans;
pub mod page;
pub mod report_layout;
pub mod text;

#[cfg(test)]
mod testing;

pub use breaks::{calculate_optimal_breaks, find_break_points, BreakKind, BreakPoint, BreakPriority};
pub use compositor::{fallback_pdf_file_name, pdf_file_name, plan_pages, PageSlice, PdfArtifact, PdfExporter};
pub use error::ExportError;
pub use layout::{Bounds, Measure, NodeRef, RasterOptions, Rasterizer, RenderedDocument};
pub use orphans::filter_orphans;
pub use page::{ContentProfile, Margins, Orientation, PageBreakStrategy, PageDimensions, PdfConfig};
pub use report_layout::ReportLayout;
pub use text::plain_text_report;
