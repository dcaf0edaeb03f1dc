//! Capabilities the pagination engine needs from a rendered document.

use std::future::Future;

use image::{Rgba, RgbaImage};

use crate::error::ExportError;

/// Vertical extent of a node, in document pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Opaque handle to a node inside a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub usize);

pub trait Measure {
    fn measure(&self, node: NodeRef) -> Bounds;
}

/// A laid-out document whose structural units can be located and measured.
pub trait RenderedDocument: Measure {
    /// The subtree being exported. Offsets are taken relative to its top.
    fn root(&self) -> NodeRef;

    fn width(&self) -> f32;

    /// Self-contained units that should not be split, in document order.
    fn cards(&self) -> Vec<NodeRef>;

    /// Headings and top-level content groups, in document order.
    fn sections(&self) -> Vec<NodeRef>;

    fn node_id(&self, node: NodeRef) -> Option<String>;

    fn height(&self) -> f32 {
        self.measure(self.root()).height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Bitmap pixels per document pixel.
    pub scale: f32,
    pub background: Rgba<u8>,
}

pub const PRINT_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

impl RasterOptions {
    pub fn print(scale: f32) -> Self {
        Self {
            scale,
            background: PRINT_BACKGROUND,
        }
    }
}

/// Paints a whole document into one bitmap.
pub trait Rasterizer {
    fn rasterize(
        &self,
        options: &RasterOptions,
    ) -> impl Future<Output = Result<RgbaImage, ExportError>> + Send;
}
