//! Synthetic documents for unit tests.

use std::future::Future;

use image::RgbaImage;

use crate::error::ExportError;
use crate::layout::{Bounds, Measure, NodeRef, RasterOptions, Rasterizer, RenderedDocument};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Root,
    Card,
    Section,
}

#[derive(Debug, Clone)]
struct Node {
    kind: Kind,
    id: Option<String>,
    bounds: Bounds,
}

/// Flat list of measured nodes. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct FixtureDoc {
    width: f32,
    nodes: Vec<Node>,
    max_scale: Option<f32>,
}

impl FixtureDoc {
    pub fn new(height: f32) -> Self {
        Self {
            width: 500.0,
            nodes: vec![Node {
                kind: Kind::Root,
                id: None,
                bounds: Bounds::new(0.0, height),
            }],
            max_scale: None,
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Moves the root; node offsets passed afterwards are absolute.
    pub fn with_origin(mut self, top: f32) -> Self {
        self.nodes[0].bounds.top = top;
        self
    }

    /// Rasterizing above this scale fails.
    pub fn failing_above(mut self, scale: f32) -> Self {
        self.max_scale = Some(scale);
        self
    }

    pub fn card(self, top: f32, height: f32) -> Self {
        self.push(Kind::Card, None, top, height)
    }

    pub fn named_card(self, id: &str, top: f32, height: f32) -> Self {
        self.push(Kind::Card, Some(id.to_string()), top, height)
    }

    pub fn section(self, top: f32, height: f32) -> Self {
        self.push(Kind::Section, None, top, height)
    }

    fn push(mut self, kind: Kind, id: Option<String>, top: f32, height: f32) -> Self {
        self.nodes.push(Node {
            kind,
            id,
            bounds: Bounds::new(top, height),
        });
        self
    }

    fn of_kind(&self, kind: Kind) -> Vec<NodeRef> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == kind)
            .map(|(i, _)| NodeRef(i))
            .collect()
    }
}

impl Measure for FixtureDoc {
    fn measure(&self, node: NodeRef) -> Bounds {
        self.nodes[node.0].bounds
    }
}

impl RenderedDocument for FixtureDoc {
    fn root(&self) -> NodeRef {
        NodeRef(0)
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn cards(&self) -> Vec<NodeRef> {
        self.of_kind(Kind::Card)
    }

    fn sections(&self) -> Vec<NodeRef> {
        self.of_kind(Kind::Section)
    }

    fn node_id(&self, node: NodeRef) -> Option<String> {
        self.nodes[node.0].id.clone()
    }
}

impl Rasterizer for FixtureDoc {
    fn rasterize(
        &self,
        options: &RasterOptions,
    ) -> impl Future<Output = Result<RgbaImage, ExportError>> + Send {
        let result = match self.max_scale {
            Some(max) if options.scale > max => {
                Err(ExportError::generation("bitmap exceeds canvas limit"))
            }
            _ => {
                let w = (self.width * options.scale).ceil() as u32;
                let h = (self.height() * options.scale).ceil() as u32;
                Ok(RgbaImage::from_pixel(w, h, options.background))
            }
        };
        std::future::ready(result)
    }
}
