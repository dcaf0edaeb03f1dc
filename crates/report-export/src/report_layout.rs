//! Box layout of a coaching report, measured in document pixels.
//!
//! The layout stands in for the rendered report view: every card and
//! section heading is a positioned box, and text is wrapped to the card
//! width so heights track the content. Rasterization draws the text with
//! monospace bitmap fonts, one document pixel becoming a `scale`-sized
//! block of the output bitmap.

use std::future::Future;

use chess_core::Report;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    mono_font::{
        iso_8859_1::{FONT_10X20, FONT_7X14, FONT_9X18_BOLD},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::{Rgb888, RgbColor},
    text::{Baseline, Text},
    Drawable, Pixel,
};
use image::{Rgba, RgbaImage};
use unicode_width::UnicodeWidthStr;

use crate::error::ExportError;
use crate::layout::{Bounds, Measure, NodeRef, RasterOptions, Rasterizer, RenderedDocument};

pub const LAYOUT_WIDTH: f32 = 760.0;

const PAGE_PADDING: f32 = 24.0;
const CARD_PADDING: f32 = 16.0;
const GAP: f32 = 16.0;
const LINE_HEIGHT: f32 = 20.0;
const TITLE_HEIGHT: f32 = 28.0;
const HEADING_HEIGHT: f32 = 36.0;
/// Advance of one text column; at least the body font's glyph width.
const CHAR_WIDTH: f32 = 7.5;

const BODY_FONT: &MonoFont<'static> = &FONT_7X14;
const TITLE_FONT: &MonoFont<'static> = &FONT_9X18_BOLD;
const HEADING_FONT: &MonoFont<'static> = &FONT_10X20;

/// Largest bitmap edge and area a rasterization may produce.
pub const MAX_CANVAS_DIMENSION: u32 = 32_767;
pub const MAX_CANVAS_AREA: u64 = 268_435_456;

const CARD_FILL: Rgba<u8> = Rgba([248, 250, 252, 255]);
const CARD_BORDER: Rgba<u8> = Rgba([226, 232, 240, 255]);
const HEADING_INK: Rgb888 = Rgb888::new(30, 64, 175);
const TITLE_INK: Rgb888 = Rgb888::new(15, 23, 42);
const BODY_INK: Rgb888 = Rgb888::new(71, 85, 105);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoxKind {
    Root,
    Section,
    Card,
}

#[derive(Debug, Clone)]
struct LayoutBox {
    kind: BoxKind,
    id: Option<String>,
    bounds: Bounds,
    title: String,
    lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReportLayout {
    width: f32,
    boxes: Vec<LayoutBox>,
}

impl ReportLayout {
    pub fn new(report: &Report) -> Self {
        Self::with_width(report, LAYOUT_WIDTH)
    }

    pub fn with_width(report: &Report, width: f32) -> Self {
        let mut builder = Builder::new(width);
        let data = &report.data;

        builder.section(
            Some("report-header"),
            "ChessTrax AI Coach",
            vec![
                format!("Lichess Username: {}", report.player),
                format!("Analysis Date: {}", report.analysis_date.format("%Y-%m-%d")),
                format!("Game Period Covered: {}", report.game_date_range),
            ],
        );

        builder.section(Some("primary-focus"), "Primary Focus", Vec::new());
        builder.card("Summary", &data.summary);

        builder.section(Some("opening-analysis"), "Opening Analysis", Vec::new());
        builder.card("As White", &data.opening_analysis.as_white);
        builder.card("As Black", &data.opening_analysis.as_black);

        if !data.tactical_motifs.is_empty() {
            builder.section(Some("tactical-motifs"), "Tactical Blind-Spots", Vec::new());
            for m in &data.tactical_motifs {
                builder.card(&m.motif, &m.explanation);
            }
        }
        if !data.strategic_weaknesses.is_empty() {
            builder.section(
                Some("strategic-weaknesses"),
                "Strategic Weaknesses",
                Vec::new(),
            );
            for w in &data.strategic_weaknesses {
                builder.card(&w.weakness, &w.explanation);
            }
        }
        if !data.endgame_practice.is_empty() {
            builder.section(Some("endgame-practice"), "Endgame Training", Vec::new());
            for e in &data.endgame_practice {
                builder.card(&e.endgame_type, &e.explanation);
            }
        }

        builder.finish()
    }

    fn of_kind(&self, kind: BoxKind) -> Vec<NodeRef> {
        self.boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.kind == kind)
            .map(|(i, _)| NodeRef(i))
            .collect()
    }

    fn paint(&self, options: &RasterOptions) -> Result<RgbaImage, ExportError> {
        let scale = options.scale;
        let w = (self.width * scale).ceil() as u32;
        let h = (self.height() * scale).ceil() as u32;
        if w == 0 || h == 0 {
            return Err(ExportError::generation("nothing to rasterize"));
        }
        if w > MAX_CANVAS_DIMENSION
            || h > MAX_CANVAS_DIMENSION
            || u64::from(w) * u64::from(h) > MAX_CANVAS_AREA
        {
            return Err(ExportError::generation(format!(
                "bitmap of {w}x{h} exceeds canvas limit"
            )));
        }

        let mut canvas = Canvas {
            image: RgbaImage::from_pixel(w, h, options.background),
            scale,
            size: Size::new(self.width.ceil() as u32, self.height().ceil() as u32),
        };
        let left = PAGE_PADDING;
        let right = self.width - PAGE_PADDING;

        for b in &self.boxes {
            let top = b.bounds.top;
            match b.kind {
                BoxKind::Root => {}
                BoxKind::Section => {
                    canvas.text(left, top, &b.title, HEADING_HEIGHT, HEADING_FONT, HEADING_INK);
                    for (i, line) in b.lines.iter().enumerate() {
                        let y = top + HEADING_HEIGHT + i as f32 * LINE_HEIGHT;
                        canvas.text(left, y, line, LINE_HEIGHT, BODY_FONT, BODY_INK);
                    }
                }
                BoxKind::Card => {
                    canvas.fill(left, top, right, b.bounds.bottom(), CARD_BORDER);
                    canvas.fill(left + 1.0, top + 1.0, right - 1.0, b.bounds.bottom() - 1.0, CARD_FILL);
                    let x = left + CARD_PADDING;
                    let y = top + CARD_PADDING;
                    canvas.text(x, y, &b.title, TITLE_HEIGHT, TITLE_FONT, TITLE_INK);
                    for (i, line) in b.lines.iter().enumerate() {
                        let y = y + TITLE_HEIGHT + i as f32 * LINE_HEIGHT;
                        canvas.text(x, y, line, LINE_HEIGHT, BODY_FONT, BODY_INK);
                    }
                }
            }
        }
        Ok(canvas.image)
    }
}

impl Measure for ReportLayout {
    fn measure(&self, node: NodeRef) -> Bounds {
        self.boxes.get(node.0).map(|b| b.bounds).unwrap_or_default()
    }
}

impl RenderedDocument for ReportLayout {
    fn root(&self) -> NodeRef {
        NodeRef(0)
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn cards(&self) -> Vec<NodeRef> {
        self.of_kind(BoxKind::Card)
    }

    fn sections(&self) -> Vec<NodeRef> {
        self.of_kind(BoxKind::Section)
    }

    fn node_id(&self, node: NodeRef) -> Option<String> {
        self.boxes.get(node.0).and_then(|b| b.id.clone())
    }
}

impl Rasterizer for ReportLayout {
    fn rasterize(
        &self,
        options: &RasterOptions,
    ) -> impl Future<Output = Result<RgbaImage, ExportError>> + Send {
        std::future::ready(self.paint(options))
    }
}

struct Builder {
    width: f32,
    columns: usize,
    cursor: f32,
    boxes: Vec<LayoutBox>,
}

impl Builder {
    fn new(width: f32) -> Self {
        let inner = width - 2.0 * (PAGE_PADDING + CARD_PADDING);
        Self {
            width,
            columns: (inner / CHAR_WIDTH).floor().max(1.0) as usize,
            cursor: PAGE_PADDING,
            boxes: vec![LayoutBox {
                kind: BoxKind::Root,
                id: Some("report-root".to_string()),
                bounds: Bounds::default(),
                title: String::new(),
                lines: Vec::new(),
            }],
        }
    }

    fn section(&mut self, id: Option<&str>, title: &str, lines: Vec<String>) {
        let height = HEADING_HEIGHT + lines.len() as f32 * LINE_HEIGHT;
        self.push(BoxKind::Section, id, title, lines, height);
    }

    fn card(&mut self, title: &str, body: &str) {
        let lines: Vec<String> = body
            .lines()
            .flat_map(|paragraph| wrap_text(paragraph, self.columns))
            .collect();
        let height = 2.0 * CARD_PADDING + TITLE_HEIGHT + lines.len() as f32 * LINE_HEIGHT;
        self.push(BoxKind::Card, None, title, lines, height);
    }

    fn push(&mut self, kind: BoxKind, id: Option<&str>, title: &str, lines: Vec<String>, height: f32) {
        self.boxes.push(LayoutBox {
            kind,
            id: id.map(str::to_string),
            bounds: Bounds::new(self.cursor, height),
            title: title.to_string(),
            lines,
        });
        self.cursor += height + GAP;
    }

    fn finish(mut self) -> ReportLayout {
        let height = self.cursor - GAP + PAGE_PADDING;
        self.boxes[0].bounds = Bounds::new(0.0, height);
        ReportLayout {
            width: self.width,
            boxes: self.boxes,
        }
    }
}

/// Greedy word wrap by display width. Words longer than a line are split.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);
        let sep = usize::from(!current.is_empty());
        if current_width + sep + word_width <= max_width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += sep + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= max_width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for ch in word.chars() {
            let mut buf = [0u8; 4];
            let w = UnicodeWidthStr::width(&*ch.encode_utf8(&mut buf));
            if current_width + w > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Bitmap addressed in document pixels.
struct Canvas {
    image: RgbaImage,
    scale: f32,
    /// Document extent, the coordinate space glyphs are drawn in.
    size: Size,
}

impl Canvas {
    /// Fill a rectangle given in document pixels.
    fn fill(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba<u8>) {
        let (w, h) = self.image.dimensions();
        let px = |v: f32, max: u32| ((v * self.scale).round().max(0.0) as u32).min(max);
        let (x0, x1) = (px(x0, w), px(x1, w));
        let (y0, y1) = (px(y0, h), px(y1, h));
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    /// One line of text, vertically centred in a row `line_height` tall.
    fn text(
        &mut self,
        x: f32,
        top: f32,
        text: &str,
        line_height: f32,
        font: &MonoFont<'static>,
        ink: Rgb888,
    ) {
        let glyph_height = font.character_size.height as f32;
        let y = top + ((line_height - glyph_height) / 2.0).max(0.0);
        let origin = Point::new(x.round() as i32, y.round() as i32);
        let style = MonoTextStyle::new(font, ink);
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(self);
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as f32, point.y as f32);
            let rgba = Rgba([color.r(), color.g(), color.b(), 255]);
            self.fill(x, y, x + 1.0, y + 1.0, rgba);
        }
        Ok(())
    }
}
