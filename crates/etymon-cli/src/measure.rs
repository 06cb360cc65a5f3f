//! Node measurement with real font metrics.
//!
//! The CLI plays the part of the rendering host: it sizes every node from its
//! label lines, shaped with cosmic-text, plus a fixed padding.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, trace};

use etymon::{
    geometry::{Insets, Size},
    node::GraphNode,
};

const DEFAULT_FONT_SIZE: f32 = 14.0;
const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Average glyph advance relative to the font size, used when shaping yields
/// no glyphs (e.g. no fonts installed).
const FALLBACK_ADVANCE: f32 = 0.55;

/// Sizes nodes the way the SVG export draws them.
pub struct NodeMeasurer {
    font_system: FontSystem,
    font_size: f32,
    font_family: String,
    padding: Insets,
}

impl NodeMeasurer {
    /// Creates a measurer, loading the system fonts once.
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: FontSystem::new(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            padding: Insets::new(10.0, 16.0, 10.0, 16.0),
        }
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Measures `node`: its widest label line by the sum of line heights,
    /// padded.
    pub fn measure(&mut self, node: &GraphNode) -> Size {
        let text_size = node
            .kind()
            .label_lines()
            .iter()
            .map(|line| self.measure_line(line))
            .fold(Size::default(), Size::merge_vertical);

        let size = text_size.add_padding(self.padding);
        trace!(id:% = node.id(), width = size.width(), height = size.height(); "Measured node");
        size
    }

    fn line_height(&self) -> f32 {
        self.font_size * 1.15
    }

    /// Measures one line of text.
    ///
    /// Falls back to an estimate from the character count when shaping
    /// produces no glyphs.
    fn measure_line(&mut self, text: &str) -> Size {
        let line_height = self.line_height();
        if text.is_empty() {
            return Size::new(0.0, line_height);
        }

        let metrics = Metrics::new(self.font_size, line_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut self.font_system);

        let attrs = Attrs::new().family(Family::Name(&self.font_family));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
            .fold(0.0_f32, f32::max);

        if width > 0.0 {
            Size::new(width, line_height)
        } else {
            Size::new(estimate_width(text, self.font_size), line_height)
        }
    }
}

impl Default for NodeMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * FALLBACK_ADVANCE
}
