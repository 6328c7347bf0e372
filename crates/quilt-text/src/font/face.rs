use hashbrown::HashMap;

use crate::font::{FontError, Glyph, Result};
use crate::layout::options::FontStyle;

/// Face-level metrics, expressed at `point_size`.
#[derive(Debug, Clone, Copy)]
pub struct FaceMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (negative).
    pub descent: f32,
    /// Baseline-to-baseline distance.
    pub line_height: f32,
    /// Size the atlas glyphs were rasterized at.
    pub point_size: f32,
}

/// Per-style rendering parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceStyle {
    /// Extra advance between glyphs, in percent of the base advance.
    pub spacing: f32,
    /// Quad inflation around the tight glyph box, in atlas texels.
    pub padding: f32,
}

/// An atlas-backed font face: metrics plus a codepoint-to-glyph table.
///
/// The face does not own pixel data; it only describes where each glyph
/// lives in an external atlas texture and how to place it on a baseline.
#[derive(Debug, Clone)]
pub struct FontFace {
    family: String,
    metrics: FaceMetrics,
    atlas_size: [u32; 2],
    normal: FaceStyle,
    bold: FaceStyle,
    glyphs: HashMap<char, Glyph>,
}

impl FontFace {
    /// Create an empty face. Fails if `point_size` is not positive,
    /// since every scale factor divides by it.
    pub fn new(family: impl Into<String>, metrics: FaceMetrics, atlas_size: [u32; 2]) -> Result<Self> {
        let family = family.into();
        if metrics.point_size <= 0.0 {
            return Err(FontError::InvalidMetrics(family));
        }
        Ok(Self {
            family,
            metrics,
            atlas_size,
            normal: FaceStyle::default(),
            bold: FaceStyle::default(),
            glyphs: HashMap::new(),
        })
    }

    /// Set the per-style parameters (builder style).
    pub fn with_styles(mut self, normal: FaceStyle, bold: FaceStyle) -> Self {
        self.normal = normal;
        self.bold = bold;
        self
    }

    /// Insert or replace a glyph. Returns `self` for chaining.
    pub fn with_glyph(mut self, glyph: Glyph) -> Self {
        self.add_glyph(glyph);
        self
    }

    pub fn add_glyph(&mut self, glyph: Glyph) {
        self.glyphs.insert(glyph.codepoint, glyph);
    }

    /// Look up the glyph for a codepoint. Codepoints absent from the
    /// table take no space and emit no geometry.
    pub fn glyph(&self, codepoint: char) -> Option<&Glyph> {
        self.glyphs.get(&codepoint)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    pub fn atlas_size(&self) -> [u32; 2] {
        self.atlas_size
    }

    pub fn style(&self, style: FontStyle) -> FaceStyle {
        match style {
            FontStyle::Normal => self.normal,
            FontStyle::Bold => self.bold,
        }
    }

    /// Scale factor from atlas units to a requested text size.
    pub fn scale_for(&self, text_size: f32) -> f32 {
        text_size / self.metrics.point_size
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}
