//! quilt-text: atlas-backed font store and text layout engine.
//!
//! Fonts are pre-rasterized glyph atlases described by per-glyph metrics
//! (advance, bearing, size, atlas rectangle). Layout happens in two steps:
//! a greedy word-wrapping line breaker over a character slice, then a
//! typesetting pass that aligns each line inside a target box and emits
//! one positioned quad per renderable glyph.

pub mod font;
pub mod layout;

pub use font::{
    face::{FaceMetrics, FaceStyle, FontFace},
    glyph::{AtlasRect, Glyph},
    registry::{FontId, FontRegistry},
    FontError,
};

pub use layout::{
    line_breaker::{break_lines, LineInfo},
    options::{FontStyle, HorizontalAlign, TextAlignment, TextOptions, VerticalAlign},
    typesetter::{count_renderable_glyphs, layout_text, GlyphQuad, TextLayout},
};
