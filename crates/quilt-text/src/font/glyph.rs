/// Axis-aligned rectangle in atlas texels (origin at the atlas top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AtlasRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl AtlasRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Pre-rasterized glyph: metrics plus its rectangle in the font atlas.
///
/// All distances are expressed at the face's `point_size` and get scaled
/// by `scale` first (per-glyph correction for glyphs rasterized at a
/// different size than the rest of the atlas) and then by the requested
/// text size.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    /// Codepoint this glyph renders.
    pub codepoint: char,
    /// Pen advance to the next glyph.
    pub advance: f32,
    /// Offset from the pen position to the glyph box: x to the left
    /// edge, y from the baseline up to the top edge.
    pub bearing: [f32; 2],
    /// Width and height of the glyph box.
    pub size: [f32; 2],
    /// Per-glyph scale correction.
    pub scale: f32,
    /// Tight rectangle in the atlas, in texels.
    pub raw_uv: AtlasRect,
}

impl Glyph {
    /// Glyph with no visible box (used for spacing-only codepoints).
    pub fn spacing(codepoint: char, advance: f32) -> Self {
        Self {
            codepoint,
            advance,
            bearing: [0.0, 0.0],
            size: [0.0, 0.0],
            scale: 1.0,
            raw_uv: AtlasRect::default(),
        }
    }
}
