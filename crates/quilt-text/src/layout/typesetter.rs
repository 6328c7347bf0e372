use crate::font::FontFace;
use crate::layout::line_breaker::{advance_step, break_lines, LineInfo};
use crate::layout::options::{FontStyle, HorizontalAlign, TextOptions, VerticalAlign};

/// One positioned glyph quad, in element-local coordinates (origin at
/// the element center, y up). UVs are normalized atlas coordinates with
/// `uv_min` at the glyph's top-left texel and `uv_max` at bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub min: [f32; 2],
    pub max: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    /// Auxiliary channel carried to the vertex stream (bold signal).
    pub uv2: [f32; 2],
}

/// Output of a full layout run over one text element.
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    pub lines: Vec<LineInfo>,
    pub quads: Vec<GlyphQuad>,
}

/// Number of quads a layout run over `chars` will emit.
///
/// Line breaking assigns every character to exactly one line and never
/// drops any, so the quad count is simply the number of characters with
/// a glyph entry in the face.
pub fn count_renderable_glyphs(chars: &[char], face: &FontFace) -> usize {
    chars.iter().filter(|c| face.glyph(**c).is_some()).count()
}

/// Break `chars` into lines and emit one quad per renderable glyph.
///
/// `extents` is the half-size of the target box in element units; the
/// box spans `[-extents, +extents]` around the element center. Glyph
/// positions are scaled per axis by `screen_scale` on the way out, so
/// the emitted quads are ready for the vertex stream after adding the
/// element's screen translation.
pub fn layout_text(
    chars: &[char],
    face: &FontFace,
    options: &TextOptions,
    extents: [f32; 2],
    screen_scale: [f32; 2],
) -> TextLayout {
    let lines = break_lines(chars, face, options, extents[0] * 2.0);
    let mut quads = Vec::with_capacity(count_renderable_glyphs(chars, face));

    let metrics = face.metrics();
    let style = face.style(options.style);
    let font_scale = face.scale_for(options.size);
    let atlas = face.atlas_size();
    let atlas_w = atlas[0] as f32;
    let atlas_h = atlas[1] as f32;
    let weight = match options.style {
        FontStyle::Normal => 0.0,
        FontStyle::Bold => 1.0,
    };

    let line_stride = metrics.line_height * font_scale;
    // First baseline, per vertical alignment. Descent is negative, so
    // the bottom of the last line sits at `baseline + descent * scale`.
    let first_baseline = match options.alignment.vertical {
        VerticalAlign::Top => extents[1] - metrics.ascent * font_scale,
        VerticalAlign::Middle => {
            (lines.len().saturating_sub(1)) as f32 * line_stride * 0.5
                - (metrics.ascent + metrics.descent) * font_scale * 0.5
        }
        VerticalAlign::Bottom => {
            -extents[1] - metrics.descent * font_scale
                + (lines.len().saturating_sub(1)) as f32 * line_stride
        }
    };

    for (k, line) in lines.iter().enumerate() {
        let end = lines.get(k + 1).map_or(chars.len(), |next| next.start);
        let baseline = first_baseline - k as f32 * line_stride;
        let mut pen = match options.alignment.horizontal {
            HorizontalAlign::Left => -extents[0],
            HorizontalAlign::Center => -line.width * 0.5,
            HorizontalAlign::Right => extents[0] - line.width,
        };

        for &c in &chars[line.start..end] {
            let Some(glyph) = face.glyph(c) else {
                continue;
            };
            let glyph_scale = glyph.scale * font_scale;
            let pad = style.padding;

            let left = pen + (glyph.bearing[0] - pad) * glyph_scale;
            let top = baseline + (glyph.bearing[1] + pad) * glyph_scale;
            let w = (glyph.size[0] + 2.0 * pad) * glyph_scale;
            let h = (glyph.size[1] + 2.0 * pad) * glyph_scale;

            let uv = glyph.raw_uv;
            quads.push(GlyphQuad {
                min: [left * screen_scale[0], (top - h) * screen_scale[1]],
                max: [(left + w) * screen_scale[0], top * screen_scale[1]],
                uv_min: [(uv.x - pad) / atlas_w, (uv.y - pad) / atlas_h],
                uv_max: [(uv.x + uv.w + pad) / atlas_w, (uv.y + uv.h + pad) / atlas_h],
                uv2: [weight, 0.0],
            });

            pen += advance_step(face, glyph, options);
        }
    }

    TextLayout { lines, quads }
}
