use quilt_text::FontId;

use crate::math::Rect;

/// Opaque handle to a texture owned by the GPU layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Opaque handle to a material (shader + uniforms) owned by the GPU layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u64);

/// What a submesh samples from: an image texture, or the atlas behind
/// a registered font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRef {
    Image(TextureId),
    FontAtlas(FontId),
}

/// Paint identity of a submesh. Two leaves share a submesh (and hence
/// a draw call) exactly when their keys are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SubmeshKey {
    pub texture: Option<TextureRef>,
    pub material: Option<MaterialId>,
}

impl SubmeshKey {
    pub fn image(texture: Option<TextureId>, material: Option<MaterialId>) -> Self {
        Self {
            texture: texture.map(TextureRef::Image),
            material,
        }
    }

    pub fn text(font: FontId) -> Self {
        Self {
            texture: Some(TextureRef::FontAtlas(font)),
            material: None,
        }
    }
}

/// Region of a texture an image element samples, plus per-edge insets
/// that trim transparent borders off the emitted quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteData {
    /// Normalized UV rectangle of the sprite in its texture.
    pub outer_uv: Rect,
    /// Insets in native texels: left, bottom, right, top.
    pub padding: [f32; 4],
}

impl SpriteData {
    /// Full texture, no trimming.
    pub fn full() -> Self {
        Self {
            outer_uv: Rect::new(0.0, 0.0, 1.0, 1.0),
            padding: [0.0; 4],
        }
    }
}
