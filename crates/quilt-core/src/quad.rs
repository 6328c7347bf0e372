use crate::math::{IVec2, Vec2};
use crate::paint::SpriteData;
use crate::vertex::UiVertex;

/// Element-local corners of an image quad, padding insets applied.
///
/// The naive quad spans the element's dimension centered on its
/// position; each edge is then pulled inward by the sprite's padding,
/// rescaled from native texels to element units.
pub fn image_corners(sprite: &SpriteData, native: IVec2, dimension: IVec2) -> (Vec2, Vec2) {
    let extent = dimension.as_vec2() * 0.5;
    let ratio_x = if native.x > 0 {
        dimension.x as f32 / native.x as f32
    } else {
        1.0
    };
    let ratio_y = if native.y > 0 {
        dimension.y as f32 / native.y as f32
    } else {
        1.0
    };

    let [left, bottom, right, top] = sprite.padding;
    (
        Vec2::new(-extent.x + left * ratio_x, -extent.y + bottom * ratio_y),
        Vec2::new(extent.x - right * ratio_x, extent.y - top * ratio_y),
    )
}

/// Four corners in bottom-left, top-left, top-right, bottom-right
/// order. `uv_min` is the top-left of the sampled rect and `uv_max`
/// its bottom-right; v grows downward while y grows upward, so the
/// bottom-left corner samples `v_max`.
pub fn quad_vertices(
    min: Vec2,
    max: Vec2,
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    uv2: [f32; 2],
    color: [f32; 4],
) -> [UiVertex; 4] {
    [
        UiVertex {
            position: [min.x, min.y],
            uv: [uv_min[0], uv_max[1]],
            uv2,
            color,
        },
        UiVertex {
            position: [min.x, max.y],
            uv: [uv_min[0], uv_min[1]],
            uv2,
            color,
        },
        UiVertex {
            position: [max.x, max.y],
            uv: [uv_max[0], uv_min[1]],
            uv2,
            color,
        },
        UiVertex {
            position: [max.x, min.y],
            uv: [uv_max[0], uv_max[1]],
            uv2,
            color,
        },
    ]
}

/// Two triangles over a quad's corners, with absolute vertex indices.
pub fn quad_indices(base: u32) -> [u32; 6] {
    [base, base + 1, base + 2, base + 2, base + 3, base]
}
