use rayon::prelude::*;

use quilt_text::{layout_text, FontRegistry, TextLayout};

use crate::math::Vec2;
use crate::pack::PackError;
use crate::quad::{image_corners, quad_indices, quad_vertices};
use crate::span::MeshDataSpan;
use crate::tree::{CanvasId, ElementId, ElementKind, UiTree};
use crate::vertex::UiVertex;
use crate::visibility::HIDDEN_OFFSET;

/// One leaf's mutable window into the shared canvas buffers.
struct LeafWindow<'a> {
    element: ElementId,
    /// Absolute vertex offset of the window, for index emission.
    base: u32,
    vertices: &'a mut [UiVertex],
    indices: &'a mut [u32],
}

/// Carve a disjoint window per leaf out of the shared buffers.
///
/// Jobs must be sorted by span offset. Packing hands every leaf a
/// non-overlapping span, so splitting the buffers along span bounds
/// gives each worker exclusive access without locks.
fn partition<'a>(
    mut vertices: &'a mut [UiVertex],
    mut indices: &'a mut [u32],
    jobs: &[(ElementId, MeshDataSpan)],
) -> Vec<LeafWindow<'a>> {
    let mut windows = Vec::with_capacity(jobs.len());
    let mut consumed_v = 0u32;
    let mut consumed_i = 0u32;

    for &(element, span) in jobs {
        debug_assert!(span.vertex.offset >= consumed_v);
        debug_assert!(span.index.offset >= consumed_i);

        let (_, tail) = vertices.split_at_mut((span.vertex.offset - consumed_v) as usize);
        let (window_v, tail) = tail.split_at_mut(span.vertex.count as usize);
        vertices = tail;

        let (_, tail) = indices.split_at_mut((span.index.offset - consumed_i) as usize);
        let (window_i, tail) = tail.split_at_mut(span.index.count as usize);
        indices = tail;

        consumed_v = span.vertex.end();
        consumed_i = span.index.end();

        windows.push(LeafWindow {
            element,
            base: span.vertex.offset,
            vertices: window_v,
            indices: window_i,
        });
    }
    windows
}

/// Fill the geometry of every static leaf (images and non-dynamic
/// text), one worker per leaf. Dynamic text is owned by the splice
/// pass and skipped here.
pub fn write_static(
    tree: &mut UiTree,
    canvas: CanvasId,
    fonts: &FontRegistry,
    pool: Option<&rayon::ThreadPool>,
) -> Result<(), PackError> {
    let root = tree.canvas(canvas).root();
    let mut jobs: Vec<(ElementId, MeshDataSpan)> = Vec::new();
    for id in tree.preorder(root) {
        let element = tree.element(id);
        let include = match element.kind() {
            ElementKind::Group => false,
            ElementKind::Image(_) => true,
            ElementKind::Text(text) => !text.dynamic,
        };
        if include && !element.span().vertex.is_empty() {
            jobs.push((id, element.span()));
        }
    }
    jobs.sort_by_key(|&(_, span)| span.vertex.offset);

    // Move the buffers out so workers can borrow the tree read-only
    // while holding mutable windows.
    let mut vertices = std::mem::take(&mut tree.canvas_mut(canvas).vertices);
    let mut indices = std::mem::take(&mut tree.canvas_mut(canvas).indices);

    let windows = partition(&mut vertices, &mut indices, &jobs);
    let shared: &UiTree = tree;
    let write_all = || {
        windows
            .into_par_iter()
            .try_for_each(|window| write_leaf(shared, fonts, window))
    };
    let result = match pool {
        Some(pool) => pool.install(write_all),
        None => write_all(),
    };

    let data = tree.canvas_mut(canvas);
    data.vertices = vertices;
    data.indices = indices;
    result
}

fn write_leaf(tree: &UiTree, fonts: &FontRegistry, window: LeafWindow<'_>) -> Result<(), PackError> {
    let element = tree.element(window.element);
    let hidden_shift = if tree.effective_hidden(window.element) {
        HIDDEN_OFFSET
    } else {
        Vec2::ZERO
    };
    let color = element.color.to_linear_premul();
    let transform = element.screen_space();

    match element.kind() {
        ElementKind::Image(image) => {
            let (min, max) = image_corners(&image.sprite, image.native_resolution, element.dimension);
            let uv = image.sprite.outer_uv;
            let corners = quad_vertices(
                transform.apply(min) + hidden_shift,
                transform.apply(max) + hidden_shift,
                [uv.x, uv.y],
                [uv.x + uv.w, uv.y + uv.h],
                [0.0, 0.0],
                color,
            );
            window.vertices.copy_from_slice(&corners);
            window.indices.copy_from_slice(&quad_indices(window.base));
        }
        ElementKind::Text(text) => {
            let face = fonts.face(text.font).map_err(|_| PackError::UnknownFont {
                element: window.element,
                font: text.font,
            })?;
            let extent = element.dimension.as_vec2() * 0.5;
            let layout = layout_text(
                &text.chars,
                face,
                &text.options,
                [extent.x, extent.y],
                [transform.scale.x, transform.scale.y],
            );
            emit_text_quads(
                window.vertices,
                window.indices,
                window.base,
                &layout,
                transform.translation + hidden_shift,
                color,
            );
        }
        ElementKind::Group => {}
    }
    Ok(())
}

/// Write a laid-out text run into a vertex/index window. The window
/// must be sized for exactly the layout's quad count.
pub(crate) fn emit_text_quads(
    vertices: &mut [UiVertex],
    indices: &mut [u32],
    base: u32,
    layout: &TextLayout,
    translation: Vec2,
    color: [f32; 4],
) {
    debug_assert_eq!(vertices.len(), layout.quads.len() * 4);
    debug_assert_eq!(indices.len(), layout.quads.len() * 6);

    for (k, quad) in layout.quads.iter().enumerate() {
        let min = translation + Vec2::new(quad.min[0], quad.min[1]);
        let max = translation + Vec2::new(quad.max[0], quad.max[1]);
        let corners = quad_vertices(min, max, quad.uv_min, quad.uv_max, quad.uv2, color);
        vertices[k * 4..k * 4 + 4].copy_from_slice(&corners);
        indices[k * 6..k * 6 + 6].copy_from_slice(&quad_indices(base + k as u32 * 4));
    }
}
