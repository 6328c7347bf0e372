use thiserror::Error;

use quilt_text::{count_renderable_glyphs, FontId, FontRegistry};

use crate::batch::BatchPlan;
use crate::span::{MeshDataSpan, Span, SubmeshSlice};
use crate::tree::{CanvasId, ElementId, ElementKind, UiTree};
use crate::vertex::{UiVertex, INDICES_PER_QUAD, VERTS_PER_QUAD};

#[derive(Debug, Error)]
pub enum PackError {
    #[error("text element {element:?} references unknown font {font:?}")]
    UnknownFont { element: ElementId, font: FontId },
}

/// Totals for one packed canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    pub vertices: u32,
    pub indices: u32,
    pub submeshes: usize,
    pub static_submeshes: usize,
    pub leaves: usize,
}

/// Size the canvas buffers and hand every leaf its disjoint span.
///
/// Walks the plan in batch order, so each submesh's members occupy one
/// contiguous slice and static content sits entirely before dynamic
/// content. Text leaves are stamped with their batch's submesh index on
/// the way through. Packing the same tree twice yields identical spans.
pub fn pack(
    tree: &mut UiTree,
    canvas: CanvasId,
    plan: &BatchPlan,
    fonts: &FontRegistry,
) -> Result<PackStats, PackError> {
    debug_assert!(
        plan.batches.windows(2).all(|w| w[0].dynamic <= w[1].dynamic),
        "batch plan must keep static batches in front"
    );

    let mut cursor_v = 0u32;
    let mut cursor_i = 0u32;
    let mut slices = Vec::with_capacity(plan.batches.len());
    let mut keys = Vec::with_capacity(plan.batches.len());
    let mut static_vertex_end = 0u32;
    let mut static_index_end = 0u32;
    let mut static_submesh_count = 0usize;
    let mut leaves = 0usize;

    #[cfg(debug_assertions)]
    let mut packed_spans: Vec<MeshDataSpan> = Vec::new();

    for (batch_index, batch) in plan.batches.iter().enumerate() {
        let slice_start_v = cursor_v;
        let slice_start_i = cursor_i;

        for &member in &batch.members {
            let quads = match tree.element(member).kind() {
                ElementKind::Image(_) => 1u32,
                ElementKind::Text(data) => {
                    let face = fonts.face(data.font).map_err(|_| PackError::UnknownFont {
                        element: member,
                        font: data.font,
                    })?;
                    count_renderable_glyphs(&data.chars, face) as u32
                }
                ElementKind::Group => 0u32,
            };

            let span = MeshDataSpan {
                vertex: Span::new(cursor_v, quads * VERTS_PER_QUAD),
                index: Span::new(cursor_i, quads * INDICES_PER_QUAD),
            };
            cursor_v = span.vertex.end();
            cursor_i = span.index.end();

            let element = tree.element_mut(member);
            element.span = span;
            if let ElementKind::Text(data) = &mut element.kind {
                data.submesh_index = batch_index;
            }
            leaves += 1;

            #[cfg(debug_assertions)]
            packed_spans.push(span);
        }

        slices.push(SubmeshSlice {
            vertex: Span::new(slice_start_v, cursor_v - slice_start_v),
            index: Span::new(slice_start_i, cursor_i - slice_start_i),
        });
        keys.push(batch.key);

        if !batch.dynamic {
            static_vertex_end = cursor_v;
            static_index_end = cursor_i;
            static_submesh_count = batch_index + 1;
        }
    }

    #[cfg(debug_assertions)]
    debug_assert!(crate::span::spans_tile_buffers(
        &packed_spans,
        &slices,
        cursor_v,
        cursor_i
    ));

    let data = tree.canvas_mut(canvas);
    data.vertices.clear();
    data.vertices.resize(cursor_v as usize, UiVertex::default());
    data.indices.clear();
    data.indices.resize(cursor_i as usize, 0);
    data.submeshes = slices;
    data.submesh_keys = keys;
    data.static_vertex_end = static_vertex_end;
    data.static_index_end = static_index_end;
    data.static_submesh_count = static_submesh_count;

    let stats = PackStats {
        vertices: cursor_v,
        indices: cursor_i,
        submeshes: plan.batches.len(),
        static_submeshes: static_submesh_count,
        leaves,
    };
    log::debug!("packed canvas {:?}: {:?}", canvas, stats);
    Ok(stats)
}
