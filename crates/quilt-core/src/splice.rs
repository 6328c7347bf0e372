use quilt_text::{layout_text, FontRegistry};

use crate::math::Vec2;
use crate::pack::PackError;
use crate::span::{MeshDataSpan, Span, SubmeshSlice};
use crate::tree::{CanvasId, ElementId, ElementKind, UiTree};
use crate::vertex::UiVertex;
use crate::visibility::HIDDEN_OFFSET;
use crate::writer::emit_text_quads;

/// Buffer totals after a splice pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpliceStats {
    pub elements: usize,
    pub vertices: u32,
    pub indices: u32,
}

/// Re-lay out every dynamic text leaf and splice the fresh quads over
/// the old ones in place.
///
/// Dynamic leaves live at the tail of the buffers, after every static
/// span. Each splice may grow or shrink its span, shifting everything
/// behind it, so the pass walks in buffer order with a running cursor
/// and re-emits every dynamic leaf. Re-emitting rather than memmoving
/// keeps shifted index values correct without a fixup pass.
pub fn splice_dynamic_text(
    tree: &mut UiTree,
    canvas: CanvasId,
    fonts: &FontRegistry,
) -> Result<SpliceStats, PackError> {
    let root = tree.canvas(canvas).root();
    let static_submeshes = tree.canvas(canvas).static_submesh_count;

    let mut items: Vec<(usize, ElementId)> = Vec::new();
    for id in tree.preorder(root) {
        if let ElementKind::Text(text) = tree.element(id).kind() {
            if text.dynamic {
                items.push((text.submesh_index, id));
            }
        }
    }
    // Stable, so leaves sharing a submesh keep their packed order.
    items.sort_by_key(|&(submesh, _)| submesh);

    let mut vertices = std::mem::take(&mut tree.canvas_mut(canvas).vertices);
    let mut indices = std::mem::take(&mut tree.canvas_mut(canvas).indices);

    let mut cursor_v = tree.canvas(canvas).static_vertex_end;
    let mut cursor_i = tree.canvas(canvas).static_index_end;
    let mut scratch_v: Vec<UiVertex> = Vec::new();
    let mut scratch_i: Vec<u32> = Vec::new();

    let outcome = (|| {
        for &(_, id) in &items {
            let element = tree.element(id);
            let old = element.span();
            let hidden_shift = if tree.effective_hidden(id) {
                HIDDEN_OFFSET
            } else {
                Vec2::ZERO
            };
            let color = element.color.to_linear_premul();
            let transform = element.screen_space();
            let extent = element.dimension.as_vec2() * 0.5;

            let ElementKind::Text(text) = element.kind() else {
                continue;
            };
            let face = fonts.face(text.font).map_err(|_| PackError::UnknownFont {
                element: id,
                font: text.font,
            })?;
            let layout = layout_text(
                &text.chars,
                face,
                &text.options,
                [extent.x, extent.y],
                [transform.scale.x, transform.scale.y],
            );
            let quads = layout.quads.len() as u32;

            scratch_v.clear();
            scratch_v.resize(quads as usize * 4, UiVertex::default());
            scratch_i.clear();
            scratch_i.resize(quads as usize * 6, 0);
            emit_text_quads(
                &mut scratch_v,
                &mut scratch_i,
                cursor_v,
                &layout,
                transform.translation + hidden_shift,
                color,
            );

            vertices.splice(
                cursor_v as usize..(cursor_v + old.vertex.count) as usize,
                scratch_v.iter().copied(),
            );
            indices.splice(
                cursor_i as usize..(cursor_i + old.index.count) as usize,
                scratch_i.iter().copied(),
            );

            tree.element_mut(id).span = MeshDataSpan {
                vertex: Span::new(cursor_v, quads * 4),
                index: Span::new(cursor_i, quads * 6),
            };
            cursor_v += quads * 4;
            cursor_i += quads * 6;
        }
        Ok(())
    })();

    // Fold the updated spans back into contiguous submesh slices.
    let mut rebuilt: Vec<(usize, SubmeshSlice)> = Vec::new();
    if outcome.is_ok() {
        for &(submesh, id) in &items {
            let span = tree.element(id).span();
            match rebuilt.last_mut() {
                Some((last, slice)) if *last == submesh => {
                    slice.vertex.count = span.vertex.end() - slice.vertex.offset;
                    slice.index.count = span.index.end() - slice.index.offset;
                }
                _ => rebuilt.push((
                    submesh,
                    SubmeshSlice {
                        vertex: span.vertex,
                        index: span.index,
                    },
                )),
            }
        }
        debug_assert_eq!(rebuilt.len() + static_submeshes, tree.canvas(canvas).submeshes.len());
    }

    let data = tree.canvas_mut(canvas);
    data.vertices = vertices;
    data.indices = indices;
    outcome?;
    for (submesh, slice) in rebuilt {
        data.submeshes[submesh] = slice;
    }

    let data = tree.canvas(canvas);
    let stats = SpliceStats {
        elements: items.len(),
        vertices: data.vertices.len() as u32,
        indices: data.indices.len() as u32,
    };
    log::trace!(
        "spliced {} dynamic text leaves, buffers now {}v/{}i",
        stats.elements,
        stats.vertices,
        stats.indices
    );
    Ok(stats)
}
