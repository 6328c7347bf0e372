use slotmap::SecondaryMap;

use quilt_text::FontRegistry;

use crate::batch::analyze;
use crate::layout::resolve_canvas;
use crate::math::Vec2;
use crate::pack::{pack, PackError, PackStats};
use crate::span::{spans_tile_buffers, MeshDataSpan};
use crate::splice::{splice_dynamic_text, SpliceStats};
use crate::tree::{CanvasId, ElementId, ElementKind, TreeError, UiTree};
use crate::writer::write_static;

#[derive(Debug, Clone, Copy, Default)]
struct DirtyFlags {
    /// Elements were added or removed, or batching inputs changed.
    structure: bool,
    /// Screen size to re-resolve against.
    screen: Option<Vec2>,
    /// Dynamic text content changed.
    text: bool,
}

/// What `flush` did for one canvas.
#[derive(Debug, Clone, Copy)]
pub struct CanvasFlush {
    pub canvas: CanvasId,
    pub pack: Option<PackStats>,
    pub splice: Option<SpliceStats>,
}

/// Change tracker and scheduler over the packing passes.
///
/// Callers mark canvases as the tree changes, then flush once per
/// frame. The flush picks the cheapest rebuild covering the marks: a
/// structural change forces a repack and full rewrite, a screen change
/// rewrites geometry in place, a text change only splices the dynamic
/// tail.
pub struct UiPipeline {
    dirty: SecondaryMap<CanvasId, DirtyFlags>,
    pool: Option<rayon::ThreadPool>,
    validate: bool,
}

impl UiPipeline {
    pub fn new() -> Self {
        Self {
            dirty: SecondaryMap::new(),
            pool: None,
            validate: false,
        }
    }

    /// Run static geometry writes on a dedicated pool of `threads`
    /// workers instead of the global rayon pool.
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => self.pool = Some(pool),
            Err(err) => {
                log::warn!("falling back to the global worker pool: {err}");
                self.pool = None;
            }
        }
        self
    }

    /// Check after every flush that leaf spans and submesh slices still
    /// tile the canvas buffers exactly. Panics on corruption.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    fn flags(&mut self, canvas: CanvasId) -> &mut DirtyFlags {
        if !self.dirty.contains_key(canvas) {
            self.dirty.insert(canvas, DirtyFlags::default());
        }
        &mut self.dirty[canvas]
    }

    pub fn mark_structure(&mut self, canvas: CanvasId) {
        self.flags(canvas).structure = true;
    }

    pub fn mark_screen(&mut self, canvas: CanvasId, screen: Vec2) {
        self.flags(canvas).screen = Some(screen);
    }

    pub fn mark_text(&mut self, canvas: CanvasId) {
        self.flags(canvas).text = true;
    }

    /// Mark every canvas against a new screen size.
    pub fn set_screen_size(&mut self, tree: &UiTree, screen: Vec2) {
        for canvas in tree.canvases() {
            self.mark_screen(canvas, screen);
        }
    }

    /// Replace a text element's content and queue the matching rebuild:
    /// a splice for dynamic leaves, a full repack for static ones
    /// (their span sizes are fixed until the next structural pass).
    pub fn edit_text(
        &mut self,
        tree: &mut UiTree,
        element: ElementId,
        text: &str,
    ) -> Result<(), TreeError> {
        tree.set_text(element, text)?;
        let canvas = tree.element(element).canvas();
        if tree.text(element)?.dynamic {
            self.mark_text(canvas);
        } else {
            self.mark_structure(canvas);
        }
        Ok(())
    }

    /// Run the queued passes for every dirty canvas. Clean canvases are
    /// untouched.
    pub fn flush(
        &mut self,
        tree: &mut UiTree,
        fonts: &FontRegistry,
    ) -> Result<Vec<CanvasFlush>, PackError> {
        let canvases: Vec<CanvasId> = tree.canvases().collect();
        let mut out = Vec::new();

        for canvas in canvases {
            let Some(flags) = self.dirty.remove(canvas) else {
                continue;
            };
            let mut flush = CanvasFlush {
                canvas,
                pack: None,
                splice: None,
            };

            if flags.structure {
                let root = tree.canvas(canvas).root();
                let plan = analyze(tree, root);
                flush.pack = Some(pack(tree, canvas, &plan, fonts)?);
                resolve_canvas(tree, canvas, flags.screen);
                write_static(tree, canvas, fonts, self.pool.as_ref())?;
                flush.splice = Some(splice_dynamic_text(tree, canvas, fonts)?);
            } else if let Some(screen) = flags.screen {
                resolve_canvas(tree, canvas, Some(screen));
                write_static(tree, canvas, fonts, self.pool.as_ref())?;
                flush.splice = Some(splice_dynamic_text(tree, canvas, fonts)?);
            } else if flags.text {
                flush.splice = Some(splice_dynamic_text(tree, canvas, fonts)?);
            }

            if self.validate {
                assert!(
                    buffers_hold_shape(tree, canvas),
                    "canvas {canvas:?} buffers lost their span tiling"
                );
            }
            out.push(flush);
        }
        Ok(out)
    }
}

impl Default for UiPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-derive the packed span sequence from the tree and check it still
/// tiles the buffers together with the submesh slices.
fn buffers_hold_shape(tree: &UiTree, canvas: CanvasId) -> bool {
    let data = tree.canvas(canvas);
    let mut spans: Vec<MeshDataSpan> = tree
        .preorder(data.root())
        .into_iter()
        .filter_map(|id| {
            let element = tree.element(id);
            match element.kind() {
                ElementKind::Group => None,
                _ => Some(element.span()),
            }
        })
        .collect();
    spans.sort_by_key(|span| (span.vertex.offset, span.vertex.count));
    spans_tile_buffers(
        &spans,
        data.submeshes(),
        data.vertices().len() as u32,
        data.indices().len() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_skips_clean_canvases() {
        let mut tree = UiTree::new();
        tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
        let fonts = FontRegistry::new();

        let mut pipeline = UiPipeline::new();
        let flushed = pipeline.flush(&mut tree, &fonts).unwrap();
        assert!(flushed.is_empty());
    }

    #[test]
    fn marks_are_consumed_by_flush() {
        let mut tree = UiTree::new();
        let canvas = tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
        let fonts = FontRegistry::new();

        let mut pipeline = UiPipeline::new();
        pipeline.mark_structure(canvas);
        let first = pipeline.flush(&mut tree, &fonts).unwrap();
        assert_eq!(first.len(), 1);
        assert!(first[0].pack.is_some());

        let second = pipeline.flush(&mut tree, &fonts).unwrap();
        assert!(second.is_empty());
    }
}
