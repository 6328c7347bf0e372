use quilt_core::text::{
    AtlasRect, FaceMetrics, FontFace, FontId, FontRegistry, Glyph, TextOptions,
};
use quilt_core::{
    set_active, spans_tile_buffers, CanvasId, ElementId, IVec2, ImageData, MeshDataSpan, Span,
    SpriteData, SubmeshKey, TextureId, UiPipeline, UiTree, Vec2, HIDDEN_OFFSET,
};

fn test_fonts() -> (FontRegistry, FontId) {
    let metrics = FaceMetrics {
        ascent: 8.0,
        descent: -2.0,
        line_height: 12.0,
        point_size: 10.0,
    };
    let mut face = FontFace::new("mono", metrics, [64, 64]).unwrap();
    for c in 'a'..='z' {
        face.add_glyph(Glyph {
            codepoint: c,
            advance: 10.0,
            bearing: [0.0, 8.0],
            size: [8.0, 8.0],
            scale: 1.0,
            raw_uv: AtlasRect::new(0.0, 0.0, 8.0, 8.0),
        });
    }
    face.add_glyph(Glyph::spacing(' ', 10.0));
    let mut fonts = FontRegistry::new();
    let id = fonts.insert(face);
    (fonts, id)
}

fn image(texture: u64) -> ImageData {
    ImageData {
        sprite: SpriteData::full(),
        native_resolution: IVec2::new(64, 64),
        texture: Some(TextureId(texture)),
        material: None,
    }
}

/// A small HUD: one background image, a static label ("ab"), and two
/// dynamic text leaves ("abc", "de") sharing the dynamic font batch.
struct Hud {
    tree: UiTree,
    fonts: FontRegistry,
    pipeline: UiPipeline,
    font: FontId,
    canvas: CanvasId,
    image: ElementId,
    label: ElementId,
    counter: ElementId,
    suffix: ElementId,
}

fn hud() -> Hud {
    let (fonts, font) = test_fonts();
    let mut tree = UiTree::new();
    let canvas = tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
    let root = tree.canvas(canvas).root();

    let image = tree.add_image(root, image(1)).unwrap();
    let label = tree
        .add_text(root, font, TextOptions::new(10.0), "ab", false)
        .unwrap();
    let counter = tree
        .add_text(root, font, TextOptions::new(10.0), "abc", true)
        .unwrap();
    let suffix = tree
        .add_text(root, font, TextOptions::new(10.0), "de", true)
        .unwrap();

    let mut pipeline = UiPipeline::new().with_validation(true);
    pipeline.mark_structure(canvas);
    pipeline.mark_screen(canvas, Vec2::new(800.0, 600.0));

    Hud {
        tree,
        fonts,
        pipeline,
        font,
        canvas,
        image,
        label,
        counter,
        suffix,
    }
}

fn flushed_hud() -> Hud {
    let mut hud = hud();
    hud.pipeline.flush(&mut hud.tree, &hud.fonts).unwrap();
    hud
}

fn leaf_spans(hud: &Hud) -> Vec<MeshDataSpan> {
    let mut spans: Vec<MeshDataSpan> = [hud.image, hud.label, hud.counter, hud.suffix]
        .iter()
        .map(|&id| hud.tree.element(id).span())
        .collect();
    spans.sort_by_key(|s| (s.vertex.offset, s.vertex.count));
    spans
}

fn assert_tiled(hud: &Hud) {
    let canvas = hud.tree.canvas(hud.canvas);
    assert!(spans_tile_buffers(
        &leaf_spans(hud),
        canvas.submeshes(),
        canvas.vertices().len() as u32,
        canvas.indices().len() as u32,
    ));
}

#[test]
fn full_flush_packs_partitions_and_writes() {
    let mut hud = hud();
    let flushed = hud.pipeline.flush(&mut hud.tree, &hud.fonts).unwrap();

    assert_eq!(flushed.len(), 1);
    let stats = flushed[0].pack.unwrap();
    assert_eq!(stats.vertices, 32);
    assert_eq!(stats.indices, 48);
    assert_eq!(stats.submeshes, 3);
    assert_eq!(stats.static_submeshes, 2);
    assert_eq!(stats.leaves, 4);

    let canvas = hud.tree.canvas(hud.canvas);
    assert_eq!(canvas.vertices().len(), 32);
    assert_eq!(canvas.indices().len(), 48);

    // Statics first: the image batch, the static label batch, then the
    // one dynamic batch holding both dynamic leaves.
    let draws: Vec<_> = canvas.draws().collect();
    assert_eq!(draws.len(), 3);
    assert_eq!(draws[0].1, SubmeshKey::image(Some(TextureId(1)), None));
    assert_eq!(draws[1].1, SubmeshKey::text(hud.font));
    assert_eq!(draws[2].1, SubmeshKey::text(hud.font));
    assert_eq!(draws[0].0.vertex, Span::new(0, 4));
    assert_eq!(draws[0].0.index, Span::new(0, 6));
    assert_eq!(draws[1].0.vertex, Span::new(4, 8));
    assert_eq!(draws[1].0.index, Span::new(6, 12));
    assert_eq!(draws[2].0.vertex, Span::new(12, 20));
    assert_eq!(draws[2].0.index, Span::new(18, 30));

    // Image quad: a 100x100 element centered on the 800x600 canvas.
    let v = canvas.vertices();
    assert_eq!(v[0].position, [350.0, 250.0]);
    assert_eq!(v[1].position, [350.0, 350.0]);
    assert_eq!(v[2].position, [450.0, 350.0]);
    assert_eq!(v[3].position, [450.0, 250.0]);
    assert_eq!(v[0].uv, [0.0, 1.0]);
    assert_eq!(v[1].uv, [0.0, 0.0]);
    assert_eq!(v[0].uv2, [0.0, 0.0]);
    assert_eq!(v[0].color, [1.0, 1.0, 1.0, 1.0]);
    assert_eq!(&canvas.indices()[0..6], &[0, 1, 2, 2, 3, 0]);

    assert_tiled(&hud);
}

#[test]
fn static_and_dynamic_text_land_where_typeset() {
    let hud = flushed_hud();
    let canvas = hud.tree.canvas(hud.canvas);
    let v = canvas.vertices();

    // Label "ab", centered: line width 20, pen -10, baseline -3, so
    // the first glyph spans (-10, -3)..(-2, 5) around (400, 300).
    let label = hud.tree.element(hud.label).span();
    assert_eq!(label.vertex, Span::new(4, 8));
    let base = label.vertex.offset as usize;
    assert_eq!(v[base].position, [390.0, 297.0]);
    assert_eq!(v[base + 1].position, [390.0, 305.0]);
    assert_eq!(v[base].uv, [0.0, 0.125]);
    assert_eq!(v[base + 1].uv, [0.0, 0.0]);
    assert_eq!(v[base + 4].position, [400.0, 297.0]);
    assert_eq!(&canvas.indices()[6..12], &[4, 5, 6, 6, 7, 4]);

    // Dynamic "abc": width 30, pen -15.
    let counter = hud.tree.element(hud.counter).span();
    assert_eq!(counter.vertex, Span::new(12, 12));
    assert_eq!(counter.index, Span::new(18, 18));
    assert_eq!(v[12].position, [385.0, 297.0]);
    assert_eq!(&canvas.indices()[18..24], &[12, 13, 14, 14, 15, 12]);

    // Dynamic "de" follows in the same submesh: width 20, pen -10.
    let suffix = hud.tree.element(hud.suffix).span();
    assert_eq!(suffix.vertex, Span::new(24, 8));
    assert_eq!(suffix.index, Span::new(36, 12));
    assert_eq!(v[24].position, [390.0, 297.0]);
    assert_eq!(&canvas.indices()[36..42], &[24, 25, 26, 26, 27, 24]);
}

#[test]
fn growing_dynamic_text_splices_in_place() {
    let mut hud = flushed_hud();
    let before_v = hud.tree.canvas(hud.canvas).vertices().to_vec();
    let before_i = hud.tree.canvas(hud.canvas).indices().to_vec();

    hud.pipeline
        .edit_text(&mut hud.tree, hud.counter, "abcabca")
        .unwrap();
    let flushed = hud.pipeline.flush(&mut hud.tree, &hud.fonts).unwrap();

    assert_eq!(flushed.len(), 1);
    assert!(flushed[0].pack.is_none());
    let splice = flushed[0].splice.unwrap();
    assert_eq!(splice.elements, 2);
    assert_eq!(splice.vertices, 48);
    assert_eq!(splice.indices, 72);

    let canvas = hud.tree.canvas(hud.canvas);
    // Static geometry is untouched.
    assert_eq!(&canvas.vertices()[..12], &before_v[..12]);
    assert_eq!(&canvas.indices()[..18], &before_i[..18]);

    // The grown leaf keeps its offset; the one behind it shifts.
    assert_eq!(
        hud.tree.element(hud.counter).span().vertex,
        Span::new(12, 28)
    );
    assert_eq!(hud.tree.element(hud.suffix).span().vertex, Span::new(40, 8));
    assert_eq!(hud.tree.element(hud.suffix).span().index, Span::new(60, 12));

    // Seven glyphs: width 70, pen -35.
    assert_eq!(canvas.vertices()[12].position, [365.0, 297.0]);
    // "de" re-emitted at its new base with fresh indices.
    assert_eq!(canvas.vertices()[40].position, [390.0, 297.0]);
    assert_eq!(&canvas.indices()[60..66], &[40, 41, 42, 42, 43, 40]);

    // The dynamic submesh slice covers both leaves again.
    let draws: Vec<_> = canvas.draws().collect();
    assert_eq!(draws[2].0.vertex, Span::new(12, 36));
    assert_eq!(draws[2].0.index, Span::new(18, 54));

    assert_tiled(&hud);
}

#[test]
fn shrinking_dynamic_text_truncates_and_shifts() {
    let mut hud = flushed_hud();

    hud.pipeline.edit_text(&mut hud.tree, hud.counter, "a").unwrap();
    hud.pipeline.flush(&mut hud.tree, &hud.fonts).unwrap();

    let canvas = hud.tree.canvas(hud.canvas);
    assert_eq!(canvas.vertices().len(), 24);
    assert_eq!(canvas.indices().len(), 36);

    assert_eq!(hud.tree.element(hud.counter).span().vertex, Span::new(12, 4));
    assert_eq!(hud.tree.element(hud.suffix).span().vertex, Span::new(16, 8));
    assert_eq!(hud.tree.element(hud.suffix).span().index, Span::new(24, 12));

    // One glyph: pen -5.
    assert_eq!(canvas.vertices()[12].position, [395.0, 297.0]);
    assert_eq!(&canvas.indices()[24..30], &[16, 17, 18, 18, 19, 16]);

    assert_tiled(&hud);
}

#[test]
fn editing_to_empty_and_back_restores_the_buffers() {
    let mut hud = flushed_hud();
    let before_v = hud.tree.canvas(hud.canvas).vertices().to_vec();
    let before_i = hud.tree.canvas(hud.canvas).indices().to_vec();

    hud.pipeline.edit_text(&mut hud.tree, hud.counter, "").unwrap();
    hud.pipeline.flush(&mut hud.tree, &hud.fonts).unwrap();

    assert_eq!(hud.tree.canvas(hud.canvas).vertices().len(), 20);
    assert_eq!(hud.tree.canvas(hud.canvas).indices().len(), 30);
    assert_eq!(hud.tree.element(hud.counter).span().vertex, Span::new(12, 0));
    assert_eq!(hud.tree.element(hud.suffix).span().vertex, Span::new(12, 8));
    assert_tiled(&hud);

    hud.pipeline.edit_text(&mut hud.tree, hud.counter, "abc").unwrap();
    hud.pipeline.flush(&mut hud.tree, &hud.fonts).unwrap();

    let canvas = hud.tree.canvas(hud.canvas);
    assert_eq!(canvas.vertices(), &before_v[..]);
    assert_eq!(canvas.indices(), &before_i[..]);
}

#[test]
fn hiding_displaces_vertices_and_showing_restores_them() {
    let mut hud = flushed_hud();
    let before_v = hud.tree.canvas(hud.canvas).vertices().to_vec();
    let before_i = hud.tree.canvas(hud.canvas).indices().to_vec();

    set_active(&mut hud.tree, hud.image, false).unwrap();
    {
        let canvas = hud.tree.canvas(hud.canvas);
        assert_eq!(
            canvas.vertices()[0].position,
            [350.0 + HIDDEN_OFFSET.x, 250.0 + HIDDEN_OFFSET.y]
        );
        // Only the hidden leaf moved; spans, indices and the rest of
        // the vertex data are untouched.
        assert_eq!(&canvas.vertices()[4..], &before_v[4..]);
        assert_eq!(canvas.indices(), &before_i[..]);
        assert_eq!(hud.tree.element(hud.image).span().vertex, Span::new(0, 4));
        assert!(!hud.tree.element(hud.image).is_active());
    }

    set_active(&mut hud.tree, hud.image, true).unwrap();
    let canvas = hud.tree.canvas(hud.canvas);
    assert_eq!(canvas.vertices(), &before_v[..]);
    assert_eq!(canvas.indices(), &before_i[..]);
    assert!(hud.tree.element(hud.image).is_active());
}

#[test]
fn ancestor_toggles_skip_self_hidden_branches() {
    let (fonts, _) = test_fonts();
    let mut tree = UiTree::new();
    let canvas = tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
    let root = tree.canvas(canvas).root();

    let panel = tree.add_group(root).unwrap();
    let a = tree.add_image(panel, image(7)).unwrap();
    let b = tree.add_image(panel, image(7)).unwrap();

    // Hidden before the first flush: only the flag flips, the writer
    // displaces the geometry when it runs.
    set_active(&mut tree, b, false).unwrap();

    let mut pipeline = UiPipeline::new().with_validation(true);
    pipeline.mark_structure(canvas);
    pipeline.mark_screen(canvas, Vec2::new(800.0, 600.0));
    pipeline.flush(&mut tree, &fonts).unwrap();

    let shown = [350.0, 250.0];
    let hidden = [350.0 + HIDDEN_OFFSET.x, 250.0 + HIDDEN_OFFSET.y];
    let bl = |tree: &UiTree, id| {
        let offset = tree.element(id).span().vertex.offset as usize;
        tree.canvas(canvas).vertices()[offset].position
    };

    assert_eq!(bl(&tree, a), shown);
    assert_eq!(bl(&tree, b), hidden);
    let before_i = tree.canvas(canvas).indices().to_vec();

    // Hiding the panel displaces a, while b is already displaced by its
    // own flag and must not move twice.
    set_active(&mut tree, panel, false).unwrap();
    assert_eq!(bl(&tree, a), hidden);
    assert_eq!(bl(&tree, b), hidden);

    // Showing the panel restores a; b stays hidden on its own.
    set_active(&mut tree, panel, true).unwrap();
    assert_eq!(bl(&tree, a), shown);
    assert_eq!(bl(&tree, b), hidden);

    set_active(&mut tree, b, true).unwrap();
    assert_eq!(bl(&tree, a), shown);
    assert_eq!(bl(&tree, b), shown);

    assert_eq!(tree.canvas(canvas).indices(), &before_i[..]);
}

#[test]
fn toggling_under_a_hidden_parent_only_flips_the_flag() {
    let (fonts, _) = test_fonts();
    let mut tree = UiTree::new();
    let canvas = tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
    let root = tree.canvas(canvas).root();

    let panel = tree.add_group(root).unwrap();
    let a = tree.add_image(panel, image(3)).unwrap();

    let mut pipeline = UiPipeline::new();
    pipeline.mark_structure(canvas);
    pipeline.mark_screen(canvas, Vec2::new(800.0, 600.0));
    pipeline.flush(&mut tree, &fonts).unwrap();

    set_active(&mut tree, panel, false).unwrap();
    let displaced = tree.canvas(canvas).vertices().to_vec();

    // The parent chain already hides a, so its vertices must not move.
    set_active(&mut tree, a, false).unwrap();
    assert_eq!(tree.canvas(canvas).vertices(), &displaced[..]);
    set_active(&mut tree, a, true).unwrap();
    assert_eq!(tree.canvas(canvas).vertices(), &displaced[..]);

    // Showing the panel now reveals a again, since its own flag is
    // back to active.
    set_active(&mut tree, panel, true).unwrap();
    let offset = tree.element(a).span().vertex.offset as usize;
    assert_eq!(
        tree.canvas(canvas).vertices()[offset].position,
        [350.0, 250.0]
    );
}

#[test]
fn worker_count_never_changes_the_output() {
    let flush_with = |threads: usize| {
        let mut hud = hud();
        hud.pipeline = UiPipeline::new().with_validation(true).with_worker_threads(threads);
        hud.pipeline.mark_structure(hud.canvas);
        hud.pipeline.mark_screen(hud.canvas, Vec2::new(800.0, 600.0));
        hud.pipeline.flush(&mut hud.tree, &hud.fonts).unwrap();
        hud
    };

    let single = flush_with(1);
    let pooled = flush_with(4);

    let a = single.tree.canvas(single.canvas);
    let b = pooled.tree.canvas(pooled.canvas);
    assert_eq!(a.vertices(), b.vertices());
    assert_eq!(a.indices(), b.indices());
    assert_eq!(a.submeshes(), b.submeshes());
}

#[test]
fn screen_resize_rescales_all_geometry() {
    let mut hud = flushed_hud();

    hud.pipeline
        .set_screen_size(&hud.tree, Vec2::new(1600.0, 1200.0));
    let flushed = hud.pipeline.flush(&mut hud.tree, &hud.fonts).unwrap();
    assert!(flushed[0].pack.is_none());
    assert!(flushed[0].splice.is_some());

    let canvas = hud.tree.canvas(hud.canvas);
    assert_eq!(canvas.scale(), 2.0);
    assert_eq!(canvas.translation(), Vec2::new(800.0, 600.0));

    // Same spans, doubled geometry around the new center.
    let v = canvas.vertices();
    assert_eq!(v.len(), 32);
    assert_eq!(v[0].position, [700.0, 500.0]);
    assert_eq!(v[2].position, [900.0, 700.0]);
    assert_eq!(v[4].position, [780.0, 594.0]);
    assert_eq!(v[12].position, [770.0, 594.0]);

    assert_tiled(&hud);
}

#[test]
fn hidden_elements_survive_a_full_rewrite() {
    let mut hud = flushed_hud();
    set_active(&mut hud.tree, hud.image, false).unwrap();

    // A resize rewrites every static leaf; the hidden image must come
    // out displaced again, not restored.
    hud.pipeline
        .set_screen_size(&hud.tree, Vec2::new(1600.0, 1200.0));
    hud.pipeline.flush(&mut hud.tree, &hud.fonts).unwrap();

    {
        let canvas = hud.tree.canvas(hud.canvas);
        assert_eq!(
            canvas.vertices()[0].position,
            [700.0 + HIDDEN_OFFSET.x, 500.0 + HIDDEN_OFFSET.y]
        );
        // Visible neighbors are written in place.
        assert_eq!(canvas.vertices()[4].position, [780.0, 594.0]);
    }

    set_active(&mut hud.tree, hud.image, true).unwrap();
    assert_eq!(
        hud.tree.canvas(hud.canvas).vertices()[0].position,
        [700.0, 500.0]
    );
}
