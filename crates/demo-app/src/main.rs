use anyhow::Result;
use quilt_config::QuiltConfig;
use quilt_core::text::{
    AtlasRect, FaceMetrics, FaceStyle, FontFace, FontId, FontRegistry, FontStyle, Glyph,
    HorizontalAlign, TextOptions, VerticalAlign,
};
use quilt_core::{
    set_active, Anchor, AnchorPoint, CanvasFlush, CanvasId, ElementId, HorizontalAnchor, IVec2,
    ImageData, Placement, SpriteData, TextureId, UiPipeline, UiTree, Vec2, VerticalAnchor,
};

/// Synthetic monospace face standing in for a rasterized atlas: every
/// lowercase letter occupies one 32x32 atlas cell.
fn demo_face() -> Result<FontFace> {
    let metrics = FaceMetrics {
        ascent: 24.0,
        descent: -6.0,
        line_height: 36.0,
        point_size: 32.0,
    };
    let mut face = FontFace::new("quilt-mono", metrics, [512, 512])?.with_styles(
        FaceStyle {
            spacing: 0.0,
            padding: 1.0,
        },
        FaceStyle {
            spacing: 4.0,
            padding: 2.0,
        },
    );
    for (slot, c) in ('a'..='z').enumerate() {
        let col = (slot % 16) as f32;
        let row = (slot / 16) as f32;
        face.add_glyph(Glyph {
            codepoint: c,
            advance: 18.0,
            bearing: [1.0, 22.0],
            size: [16.0, 22.0],
            scale: 1.0,
            raw_uv: AtlasRect::new(col * 32.0, row * 32.0, 16.0, 22.0),
        });
    }
    face.add_glyph(Glyph::spacing(' ', 18.0));
    Ok(face)
}

struct Scene {
    canvas: CanvasId,
    panel: ElementId,
    counter: ElementId,
    status: ElementId,
}

/// A HUD-style canvas: a stretched backdrop, a bold title, and two
/// dynamic text readouts inside an anchored panel.
fn build_scene(tree: &mut UiTree, font: FontId) -> Result<Scene> {
    let canvas = tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
    let root = tree.canvas(canvas).root();

    let backdrop = tree.add_image(
        root,
        ImageData {
            sprite: SpriteData::full(),
            native_resolution: IVec2::new(256, 256),
            texture: Some(TextureId(1)),
            material: None,
        },
    )?;
    tree.element_mut(backdrop).placement = Placement::Stretch;

    let panel = tree.add_group(root)?;
    tree.element_mut(panel).dimension = IVec2::new(360, 220);
    tree.element_mut(panel).placement = Placement::Anchored(Anchor::new(
        AnchorPoint::new(HorizontalAnchor::Center, VerticalAnchor::Top),
        Vec2::new(0.0, 120.0),
    ));

    // The panel frame: a nine-sliced border sprite with transparent
    // edges trimmed off by its padding insets.
    let frame = tree.add_image(
        panel,
        ImageData {
            sprite: SpriteData {
                outer_uv: quilt_core::Rect::new(0.0, 0.5, 0.5, 0.5),
                padding: [2.0, 2.0, 2.0, 2.0],
            },
            native_resolution: IVec2::new(64, 64),
            texture: Some(TextureId(2)),
            material: None,
        },
    )?;
    tree.element_mut(frame).placement = Placement::Stretch;

    let title = tree.add_text(
        panel,
        font,
        TextOptions::new(24.0).with_style(FontStyle::Bold),
        "quilt demo",
        false,
    )?;
    tree.element_mut(title).dimension = IVec2::new(340, 60);
    tree.element_mut(title).placement = Placement::Anchored(Anchor::new(
        AnchorPoint::new(HorizontalAnchor::Center, VerticalAnchor::Top),
        Vec2::new(0.0, 40.0),
    ));

    let counter = tree.add_text(
        panel,
        font,
        TextOptions::new(20.0),
        "score zero",
        true,
    )?;
    tree.element_mut(counter).dimension = IVec2::new(340, 40);

    let status = tree.add_text(
        panel,
        font,
        TextOptions::new(16.0).with_alignment(HorizontalAlign::Left, VerticalAlign::Middle),
        "ready",
        true,
    )?;
    tree.element_mut(status).dimension = IVec2::new(340, 80);
    tree.element_mut(status).placement = Placement::Anchored(Anchor::new(
        AnchorPoint::new(HorizontalAnchor::Center, VerticalAnchor::Bottom),
        Vec2::new(0.0, -50.0),
    ));

    Ok(Scene {
        canvas,
        panel,
        counter,
        status,
    })
}

fn report(stage: &str, flushes: &[CanvasFlush], tree: &UiTree) {
    for flush in flushes {
        match (flush.pack, flush.splice) {
            (Some(pack), _) => log::info!(
                "{stage}: packed {} leaves into {} submeshes ({} static), {} vertices / {} indices",
                pack.leaves,
                pack.submeshes,
                pack.static_submeshes,
                pack.vertices,
                pack.indices
            ),
            (None, Some(splice)) => log::info!(
                "{stage}: spliced {} dynamic leaves, buffers now {} vertices / {} indices",
                splice.elements,
                splice.vertices,
                splice.indices
            ),
            (None, None) => log::info!("{stage}: nothing to do"),
        }
        let canvas = tree.canvas(flush.canvas);
        log::debug!(
            "canvas scale {} translation {:?}",
            canvas.scale(),
            canvas.translation()
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = QuiltConfig::load();

    let mut fonts = FontRegistry::new();
    let font = fonts.insert(demo_face()?);

    let mut tree = UiTree::new();
    let scene = build_scene(&mut tree, font)?;

    let mut pipeline = UiPipeline::new().with_validation(config.batching.validate_spans);
    if let Some(threads) = config.batching.worker_threads {
        pipeline = pipeline.with_worker_threads(threads);
    }

    let screen = Vec2::new(
        config.demo.screen_width.unwrap_or(1280.0),
        config.demo.screen_height.unwrap_or(720.0),
    );

    pipeline.mark_structure(scene.canvas);
    pipeline.mark_screen(scene.canvas, screen);
    report("initial flush", &pipeline.flush(&mut tree, &fonts)?, &tree);

    // A frame later the screen grows and the counter ticks over.
    pipeline.set_screen_size(&tree, screen * 1.5);
    pipeline.edit_text(&mut tree, scene.counter, "score one hundred")?;
    report("resize + tick", &pipeline.flush(&mut tree, &fonts)?, &tree);

    // Text-only edits splice the dynamic tail; statics stay in place.
    pipeline.edit_text(&mut tree, scene.status, "combo running at double speed")?;
    report("status update", &pipeline.flush(&mut tree, &fonts)?, &tree);

    // Hide and show the panel. Geometry moves off screen and back
    // without any repacking.
    set_active(&mut tree, scene.panel, false)?;
    set_active(&mut tree, scene.panel, true)?;
    log::info!("panel toggled off and on, spans untouched");

    let (vertices, indices, draws) = tree.canvas(scene.canvas).packed_mesh();
    log::info!(
        "final draw list over {} vertices / {} indices",
        vertices.len(),
        indices.len()
    );
    for (i, (slice, key)) in draws.enumerate() {
        log::info!(
            "  draw {i}: {key:?} vertices {}..{} indices {}..{}",
            slice.vertex.offset,
            slice.vertex.end(),
            slice.index.offset,
            slice.index.end()
        );
    }

    Ok(())
}
