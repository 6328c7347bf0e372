use crate::anchor::Placement;
use crate::math::{IVec2, Transform, Vec2};
use crate::tree::{CanvasId, UiTree};

/// Resolve every element's screen transform for one canvas.
///
/// The canvas scale and translation only recompute when the physical
/// screen size changes (the scaler caches the last seen size); the
/// transform walk itself runs whenever the pipeline needs fresh
/// positions. Children resolve against their parent in parent-local
/// coordinates (origin at the parent's bottom-left corner, y up), then
/// convert to screen space through the parent's resolved transform.
///
/// Returns true when the canvas scale state changed.
pub fn resolve_canvas(tree: &mut UiTree, canvas: CanvasId, screen: Option<Vec2>) -> bool {
    let data = tree.canvas_mut(canvas);
    let reference = data.reference_resolution;
    let weight = data.width_height_weight;
    let screen = screen
        .or(data.scaler.last_screen)
        .unwrap_or(reference);
    let changed = data.scaler.update(screen, reference, weight);

    let scale = data.scaler.scale;
    let translation = data.scaler.translation;
    let root = data.root;

    {
        let root_element = tree.element_mut(root);
        root_element.screen_space = Transform::new(
            translation,
            Vec2::splat(scale) * root_element.local_scale,
        );
    }

    for id in tree.preorder(root) {
        let (parent_transform, parent_extent) = {
            let element = tree.element(id);
            (element.screen_space(), element.dimension.as_vec2())
        };

        for slot in 0..tree.element(id).children().len() {
            let child = tree.element(id).children()[slot];
            let element = tree.element_mut(child);

            let center = match element.placement {
                Placement::Anchored(anchor) => anchor.position(parent_extent),
                Placement::Stretch => {
                    element.dimension =
                        IVec2::new(parent_extent.x as i32, parent_extent.y as i32);
                    parent_extent * 0.5
                }
            };

            // Parent-local coordinates are bottom-left based; the parent
            // transform translates its center.
            let offset = center - parent_extent * 0.5;
            element.screen_space = Transform::new(
                parent_transform.translation + offset * parent_transform.scale,
                parent_transform.scale * element.local_scale,
            );
        }
    }

    changed
}
