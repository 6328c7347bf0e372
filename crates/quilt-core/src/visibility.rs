use crate::math::Vec2;
use crate::span::Span;
use crate::tree::{ElementId, ElementKind, TreeError, UiTree};

/// Translation applied to every vertex of a hidden leaf.
///
/// A power of two whose float ulp at its own magnitude is 1/16, so for
/// coordinates quantized to a sixteenth of a unit the add and the later
/// subtract round-trip exactly and a hide/show cycle is byte-stable.
pub const HIDDEN_OFFSET: Vec2 = Vec2::new(524_288.0, 524_288.0);

/// Show or hide an element and its subtree without touching spans,
/// submeshes or index data. Hidden geometry is shoved far off screen
/// where clipping discards it, which keeps the buffers stable while a
/// frame is already in flight.
pub fn set_active(tree: &mut UiTree, element: ElementId, active: bool) -> Result<(), TreeError> {
    let target = tree.get_element(element).ok_or(TreeError::Dangling(element))?;
    if target.is_active() == active {
        return Ok(());
    }
    let canvas = target.canvas();
    let under_hidden_parent = match target.parent() {
        Some(parent) => tree.effective_hidden(parent),
        None => false,
    };

    tree.element_mut(element).hidden = !active;

    // Under a hidden ancestor the vertices are already displaced; only
    // the flag flips, and the ancestor's own toggle will pick this
    // subtree up (or skip it) through the hidden flags.
    if under_hidden_parent {
        return Ok(());
    }

    let mut spans: Vec<Span> = Vec::new();
    collect_shifted_spans(tree, element, true, &mut spans);

    let shift = if active { -HIDDEN_OFFSET } else { HIDDEN_OFFSET };
    let data = tree.canvas_mut(canvas);
    for span in spans {
        for vertex in &mut data.vertices[span.range()] {
            vertex.position[0] += shift.x;
            vertex.position[1] += shift.y;
        }
    }
    log::debug!(
        "{} element {:?} on canvas {:?}",
        if active { "showing" } else { "hiding" },
        element,
        canvas
    );
    Ok(())
}

/// Gather the vertex spans whose effective visibility this toggle
/// changes: the toggled subtree minus any branch hidden by its own
/// flag, since that branch stays displaced regardless of ancestors.
fn collect_shifted_spans(tree: &UiTree, id: ElementId, toggled: bool, out: &mut Vec<Span>) {
    let element = tree.element(id);
    if !toggled && element.hidden {
        return;
    }
    if !matches!(element.kind(), ElementKind::Group) && !element.span().vertex.is_empty() {
        out.push(element.span().vertex);
    }
    for &child in element.children() {
        collect_shifted_spans(tree, child, false, out);
    }
}
