use hashbrown::HashMap;

use crate::paint::SubmeshKey;
use crate::tree::{ElementId, ElementKind, UiTree};

/// One future draw call: a paint identity plus the leaves that render
/// with it, in tree order.
#[derive(Debug, Clone)]
pub struct Batch {
    pub key: SubmeshKey,
    pub dynamic: bool,
    pub members: Vec<ElementId>,
}

/// Ordered batch list for one canvas. Static batches come first (in
/// first-seen tree order), then dynamic-text batches, so content edits
/// never move static geometry.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    pub batches: Vec<Batch>,
}

impl BatchPlan {
    pub fn static_count(&self) -> usize {
        self.batches.iter().filter(|b| !b.dynamic).count()
    }

    pub fn dynamic_count(&self) -> usize {
        self.batches.len() - self.static_count()
    }
}

/// Walk a canvas tree and group its geometry leaves by paint identity.
///
/// Must be called with the canvas root; starting the analysis below the
/// root would produce a plan that disagrees with the packed buffers, so
/// that is treated as a programming error.
pub fn analyze(tree: &UiTree, root: ElementId) -> BatchPlan {
    assert!(
        tree.element(root).parent().is_none(),
        "batch analysis must start at a canvas root"
    );

    let mut batches: Vec<Batch> = Vec::new();
    let mut by_key: HashMap<(SubmeshKey, bool), usize> = HashMap::new();

    for id in tree.preorder(root) {
        let element = tree.element(id);
        let Some(key) = element.submesh_key() else {
            continue;
        };
        let dynamic = matches!(element.kind(), ElementKind::Text(t) if t.dynamic);

        let slot = *by_key.entry((key, dynamic)).or_insert_with(|| {
            batches.push(Batch {
                key,
                dynamic,
                members: Vec::new(),
            });
            batches.len() - 1
        });
        batches[slot].members.push(id);
    }

    // Stable partition: dynamic batches sink to the tail, everything
    // else keeps first-seen order.
    batches.sort_by_key(|b| b.dynamic);

    log::debug!(
        "batch analysis: {} batches ({} static) from root {:?}",
        batches.len(),
        batches.iter().filter(|b| !b.dynamic).count(),
        root
    );
    BatchPlan { batches }
}
