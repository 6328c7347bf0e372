use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use quilt_text::{FontId, TextOptions};

use crate::anchor::{CanvasScaler, Placement};
use crate::color::Rgba8;
use crate::math::{IVec2, Transform, Vec2};
use crate::paint::{MaterialId, SpriteData, SubmeshKey, TextureId};
use crate::span::{MeshDataSpan, SubmeshSlice};
use crate::vertex::UiVertex;

new_key_type! {
    /// Stable handle for an element in a [`UiTree`].
    pub struct ElementId;
    /// Stable handle for a canvas in a [`UiTree`].
    pub struct CanvasId;
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("element {0:?} is not part of the tree")]
    Dangling(ElementId),
    #[error("canvas {0:?} is not part of the tree")]
    DanglingCanvas(CanvasId),
    #[error("element {0:?} is not a text element")]
    NotText(ElementId),
    #[error("the root element of a canvas cannot be removed")]
    RemoveRoot,
    #[error("unrecognized anchor name {0:?}")]
    InvalidAnchor(String),
}

/// Image leaf payload: which sprite to draw and with what paint.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub sprite: SpriteData,
    /// Resolution the sprite's padding insets are expressed at.
    pub native_resolution: IVec2,
    pub texture: Option<TextureId>,
    pub material: Option<MaterialId>,
}

/// Text leaf payload.
#[derive(Debug, Clone)]
pub struct TextData {
    pub chars: Vec<char>,
    pub options: TextOptions,
    pub font: FontId,
    /// Dynamic text keeps its batch at the tail of the canvas buffers
    /// so content edits splice in place instead of forcing a repack.
    pub dynamic: bool,
    /// Position of this leaf's batch in the packed submesh list,
    /// stamped by the packer. Orders the splice pass.
    pub(crate) submesh_index: usize,
}

/// What a tree element contributes to the canvas mesh.
#[derive(Debug, Clone)]
pub enum ElementKind {
    /// Pure grouping node, no geometry of its own.
    Group,
    Image(ImageData),
    Text(TextData),
}

pub struct Element {
    pub(crate) kind: ElementKind,
    /// Authored size in canvas units. Replaced by the parent extent each
    /// resolve for stretch placements.
    pub dimension: IVec2,
    pub color: Rgba8,
    pub placement: Placement,
    /// Extra scale applied on top of the inherited screen scale.
    pub local_scale: Vec2,
    /// Resolved screen transform, written by the layout pass. The
    /// translation is the element center in screen coordinates.
    pub(crate) screen_space: Transform,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) canvas: CanvasId,
    pub(crate) span: MeshDataSpan,
    pub(crate) hidden: bool,
}

impl Element {
    fn new(kind: ElementKind, canvas: CanvasId, parent: Option<ElementId>) -> Self {
        Self {
            kind,
            dimension: IVec2::new(100, 100),
            color: Rgba8::WHITE,
            placement: Placement::default(),
            local_scale: Vec2::ONE,
            screen_space: Transform::IDENTITY,
            parent,
            children: Vec::new(),
            canvas,
            span: MeshDataSpan::default(),
            hidden: false,
        }
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn canvas(&self) -> CanvasId {
        self.canvas
    }

    /// Reserved buffer regions, valid after a pack.
    pub fn span(&self) -> MeshDataSpan {
        self.span
    }

    pub fn screen_space(&self) -> Transform {
        self.screen_space
    }

    pub fn is_active(&self) -> bool {
        !self.hidden
    }

    /// Paint identity this element contributes under, if any.
    pub fn submesh_key(&self) -> Option<SubmeshKey> {
        match &self.kind {
            ElementKind::Group => None,
            ElementKind::Image(img) => Some(SubmeshKey::image(img.texture, img.material)),
            ElementKind::Text(text) => Some(SubmeshKey::text(text.font)),
        }
    }
}

/// One independent UI surface: a tree of elements packed into a single
/// vertex/index buffer pair, partitioned into submeshes.
pub struct Canvas {
    pub reference_resolution: Vec2,
    /// Blend between width-driven and height-driven scaling, 0..=1.
    pub width_height_weight: f32,
    pub(crate) root: ElementId,
    pub(crate) scaler: CanvasScaler,
    pub(crate) vertices: Vec<UiVertex>,
    pub(crate) indices: Vec<u32>,
    pub(crate) submeshes: Vec<SubmeshSlice>,
    pub(crate) submesh_keys: Vec<SubmeshKey>,
    /// Buffer positions right after the last static submesh; dynamic
    /// splices only ever move data at or past these marks.
    pub(crate) static_vertex_end: u32,
    pub(crate) static_index_end: u32,
    pub(crate) static_submesh_count: usize,
}

impl Canvas {
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn vertices(&self) -> &[UiVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn submeshes(&self) -> &[SubmeshSlice] {
        &self.submeshes
    }

    pub fn submesh_keys(&self) -> &[SubmeshKey] {
        &self.submesh_keys
    }

    /// Draw list: one `(slice, key)` pair per pending draw call, in
    /// submission order.
    pub fn draws(&self) -> impl Iterator<Item = (SubmeshSlice, SubmeshKey)> + '_ {
        self.submeshes
            .iter()
            .copied()
            .zip(self.submesh_keys.iter().copied())
    }

    /// Everything the GPU layer uploads and draws for this canvas: the
    /// packed buffers plus the ordered draw list.
    pub fn packed_mesh(
        &self,
    ) -> (
        &[UiVertex],
        &[u32],
        impl Iterator<Item = (SubmeshSlice, SubmeshKey)> + '_,
    ) {
        (&self.vertices, &self.indices, self.draws())
    }

    pub fn scale(&self) -> f32 {
        self.scaler.scale
    }

    pub fn translation(&self) -> Vec2 {
        self.scaler.translation
    }
}

/// Arena of every canvas and element.
#[derive(Default)]
pub struct UiTree {
    pub(crate) elements: SlotMap<ElementId, Element>,
    pub(crate) canvases: SlotMap<CanvasId, Canvas>,
}

impl UiTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas together with its root group element. The root's
    /// dimension tracks the reference resolution.
    pub fn add_canvas(&mut self, reference_resolution: Vec2, width_height_weight: f32) -> CanvasId {
        let canvas = self.canvases.insert(Canvas {
            reference_resolution,
            width_height_weight: width_height_weight.clamp(0.0, 1.0),
            root: ElementId::default(),
            scaler: CanvasScaler::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
            submeshes: Vec::new(),
            submesh_keys: Vec::new(),
            static_vertex_end: 0,
            static_index_end: 0,
            static_submesh_count: 0,
        });

        let mut root = Element::new(ElementKind::Group, canvas, None);
        root.dimension = IVec2::new(
            reference_resolution.x as i32,
            reference_resolution.y as i32,
        );
        let root = self.elements.insert(root);
        self.canvases[canvas].root = root;
        log::debug!("created canvas {:?} with root {:?}", canvas, root);
        canvas
    }

    pub fn canvas(&self, id: CanvasId) -> &Canvas {
        &self.canvases[id]
    }

    pub fn get_canvas(&self, id: CanvasId) -> Option<&Canvas> {
        self.canvases.get(id)
    }

    pub fn canvas_mut(&mut self, id: CanvasId) -> &mut Canvas {
        &mut self.canvases[id]
    }

    pub fn canvases(&self) -> impl Iterator<Item = CanvasId> + '_ {
        self.canvases.keys()
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id]
    }

    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id]
    }

    pub fn add_group(&mut self, parent: ElementId) -> Result<ElementId, TreeError> {
        self.add_child(parent, ElementKind::Group)
    }

    pub fn add_image(&mut self, parent: ElementId, image: ImageData) -> Result<ElementId, TreeError> {
        self.add_child(parent, ElementKind::Image(image))
    }

    pub fn add_text(
        &mut self,
        parent: ElementId,
        font: FontId,
        options: TextOptions,
        text: &str,
        dynamic: bool,
    ) -> Result<ElementId, TreeError> {
        self.add_child(
            parent,
            ElementKind::Text(TextData {
                chars: text.chars().collect(),
                options,
                font,
                dynamic,
                submesh_index: 0,
            }),
        )
    }

    fn add_child(&mut self, parent: ElementId, kind: ElementKind) -> Result<ElementId, TreeError> {
        let canvas = self
            .elements
            .get(parent)
            .ok_or(TreeError::Dangling(parent))?
            .canvas;
        let id = self.elements.insert(Element::new(kind, canvas, Some(parent)));
        self.elements[parent].children.push(id);
        Ok(id)
    }

    /// Replace a text element's content. The canvas must be flushed
    /// through the pipeline for the change to reach the buffers.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> Result<(), TreeError> {
        let element = self.elements.get_mut(id).ok_or(TreeError::Dangling(id))?;
        match &mut element.kind {
            ElementKind::Text(data) => {
                data.chars.clear();
                data.chars.extend(text.chars());
                Ok(())
            }
            _ => Err(TreeError::NotText(id)),
        }
    }

    pub fn text(&self, id: ElementId) -> Result<&TextData, TreeError> {
        match &self.elements.get(id).ok_or(TreeError::Dangling(id))?.kind {
            ElementKind::Text(data) => Ok(data),
            _ => Err(TreeError::NotText(id)),
        }
    }

    /// Remove an element and its whole subtree.
    pub fn remove(&mut self, id: ElementId) -> Result<(), TreeError> {
        let element = self.elements.get(id).ok_or(TreeError::Dangling(id))?;
        let Some(parent) = element.parent else {
            return Err(TreeError::RemoveRoot);
        };

        self.elements[parent].children.retain(|&c| c != id);
        for id in self.preorder(id) {
            self.elements.remove(id);
        }
        Ok(())
    }

    /// Depth-first preorder traversal; children in authored order.
    pub(crate) fn preorder(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.elements[id].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// True when the element or any of its ancestors is toggled off.
    pub(crate) fn effective_hidden(&self, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(id) = cursor {
            let element = &self.elements[id];
            if element.hidden {
                return true;
            }
            cursor = element.parent;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_options() -> TextOptions {
        TextOptions::new(10.0)
    }

    fn font_id() -> FontId {
        let mut fonts = quilt_text::FontRegistry::new();
        let metrics = quilt_text::FaceMetrics {
            ascent: 8.0,
            descent: -2.0,
            line_height: 12.0,
            point_size: 10.0,
        };
        fonts.insert(quilt_text::FontFace::new("mono", metrics, [64, 64]).unwrap())
    }

    #[test]
    fn preorder_follows_authored_child_order() {
        let mut tree = UiTree::new();
        let canvas = tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
        let root = tree.canvas(canvas).root();

        let a = tree.add_group(root).unwrap();
        let b = tree.add_group(root).unwrap();
        let a1 = tree.add_group(a).unwrap();
        let a2 = tree.add_group(a).unwrap();

        assert_eq!(tree.preorder(root), vec![root, a, a1, a2, b]);
    }

    #[test]
    fn set_text_rejects_non_text_elements() {
        let mut tree = UiTree::new();
        let canvas = tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
        let root = tree.canvas(canvas).root();
        let group = tree.add_group(root).unwrap();

        assert!(matches!(
            tree.set_text(group, "hello"),
            Err(TreeError::NotText(_))
        ));

        let label = tree
            .add_text(root, font_id(), text_options(), "hi", true)
            .unwrap();
        tree.set_text(label, "hello").unwrap();
        assert_eq!(tree.text(label).unwrap().chars.len(), 5);
    }

    #[test]
    fn remove_drops_the_whole_subtree() {
        let mut tree = UiTree::new();
        let canvas = tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
        let root = tree.canvas(canvas).root();

        let a = tree.add_group(root).unwrap();
        let a1 = tree.add_group(a).unwrap();
        tree.remove(a).unwrap();

        assert!(tree.get_element(a).is_none());
        assert!(tree.get_element(a1).is_none());
        assert!(tree.element(root).children().is_empty());
        assert!(matches!(tree.remove(root), Err(TreeError::RemoveRoot)));
    }

    #[test]
    fn hidden_state_inherits_down_the_chain() {
        let mut tree = UiTree::new();
        let canvas = tree.add_canvas(Vec2::new(800.0, 600.0), 0.5);
        let root = tree.canvas(canvas).root();
        let a = tree.add_group(root).unwrap();
        let a1 = tree.add_group(a).unwrap();

        assert!(!tree.effective_hidden(a1));
        tree.element_mut(a).hidden = true;
        assert!(tree.effective_hidden(a1));
        assert!(!tree.effective_hidden(root));
    }
}
