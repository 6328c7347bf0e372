use slotmap::{new_key_type, SlotMap};

use crate::font::{FontError, FontFace, Result};

new_key_type! {
    /// Stable handle for a registered font face.
    pub struct FontId;
}

/// Owns every loaded font face and hands out stable ids.
#[derive(Debug, Default)]
pub struct FontRegistry {
    faces: SlotMap<FontId, FontFace>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, face: FontFace) -> FontId {
        let id = self.faces.insert(face);
        log::debug!("registered font face {:?}", id);
        id
    }

    pub fn get(&self, id: FontId) -> Option<&FontFace> {
        self.faces.get(id)
    }

    /// Like [`get`](Self::get) but surfaces a typed error for callers
    /// that must fail loudly on a dangling id.
    pub fn face(&self, id: FontId) -> Result<&FontFace> {
        self.faces.get(id).ok_or(FontError::UnknownFace(id))
    }

    pub fn remove(&mut self, id: FontId) -> Option<FontFace> {
        self.faces.remove(id)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
