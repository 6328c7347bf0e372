use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// Interleaved vertex layout shared by every canvas mesh.
///
/// `uv2` is an auxiliary channel: zero for image quads, a bold signal
/// for text quads.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct UiVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub uv2: [f32; 2],
    pub color: [f32; 4],
}

// The GPU layer casts the vertex stream with bytemuck; the stride must
// stay in sync with the pipeline's vertex attributes.
const_assert_eq!(std::mem::size_of::<UiVertex>(), 40);

pub const VERTS_PER_QUAD: u32 = 4;
pub const INDICES_PER_QUAD: u32 = 6;
