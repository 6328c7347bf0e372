//! quilt-core: canvas batching runtime over a retained element tree.
//!
//! A [`UiTree`] holds canvases of 2D elements. Per canvas the packer
//! flattens geometry leaves into one shared vertex/index buffer pair,
//! grouped into submeshes by paint identity, and the writer passes fill
//! the reserved spans. Uploading the buffers and issuing one draw per
//! submesh is the caller's side of the contract.

/// Re-export rayon so callers can hand the writer a thread pool without
/// depending on it directly.
pub use rayon;

/// Typesetting layer, re-exported for callers that register fonts.
pub use quilt_text as text;

mod anchor;
mod batch;
mod color;
mod layout;
mod math;
mod pack;
mod paint;
mod pipeline;
mod quad;
mod span;
mod splice;
mod tree;
mod vertex;
mod visibility;
mod writer;

pub use anchor::*;
pub use batch::*;
pub use color::*;
pub use layout::*;
pub use math::*;
pub use pack::*;
pub use paint::*;
pub use pipeline::*;
pub use span::*;
pub use splice::*;
pub use tree::*;
pub use vertex::*;
pub use visibility::*;
pub use writer::*;
