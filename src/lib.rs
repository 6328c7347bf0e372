//! quilt: retained 2D UI batching for GPU renderers.
//!
//! Facade over the workspace crates. [`quilt_core`] carries the element
//! tree, packer, writers and pipeline; [`text`] carries font faces and
//! typesetting.

pub use quilt_core::*;

/// Typesetting layer, also reachable as `quilt::text`.
pub use quilt_text as text;
