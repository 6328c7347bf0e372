use std::ops::Range;

/// Contiguous region of one buffer: element offset plus element count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub offset: u32,
    pub count: u32,
}

impl Span {
    pub const fn new(offset: u32, count: u32) -> Self {
        Self { offset, count }
    }

    pub fn end(&self) -> u32 {
        self.offset + self.count
    }

    pub fn range(&self) -> Range<usize> {
        self.offset as usize..self.end() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A leaf's reserved regions in its canvas's vertex and index buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshDataSpan {
    pub vertex: Span,
    pub index: Span,
}

/// One submesh's slice of the packed canvas buffers. Each slice maps
/// to exactly one draw call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmeshSlice {
    pub vertex: Span,
    pub index: Span,
}

/// Check that leaf spans tile their submesh slices back to back with
/// no overlap, and that the slices tile the whole buffers. Used by the
/// packer behind a debug flag after every repack.
pub fn spans_tile_buffers(
    spans: &[MeshDataSpan],
    slices: &[SubmeshSlice],
    vertex_len: u32,
    index_len: u32,
) -> bool {
    let mut cursor_v = 0u32;
    let mut cursor_i = 0u32;
    for span in spans {
        if span.vertex.offset != cursor_v || span.index.offset != cursor_i {
            return false;
        }
        cursor_v = span.vertex.end();
        cursor_i = span.index.end();
    }
    if cursor_v != vertex_len || cursor_i != index_len {
        return false;
    }

    let mut cursor_v = 0u32;
    let mut cursor_i = 0u32;
    for slice in slices {
        if slice.vertex.offset != cursor_v || slice.index.offset != cursor_i {
            return false;
        }
        cursor_v = slice.vertex.end();
        cursor_i = slice.index.end();
    }
    cursor_v == vertex_len && cursor_i == index_len
}
