use bytemuck::{Pod, Zeroable};

/// One mesh vertex record, laid out for direct GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BlockVertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
    /// Face direction, 0-5; picks the texture layer for a material's side.
    pub side: i32,
    /// Opaque material id of the emitting block.
    pub block: i32,
}

/// CPU-side surface mesh for one chunk: a flat run of vertex records,
/// two triangles (six vertices) per emitted quad.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    verts: Vec<BlockVertex>,
}

impl ChunkMesh {
    pub(crate) fn with_reserved(verts: Vec<BlockVertex>) -> Self {
        Self { verts }
    }

    pub(crate) fn push(&mut self, v: BlockVertex) {
        self.verts.push(v);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    #[inline]
    pub fn verts(&self) -> &[BlockVertex] {
        &self.verts
    }

    /// Raw vertex bytes for the external upload step.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.verts)
    }
}
