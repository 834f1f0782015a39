use sculpt_geom::{Rgba, Vec3};

/// Unwelded triangle soup: every triangle owns its three vertices, so the
/// index list is always `0..vertex_count`.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuffer {
    pub pos: Vec<f32>,
    pub col: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuffer {
    /// Clears all arrays but retains capacity for the next remesh.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.col.clear();
        self.idx.clear();
    }

    /// Pre-reserve room for exactly `n` more vertices.
    #[inline]
    pub fn reserve_vertices(&mut self, n: usize) {
        self.pos.reserve_exact(n * 3);
        self.col.reserve_exact(n * 4);
        self.idx.reserve_exact(n);
    }

    #[inline]
    pub(crate) fn push_vertex(&mut self, p: Vec3, c: Rgba) {
        let i = self.vertex_count() as u32;
        self.pos.extend_from_slice(&[p.x, p.y, p.z]);
        self.col.extend_from_slice(&c.to_array());
        self.idx.push(i);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    pub fn vertex(&self, i: usize) -> Option<Vec3> {
        let p = self.pos.get(i * 3..i * 3 + 3)?;
        Some(Vec3::new(p[0], p[1], p[2]))
    }

    pub fn colour(&self, i: usize) -> Option<Rgba> {
        let c = self.col.get(i * 4..i * 4 + 4)?;
        Some(Rgba::new(c[0], c[1], c[2], c[3]))
    }

    /// Returns a slice of interleaved vertex positions (x,y,z per vertex), chunk-local.
    pub fn positions(&self) -> &[f32] {
        &self.pos
    }

    /// Returns a slice of interleaved vertex colours (r,g,b,a per vertex).
    pub fn colours(&self) -> &[f32] {
        &self.col
    }

    pub fn indices(&self) -> &[u32] {
        &self.idx
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.pos.chunks_exact(9).map(|t| {
            [
                Vec3::new(t[0], t[1], t[2]),
                Vec3::new(t[3], t[4], t[5]),
                Vec3::new(t[6], t[7], t[8]),
            ]
        })
    }
}
