//! Lockstep reordering and compaction of a mesh's parallel arrays.
//!
//! Vertex positions and the per-vertex attributes must stay aligned, as must
//! faces and face normals. Every reorder in the crate goes through the
//! helpers here so the arrays are always permuted together.

use super::indexed::Mesh;

/// Reorder `values` so that `new[i] = old[order[i]]`.
///
/// Arrays whose length differs from `order` (absent attributes) are left alone.
pub(crate) fn permute<T: Copy>(values: &mut Vec<T>, order: &[usize]) {
    if values.len() != order.len() {
        return;
    }
    let permuted: Vec<T> = order.iter().map(|&i| values[i]).collect();
    *values = permuted;
}

/// Keep the entries whose `keep` flag is set.
///
/// Arrays whose length differs from `keep` are left alone.
pub(crate) fn retain_by_mask<T>(values: &mut Vec<T>, keep: &[bool]) {
    if values.len() != keep.len() {
        return;
    }
    let mut flags = keep.iter();
    values.retain(|_| flags.next().copied().unwrap_or(false));
}

/// The inverse of a permutation: `inverse[order[i]] = i`.
pub(crate) fn invert(order: &[usize]) -> Vec<u32> {
    let mut inverse = vec![0u32; order.len()];
    for (new, &old) in order.iter().enumerate() {
        inverse[old] = new as u32;
    }
    inverse
}

impl Mesh {
    /// Reorder vertices and every per-vertex attribute, then remap faces.
    ///
    /// `order[i]` is the old index of the vertex that ends up at `i`. Faces
    /// must reference only in-range vertices.
    pub(crate) fn permute_vertices(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.vertices.len());
        permute(&mut self.vertices, order);
        permute(&mut self.normals, order);
        permute(&mut self.texcoords, order);
        permute(&mut self.colors, order);

        let inverse = invert(order);
        for face in &mut self.faces {
            for v in &mut face.vi {
                *v = inverse[*v as usize];
            }
        }
        self.invalidate();
    }

    /// Reorder faces and face normals.
    pub(crate) fn permute_faces(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.faces.len());
        permute(&mut self.faces, order);
        permute(&mut self.face_normals, order);
        self.invalidate();
    }

    /// Remove the faces whose flag is not set. Returns the number removed.
    pub(crate) fn retain_faces(&mut self, keep: &[bool]) -> usize {
        let before = self.faces.len();
        retain_by_mask(&mut self.faces, keep);
        retain_by_mask(&mut self.face_normals, keep);
        let removed = before - self.faces.len();
        if removed > 0 {
            self.invalidate();
        }
        removed
    }

    /// Remove the vertices whose flag is not set and remap faces.
    ///
    /// Faces must not reference removed vertices. Returns the number removed.
    pub(crate) fn retain_vertices(&mut self, keep: &[bool]) -> usize {
        let mut remap = vec![u32::MAX; keep.len()];
        let mut next = 0u32;
        for (old, _) in keep.iter().enumerate().filter(|&(_, &k)| k) {
            remap[old] = next;
            next += 1;
        }
        let removed = keep.len() - next as usize;
        if removed == 0 {
            return 0;
        }

        retain_by_mask(&mut self.vertices, keep);
        retain_by_mask(&mut self.normals, keep);
        retain_by_mask(&mut self.texcoords, keep);
        retain_by_mask(&mut self.colors, keep);
        for face in &mut self.faces {
            for v in &mut face.vi {
                *v = remap[*v as usize];
            }
        }
        self.invalidate();
        removed
    }
}
