//! Raw mesh-index edges, without welding.

use crate::mesh::{Mesh, VertexId};

impl Mesh {
    /// Unique undirected edges between mesh vertex indices, sorted.
    ///
    /// Zero-length sides (equal indices) and faces with out-of-range
    /// indices are ignored. Vertices at the same position are not welded, so
    /// a seam yields two edges where the topology has one.
    pub fn mesh_edges(&self) -> Vec<[VertexId; 2]> {
        self.collect_edges(|_, _| true)
    }

    /// Unique undirected mesh-index edges that touch any of `vertices`.
    pub fn vertex_edges(&self, vertices: &[VertexId]) -> Vec<[VertexId; 2]> {
        let mut wanted = vec![false; self.vertex_count()];
        for v in vertices {
            if let Some(w) = wanted.get_mut(v.index()) {
                *w = true;
            }
        }
        self.collect_edges(|a, b| wanted[a as usize] || wanted[b as usize])
    }

    fn collect_edges(&self, keep: impl Fn(u32, u32) -> bool) -> Vec<[VertexId; 2]> {
        let n = self.vertex_count();
        let mut edges: Vec<(u32, u32)> = Vec::with_capacity(2 * self.face_count());
        for face in self.faces() {
            if face.vi.iter().any(|&v| v as usize >= n) {
                continue;
            }
            for j in 0..4 {
                let (a, b) = (face.vi[j], face.vi[(j + 1) % 4]);
                if a != b && keep(a, b) {
                    edges.push((a.min(b), a.max(b)));
                }
            }
        }
        edges.sort_unstable();
        edges.dedup();
        edges
            .into_iter()
            .map(|(a, b)| [VertexId::from(a), VertexId::from(b)])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::{build_from_quads, Mesh, VertexId};
    use nalgebra::Point3;

    fn seam_strip() -> Mesh {
        // two quads sharing an edge position, but not indices
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        build_from_quads(&vertices, &[[0, 1, 2, 3], [4, 5, 6, 7]]).unwrap()
    }

    #[test]
    fn test_mesh_edges_do_not_weld() {
        let mesh = seam_strip();
        assert_eq!(mesh.mesh_edges().len(), 8);
        assert_eq!(mesh.topology().unwrap().edge_count(), 7);
    }

    #[test]
    fn test_vertex_edges() {
        let mesh = seam_strip();
        let edges = mesh.vertex_edges(&[VertexId::new(0)]);
        assert_eq!(
            edges,
            vec![
                [VertexId::new(0), VertexId::new(1)],
                [VertexId::new(0), VertexId::new(3)]
            ]
        );
    }

    #[test]
    fn test_triangle_sides_counted_once() {
        let mut mesh = Mesh::new();
        for p in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]] {
            mesh.add_vertex(Point3::new(p[0], p[1], 0.0));
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(2, 1, 0);
        assert_eq!(mesh.mesh_edges().len(), 3);
    }
}
