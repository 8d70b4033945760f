//! Radial ordering of the edges around a welded vertex.
//!
//! After sorting, walking a vertex's edge list steps from each edge to the
//! next through a face they share, going counter-clockwise about that
//! face's normal. Where the fan is not a single disk (boundary, non-manifold
//! or wire edges) the list splits into groups; each group is internally
//! ordered and groups follow one another.
//!
//! # Algorithm
//!
//! 1. Split the incident edges into group starters (one face, then three or
//!    more faces, then no faces) and two-face edges, each in ascending id.
//! 2. Start a group with the first remaining starter, else the first
//!    remaining two-face edge.
//! 3. From the current edge, try its faces in order: the face's side on the
//!    far side of the vertex is the candidate. Claim it if still unplaced,
//!    otherwise try the next face. No candidate ends the group.
//! 4. A group walked clockwise is reversed in place.

use super::Topology;
use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, TopVertexId};

impl Topology {
    /// Put the edges of one welded vertex in radial order.
    ///
    /// On failure the vertex keeps its previous order.
    pub fn sort_vertex_edges(&mut self, v: TopVertexId) -> Result<()> {
        if v.index() >= self.vertices.len() {
            return Err(MeshError::invalid_param(
                "vertex",
                v.index(),
                "no such welded vertex",
            ));
        }
        let order = self.radial_order(v)?;
        self.vertices[v.index()].edges = order;
        Ok(())
    }

    /// Put the edges of every welded vertex in radial order.
    ///
    /// Every vertex is attempted; the first failure is returned.
    pub fn sort_radial_edges(&mut self) -> Result<()> {
        let mut first_error = None;
        for vi in 0..self.vertices.len() {
            if let Err(err) = self.sort_vertex_edges(TopVertexId::new(vi)) {
                log::warn!("radial sort failed: {}", err);
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => {
                self.radially_sorted = true;
                Ok(())
            }
        }
    }

    /// Returns true if every vertex's edges are in radial order.
    #[inline]
    pub fn is_radially_sorted(&self) -> bool {
        self.radially_sorted
    }

    fn radial_order(&self, v: TopVertexId) -> Result<Vec<EdgeId>> {
        let incident = &self.vertices[v.index()].edges;
        let count = incident.len();
        if count < 2 {
            return Ok(incident.clone());
        }

        let mut one = Vec::new();
        let mut two = Vec::new();
        let mut many = Vec::new();
        let mut wire = Vec::new();
        for &e in incident {
            let edge = self.edges.get(e.index());
            match edge.filter(|edge| edge.other_end(v).is_some()) {
                Some(edge) => match edge.faces.len() {
                    0 => wire.push(e),
                    1 => one.push(e),
                    2 => two.push(e),
                    _ => many.push(e),
                },
                None => {
                    return Err(MeshError::RadialSort {
                        vertex: v.index(),
                        placed: 0,
                        expected: count,
                    })
                }
            }
        }
        one.sort_unstable();
        many.sort_unstable();
        wire.sort_unstable();
        two.sort_unstable();
        let mut starters = one;
        starters.extend(many);
        starters.extend(wire);

        let mut order = Vec::with_capacity(count);
        let mut group_start = 0;
        let mut clockwise = None;
        let mut next = None;
        while order.len() < count {
            let e = match next.take() {
                Some(e) => e,
                None => {
                    close_group(&mut order[group_start..], clockwise.take());
                    group_start = order.len();
                    if !starters.is_empty() {
                        starters.remove(0)
                    } else if !two.is_empty() {
                        two.remove(0)
                    } else {
                        return Err(MeshError::RadialSort {
                            vertex: v.index(),
                            placed: order.len(),
                            expected: count,
                        });
                    }
                }
            };
            order.push(e);

            let edge = &self.edges[e.index()];
            for &f in &edge.faces {
                let face = &self.faces[f.index()];
                let Some(j) = face.side_of(e) else {
                    continue;
                };
                let n = face.side_count();
                let side_end = if face.reversed[j] {
                    edge.ends[0]
                } else {
                    edge.ends[1]
                };
                // the side leaving v follows the one arriving at it
                let forward = side_end == v;
                let k = if forward { (j + 1) % n } else { (j + n - 1) % n };
                let candidate = face.edges[k];
                if claim(&mut starters, candidate) || claim(&mut two, candidate) {
                    clockwise.get_or_insert(forward);
                    next = Some(candidate);
                    break;
                }
            }
        }
        close_group(&mut order[group_start..], clockwise);

        if order.len() != count {
            return Err(MeshError::RadialSort {
                vertex: v.index(),
                placed: order.len(),
                expected: count,
            });
        }
        Ok(order)
    }
}

/// Reverse a finished group that was walked clockwise.
fn close_group(group: &mut [EdgeId], clockwise: Option<bool>) {
    if clockwise == Some(true) {
        group.reverse();
    }
}

/// Remove `e` from `list` if present.
fn claim(list: &mut Vec<EdgeId>, e: EdgeId) -> bool {
    match list.iter().position(|&x| x == e) {
        Some(i) => {
            list.remove(i);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, FaceId, Mesh, VertexId};
    use nalgebra::Point3;

    /// A fan of `n` triangles around vertex 0, counter-clockwise seen from +z.
    fn fan(n: usize, closed: bool) -> Mesh {
        let mut vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let rim = if closed { n } else { n + 1 };
        let step = std::f64::consts::TAU / rim as f64;
        for i in 0..rim {
            let a = i as f64 * step;
            vertices.push(Point3::new(a.cos(), a.sin(), 0.0));
        }
        let faces: Vec<[usize; 3]> = (0..n)
            .map(|i| [0, 1 + i, 1 + (i + 1) % rim])
            .collect();
        build_from_triangles(&vertices, &faces).unwrap()
    }

    /// The rim vertex at the far end of each edge, as mesh indices.
    fn rim_order(top: &Topology, center: TopVertexId) -> Vec<usize> {
        top.vertex(center)
            .edges
            .iter()
            .map(|&e| {
                let other = top.edge(e).other_end(center).unwrap();
                top.vertex(other).vertices[0].index()
            })
            .collect()
    }

    /// Rotate a cyclic sequence so it starts at its smallest element.
    fn canonical_cycle(mut v: Vec<usize>) -> Vec<usize> {
        if let Some(i) = v.iter().enumerate().min_by_key(|&(_, &x)| x).map(|(i, _)| i) {
            v.rotate_left(i);
        }
        v
    }

    #[test]
    fn test_interior_vertex_is_counter_clockwise() {
        let mut mesh = fan(6, true);
        let center = mesh.topology().unwrap().top_vertex_of(VertexId::new(0));
        let top = mesh.sorted_topology().unwrap();
        assert!(top.is_radially_sorted());
        let order = canonical_cycle(rim_order(top, center));
        assert_eq!(order, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_boundary_vertex_starts_at_boundary_edge() {
        let mut mesh = fan(3, false);
        let center = mesh.topology().unwrap().top_vertex_of(VertexId::new(0));
        let top = mesh.sorted_topology().unwrap();
        assert_eq!(rim_order(top, center), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_clockwise_walk_is_reversed() {
        // flipping the fan makes the same walk run clockwise about the normals
        let mut mesh = fan(3, false);
        mesh.flip();
        let center = mesh.topology().unwrap().top_vertex_of(VertexId::new(0));
        let top = mesh.sorted_topology().unwrap();
        assert_eq!(rim_order(top, center), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_consecutive_edges_share_face_winding() {
        let mut mesh = fan(5, true);
        let top = mesh.sorted_topology().unwrap();
        for (vi, tv) in top.vertices().iter().enumerate() {
            let v = TopVertexId::new(vi);
            for pair in tv.edges.windows(2) {
                let (a, b) = (top.edge(pair[0]), top.edge(pair[1]));
                let shared: Vec<FaceId> =
                    a.faces.iter().filter(|f| b.faces.contains(f)).copied().collect();
                for f in shared {
                    let face = top.face(f);
                    let ja = face.side_of(pair[0]).unwrap();
                    let jb = face.side_of(pair[1]).unwrap();
                    let start_a = if face.reversed[ja] { a.ends[1] } else { a.ends[0] };
                    let end_b = if face.reversed[jb] { b.ends[0] } else { b.ends[1] };
                    assert_eq!(start_a, v);
                    assert_eq!(end_b, v);
                }
            }
        }
    }

    #[test]
    fn test_non_manifold_groups_are_complete() {
        // two fans glued at the center only (bow-tie)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [0, 3, 4], [0, 1, 5], [0, 5, 2]];
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
        let before: Vec<Vec<EdgeId>> = mesh
            .topology()
            .unwrap()
            .vertices()
            .iter()
            .map(|v| v.edges.clone())
            .collect();
        let top = mesh.sorted_topology().unwrap();
        for (tv, mut old) in top.vertices().iter().zip(before) {
            let mut new = tv.edges.clone();
            new.sort();
            old.sort();
            assert_eq!(new, old);
        }
    }

    #[test]
    fn test_fin_starts_with_boundary_edges() {
        // three triangles on edge 0-1, each leaving one boundary edge at 0
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
        let before: Vec<Vec<EdgeId>> = mesh
            .topology()
            .unwrap()
            .vertices()
            .iter()
            .map(|v| v.edges.clone())
            .collect();
        let center = mesh.topology().unwrap().top_vertex_of(VertexId::new(0));

        let top = mesh.sorted_topology().unwrap();
        for (tv, mut old) in top.vertices().iter().zip(before) {
            let mut new = tv.edges.clone();
            new.sort();
            old.sort();
            assert_eq!(new, old);
            // a one-face edge starts the list ahead of the shared edge
            assert_eq!(top.edge(tv.edges[0]).faces.len(), 1);
        }

        // lowest boundary edge first, then around through the fin edge; the
        // remaining boundary edge is a group of its own
        assert_eq!(rim_order(top, center), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_wire_edge_is_placed() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        ];
        // the second face welds into the wire edge (0,0,0)-(-1,0,0)
        let faces = vec![[0, 1, 2], [3, 4, 5]];
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
        let center = mesh.topology().unwrap().top_vertex_of(VertexId::new(0));
        let top = mesh.sorted_topology().unwrap();
        assert_eq!(top.vertex(center).edges.len(), 3);
    }

    #[test]
    fn test_out_of_range_vertex() {
        let mesh = fan(3, true);
        let mut top = mesh.topology().unwrap().clone();
        assert!(top.sort_vertex_edges(TopVertexId::new(100)).is_err());
    }
}
