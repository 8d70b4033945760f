//! Mesh topology: unique vertices, unique edges and face adjacency.
//!
//! A [`Topology`] is derived from a [`Mesh`]. Mesh vertices that sit at the
//! same position are welded into one [`TopVertex`]; every undirected side of
//! every face becomes one [`TopEdge`]; every face gets a [`TopFace`] naming
//! its edges and the direction it walks them.
//!
//! # Tolerance
//!
//! Faces whose raw indices are out of range or repeat a vertex are skipped,
//! and so are faces that collapse once their corners are welded (for example
//! a quad with two corners at the same position). Such faces get a sentinel
//! [`TopFace`] with invalid edge ids and appear in no edge's face list. Edges
//! used only by skipped faces are kept as wire edges with no faces.
//!
//! # Example
//!
//! ```
//! use meshtopo::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//!
//! let top = mesh.topology().unwrap();
//! assert_eq!(top.vertex_count(), 4);
//! assert_eq!(top.edge_count(), 5);
//! assert!(!top.is_closed());
//! ```

mod edges;
mod radial;
mod unify;

pub use unify::{unify_positions, Unification};

pub(crate) use unify::compare_points;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, Face, FaceId, Mesh, TopVertexId, VertexId};

/// A welded vertex: every mesh vertex at one position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopVertex {
    /// Mesh vertices at this position, ascending.
    pub vertices: Vec<VertexId>,

    /// Incident edges. Ascending after a build, radial after a sort.
    pub edges: Vec<EdgeId>,
}

/// An undirected edge between two welded vertices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopEdge {
    /// End points, smaller id first.
    pub ends: [TopVertexId; 2],

    /// Faces using this edge, ascending.
    pub faces: Vec<FaceId>,
}

impl TopEdge {
    /// The end opposite `v`, or `None` if `v` is not an end.
    pub fn other_end(&self, v: TopVertexId) -> Option<TopVertexId> {
        if self.ends[0] == v {
            Some(self.ends[1])
        } else if self.ends[1] == v {
            Some(self.ends[0])
        } else {
            None
        }
    }
}

/// The edges around one face.
///
/// Side `j` runs from corner `j` to corner `(j + 1) % n`. `reversed[j]` is
/// true when the face walks edge `edges[j]` from `ends[1]` to `ends[0]`. For
/// triangles the fourth slot repeats the third.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopFace {
    /// Edge of each side.
    pub edges: [EdgeId; 4],

    /// Whether each side runs against its edge's canonical direction.
    pub reversed: [bool; 4],
}

impl Default for TopFace {
    fn default() -> Self {
        Self {
            edges: [EdgeId::invalid(); 4],
            reversed: [false; 4],
        }
    }
}

impl TopFace {
    /// Returns false for the sentinel given to skipped faces.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.edges[0].is_valid()
    }

    /// Returns true if the face has three sides.
    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.edges[2] == self.edges[3]
    }

    /// Returns true if the face has four sides.
    #[inline]
    pub fn is_quad(&self) -> bool {
        self.edges[2] != self.edges[3]
    }

    /// Number of sides: 3 or 4, and 0 for a sentinel.
    #[inline]
    pub fn side_count(&self) -> usize {
        if !self.is_valid() {
            0
        } else if self.is_triangle() {
            3
        } else {
            4
        }
    }

    /// The side that uses edge `e`, if any.
    pub fn side_of(&self, e: EdgeId) -> Option<usize> {
        (0..self.side_count()).find(|&j| self.edges[j] == e)
    }
}

/// The adjacency graph of a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    /// Welded vertex of each mesh vertex.
    vertex_map: Vec<TopVertexId>,
    vertices: Vec<TopVertex>,
    edges: Vec<TopEdge>,
    faces: Vec<TopFace>,
    radially_sorted: bool,
}

impl Topology {
    /// Build the topology of a mesh.
    ///
    /// Malformed faces are skipped as described in the module docs. Fails
    /// with [`MeshError::MalformedTopology`] when a mesh with faces yields
    /// fewer than three edges, since no face can close.
    pub fn build(mesh: &Mesh) -> Result<Self> {
        let vertex_count = mesh.vertex_count();
        let face_count = mesh.face_count();

        let unified = unify_positions(mesh.vertices());
        let vertices: Vec<TopVertex> = unified
            .groups()
            .map(|g| TopVertex {
                vertices: g.iter().map(|&v| VertexId::from(v)).collect(),
                edges: Vec::new(),
            })
            .collect();
        let vertex_map = unified.map;

        // One (lo, hi, face) record per non-degenerate side of a usable face
        let mut sides: Vec<(u32, u32, u32)> = Vec::with_capacity(4 * face_count);
        let mut skipped = 0usize;
        for (fi, face) in mesh.faces().iter().enumerate() {
            if !face.is_valid(vertex_count) {
                skipped += 1;
                continue;
            }
            let tv = face.vi.map(|v| vertex_map[v as usize].raw());
            for j in 0..4 {
                let (a, b) = (tv[j], tv[(j + 1) % 4]);
                if a != b {
                    sides.push((a.min(b), a.max(b), fi as u32));
                }
            }
        }
        sides.sort_unstable();

        let mut edges: Vec<TopEdge> = Vec::new();
        for &(lo, hi, fi) in &sides {
            let ends = [TopVertexId::from(lo), TopVertexId::from(hi)];
            match edges.last_mut() {
                Some(last) if last.ends == ends => last.faces.push(FaceId::from(fi)),
                _ => edges.push(TopEdge {
                    ends,
                    faces: vec![FaceId::from(fi)],
                }),
            }
        }

        if face_count > 0 && edges.len() < 3 {
            log::warn!(
                "topology rejected: {} faces produced {} edges",
                face_count,
                edges.len()
            );
            return Err(MeshError::MalformedTopology {
                faces: face_count,
                edges: edges.len(),
            });
        }

        let mut top = Topology {
            vertex_map,
            vertices,
            edges,
            faces: vec![TopFace::default(); face_count],
            radially_sorted: false,
        };

        for (ei, edge) in top.edges.iter().enumerate() {
            let e = EdgeId::new(ei);
            top.vertices[edge.ends[0].index()].edges.push(e);
            top.vertices[edge.ends[1].index()].edges.push(e);
        }

        let mut collapsed = 0usize;
        for (fi, face) in mesh.faces().iter().enumerate() {
            if !face.is_valid(vertex_count) {
                continue;
            }
            match top.face_edges(face) {
                Some(topf) => top.faces[fi] = topf,
                None => collapsed += 1,
            }
        }
        if collapsed > 0 {
            let faces = &top.faces;
            for edge in &mut top.edges {
                edge.faces.retain(|f| faces[f.index()].is_valid());
            }
        }

        if skipped + collapsed > 0 {
            log::warn!(
                "topology skipped {} invalid and {} collapsed faces",
                skipped,
                collapsed
            );
        }
        log::debug!(
            "built topology: {} vertices, {} edges, {} faces",
            top.vertices.len(),
            top.edges.len(),
            top.faces.len()
        );
        Ok(top)
    }

    /// Resolve the edges of a face, or `None` if its welded corners collapse.
    fn face_edges(&self, face: &Face) -> Option<TopFace> {
        let n = face.corner_count();
        let tv = face.vi.map(|v| self.vertex_map[v as usize]);
        let mut topf = TopFace::default();
        for j in 0..n {
            let (a, b) = (tv[j], tv[(j + 1) % n]);
            if a == b {
                return None;
            }
            topf.edges[j] = self.find_edge(a, b)?;
            topf.reversed[j] = a > b;
        }
        for j in 0..n {
            if topf.edges[..j].contains(&topf.edges[j]) {
                return None;
            }
        }
        if n == 3 {
            topf.edges[3] = topf.edges[2];
            topf.reversed[3] = topf.reversed[2];
        }
        Some(topf)
    }

    // ==================== Access ====================

    /// Number of welded vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces (equal to the mesh face count).
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Welded vertex of each mesh vertex.
    #[inline]
    pub fn vertex_map(&self) -> &[TopVertexId] {
        &self.vertex_map
    }

    /// All welded vertices.
    #[inline]
    pub fn vertices(&self) -> &[TopVertex] {
        &self.vertices
    }

    /// All edges, sorted by `ends`.
    #[inline]
    pub fn edges(&self) -> &[TopEdge] {
        &self.edges
    }

    /// All faces.
    #[inline]
    pub fn faces(&self) -> &[TopFace] {
        &self.faces
    }

    /// Get a welded vertex by ID.
    #[inline]
    pub fn vertex(&self, v: TopVertexId) -> &TopVertex {
        &self.vertices[v.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, e: EdgeId) -> &TopEdge {
        &self.edges[e.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, f: FaceId) -> &TopFace {
        &self.faces[f.index()]
    }

    /// Welded vertex of a mesh vertex.
    #[inline]
    pub fn top_vertex_of(&self, v: VertexId) -> TopVertexId {
        self.vertex_map[v.index()]
    }

    /// Find the edge joining two welded vertices, in either order.
    pub fn find_edge(&self, a: TopVertexId, b: TopVertexId) -> Option<EdgeId> {
        if a == b {
            return None;
        }
        let key = [a.min(b), a.max(b)];
        self.edges
            .binary_search_by(|e| e.ends.cmp(&key))
            .ok()
            .map(EdgeId::new)
    }

    /// Welded vertices of a face's corners. Out-of-range corners map to
    /// an invalid id.
    pub fn face_top_vertices(&self, face: &Face) -> [TopVertexId; 4] {
        face.vi.map(|v| {
            self.vertex_map
                .get(v as usize)
                .copied()
                .unwrap_or_else(TopVertexId::invalid)
        })
    }

    /// Position of a welded vertex.
    pub fn vertex_position(&self, mesh: &Mesh, v: TopVertexId) -> Option<Point3<f64>> {
        let first = self.vertices.get(v.index())?.vertices.first()?;
        mesh.vertices().get(first.index()).copied()
    }

    /// End point positions of an edge.
    pub fn edge_segment(&self, mesh: &Mesh, e: EdgeId) -> Option<(Point3<f64>, Point3<f64>)> {
        let edge = self.edges.get(e.index())?;
        Some((
            self.vertex_position(mesh, edge.ends[0])?,
            self.vertex_position(mesh, edge.ends[1])?,
        ))
    }

    // ==================== Classification ====================

    /// Returns true if there are at least six edges and every edge has
    /// exactly two faces.
    pub fn is_closed(&self) -> bool {
        self.edges.len() >= 6 && self.edges.iter().all(|e| e.faces.len() == 2)
    }

    /// Returns true if no edge has more than two faces.
    pub fn is_manifold(&self) -> bool {
        self.edges.iter().all(|e| e.faces.len() <= 2)
    }

    /// Returns true if every two-face edge is walked once in each direction.
    pub fn is_oriented(&self) -> bool {
        self.edges.iter().enumerate().all(|(ei, edge)| {
            let [f0, f1] = match edge.faces[..] {
                [f0, f1] => [f0, f1],
                _ => return true,
            };
            let e = EdgeId::new(ei);
            let dir = |f: FaceId| {
                let face = &self.faces[f.index()];
                face.side_of(e).map(|j| face.reversed[j])
            };
            match (dir(f0), dir(f1)) {
                (Some(a), Some(b)) => a != b,
                _ => false,
            }
        })
    }

    /// Number of edges with exactly one face.
    pub fn boundary_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.faces.len() == 1).count()
    }

    // ==================== Validation ====================

    /// Check every cross reference against the mesh it was built from.
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self, mesh: &Mesh) -> Result<()> {
        let bad = |msg: String| Err(MeshError::InvalidState(msg));
        let v_count = mesh.vertex_count();
        let f_count = mesh.face_count();
        let tv_count = self.vertices.len();
        let te_count = self.edges.len();

        if tv_count > v_count || (tv_count == 0 && v_count > 0) {
            return bad(format!("{} welded vertices for {} vertices", tv_count, v_count));
        }
        if self.faces.len() != f_count {
            return bad(format!("{} top faces for {} faces", self.faces.len(), f_count));
        }
        if f_count > 0 && te_count < 3 {
            return bad(format!("{} edges for {} faces", te_count, f_count));
        }
        if self.vertex_map.len() != v_count {
            return bad("vertex map length mismatch".to_string());
        }

        let mut seen = vec![false; v_count];
        for (tvi, tv) in self.vertices.iter().enumerate() {
            let Some(&first) = tv.vertices.first() else {
                return bad(format!("welded vertex {} is empty", tvi));
            };
            let Some(p) = mesh.vertices().get(first.index()) else {
                return bad(format!("welded vertex {} references {:?}", tvi, first));
            };
            for &v in &tv.vertices {
                let Some(q) = mesh.vertices().get(v.index()) else {
                    return bad(format!("welded vertex {} references {:?}", tvi, v));
                };
                if std::mem::replace(&mut seen[v.index()], true) {
                    return bad(format!("{:?} is welded more than once", v));
                }
                if compare_points(p, q).is_ne() || self.vertex_map[v.index()].index() != tvi {
                    return bad(format!("{:?} does not belong to welded vertex {}", v, tvi));
                }
            }
            for (j, &e) in tv.edges.iter().enumerate() {
                let Some(edge) = self.edges.get(e.index()) else {
                    return bad(format!("welded vertex {} lists missing {:?}", tvi, e));
                };
                if edge.other_end(TopVertexId::new(tvi)).is_none() {
                    return bad(format!("{:?} does not touch welded vertex {}", e, tvi));
                }
                if tv.edges[..j].contains(&e) {
                    return bad(format!("welded vertex {} lists {:?} twice", tvi, e));
                }
            }
        }
        if let Some(v) = seen.iter().position(|&s| !s) {
            return bad(format!("V({}) is not welded", v));
        }

        for (ei, edge) in self.edges.iter().enumerate() {
            let e = EdgeId::new(ei);
            let [a, b] = edge.ends;
            if a >= b || b.index() >= tv_count {
                return bad(format!("{:?} has ends {:?}", e, edge.ends));
            }
            if ei > 0 && self.edges[ei - 1].ends >= edge.ends {
                return bad(format!("{:?} is out of order", e));
            }
            for end in edge.ends {
                if !self.vertices[end.index()].edges.contains(&e) {
                    return bad(format!("{:?} is not linked from {:?}", e, end));
                }
            }
            for &f in &edge.faces {
                match self.faces.get(f.index()) {
                    Some(topf) if topf.side_of(e).is_some() => {}
                    _ => return bad(format!("{:?} lists {:?} which does not use it", e, f)),
                }
            }
        }

        for (fi, topf) in self.faces.iter().enumerate() {
            let f = FaceId::new(fi);
            if !topf.is_valid() {
                if topf.edges.iter().any(|e| e.is_valid()) {
                    return bad(format!("{:?} is a partial sentinel", f));
                }
                continue;
            }
            let face = mesh.face(f);
            if !face.is_valid(v_count) || face.is_triangle() != topf.is_triangle() {
                return bad(format!("{:?} does not match its mesh face", f));
            }
            let tv = self.face_top_vertices(face);
            let n = topf.side_count();
            for j in 0..n {
                let Some(edge) = self.edges.get(topf.edges[j].index()) else {
                    return bad(format!("{:?} side {} has no edge", f, j));
                };
                if edge.faces.iter().filter(|&&g| g == f).count() != 1 {
                    return bad(format!("{:?} is not listed once by its side {}", f, j));
                }
                let (start, end) = (tv[j], tv[(j + 1) % n]);
                let expected = if topf.reversed[j] {
                    [end, start]
                } else {
                    [start, end]
                };
                if edge.ends != expected {
                    return bad(format!("{:?} side {} has the wrong direction", f, j));
                }
            }
        }
        Ok(())
    }

    /// Check if the topology is consistent with `mesh`.
    pub fn is_valid(&self, mesh: &Mesh) -> bool {
        self.validate(mesh).is_ok()
    }
}
