//! Indexed triangle/quad mesh.
//!
//! [`Mesh`] stores flat arrays: vertex positions, optional per-vertex
//! attributes (normals, texture coordinates, colors), faces as four-index
//! records, and optional per-face normals. Each optional array is either
//! empty or exactly as long as the array it parallels.
//!
//! # Derived data
//!
//! The mesh owns two caches:
//! - a [`Topology`], built lazily on the first call to [`Mesh::topology`];
//! - a [`Partition`], built only on request by
//!   [`partition`](crate::algo::partition::partition).
//!
//! Every method that changes vertices or faces drops both caches, so a
//! derived structure can never be observed out of date.

use nalgebra::{Point2, Point3, Vector3};
use once_cell::sync::OnceCell;
use rayon::prelude::*;

use super::face::Face;
use super::index::{FaceId, VertexId};
use crate::algo::partition::Partition;
use crate::error::{MeshError, Result};
use crate::topology::Topology;

/// An RGBA vertex color.
pub type Color = [u8; 4];

/// An indexed mesh of triangles and quads.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub(crate) vertices: Vec<Point3<f64>>,

    /// Per-vertex normals (empty or `vertices.len()`).
    pub(crate) normals: Vec<Vector3<f64>>,

    /// Per-vertex texture coordinates (empty or `vertices.len()`).
    pub(crate) texcoords: Vec<Point2<f64>>,

    /// Per-vertex colors (empty or `vertices.len()`).
    pub(crate) colors: Vec<Color>,

    /// Faces.
    pub(crate) faces: Vec<Face>,

    /// Per-face normals (empty or `faces.len()`).
    pub(crate) face_normals: Vec<Vector3<f64>>,

    /// Lazily built topology.
    pub(crate) topology: OnceCell<Topology>,

    /// Partition from the last successful partitioning request.
    pub(crate) partition: Option<Partition>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            faces: Vec::with_capacity(num_faces),
            ..Self::default()
        }
    }

    // ==================== Counts ====================

    /// Get the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of triangle faces.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_triangle()).count()
    }

    /// Get the number of quad faces.
    pub fn quad_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_quad()).count()
    }

    /// Get the number of faces that fail [`Face::is_valid`].
    pub fn invalid_face_count(&self) -> usize {
        let n = self.vertices.len();
        self.faces.iter().filter(|f| !f.is_valid(n)).count()
    }

    // ==================== Access ====================

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertices[v.index()]
    }

    /// Faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.index()]
    }

    /// Per-vertex normals, empty if absent.
    #[inline]
    pub fn vertex_normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Per-vertex texture coordinates, empty if absent.
    #[inline]
    pub fn texture_coordinates(&self) -> &[Point2<f64>] {
        &self.texcoords
    }

    /// Per-vertex colors, empty if absent.
    #[inline]
    pub fn vertex_colors(&self) -> &[Color] {
        &self.colors
    }

    /// Per-face normals, empty if absent.
    #[inline]
    pub fn face_normals(&self) -> &[Vector3<f64>] {
        &self.face_normals
    }

    /// Returns true if every vertex has a normal.
    pub fn has_vertex_normals(&self) -> bool {
        !self.vertices.is_empty() && self.normals.len() == self.vertices.len()
    }

    /// Returns true if every vertex has texture coordinates.
    pub fn has_texture_coordinates(&self) -> bool {
        !self.vertices.is_empty() && self.texcoords.len() == self.vertices.len()
    }

    /// Returns true if every vertex has a color.
    pub fn has_vertex_colors(&self) -> bool {
        !self.vertices.is_empty() && self.colors.len() == self.vertices.len()
    }

    /// Returns true if every face has a normal.
    pub fn has_face_normals(&self) -> bool {
        !self.faces.is_empty() && self.face_normals.len() == self.faces.len()
    }

    // ==================== Geometry ====================

    /// Get the corner positions of a face (the last repeats for triangles).
    pub fn face_positions(&self, f: FaceId) -> [Point3<f64>; 4] {
        self.faces[f.index()].vi.map(|v| self.vertices[v as usize])
    }

    /// Compute the unit normal of a face from its diagonals.
    ///
    /// Returns `None` when the diagonals are parallel or a corner is out of
    /// range.
    pub fn face_normal(&self, f: FaceId) -> Option<Vector3<f64>> {
        face_normal(&self.vertices, &self.faces[f.index()])
    }

    /// Compute the centroid of a face's distinct corners.
    pub fn face_centroid(&self, f: FaceId) -> Point3<f64> {
        let face = &self.faces[f.index()];
        let sum = face
            .corners()
            .iter()
            .fold(Vector3::zeros(), |acc, &v| acc + self.vertices[v as usize].coords);
        Point3::from(sum / face.corner_count() as f64)
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    /// Recompute every face normal.
    ///
    /// Faces whose normal cannot be computed get a zero vector.
    pub fn compute_face_normals(&mut self, parallel: bool) {
        let vertices = &self.vertices;
        let normal = |f: &Face| face_normal(vertices, f).unwrap_or_else(Vector3::zeros);
        self.face_normals = if parallel {
            self.faces.par_iter().map(normal).collect()
        } else {
            self.faces.iter().map(normal).collect()
        };
    }

    /// Recompute every vertex normal as the unit sum of the normals of the
    /// valid faces that use the vertex.
    ///
    /// Face normals are computed first when the mesh has none. A vertex that
    /// no valid face uses gets `+z`, and the call then returns false. A mesh
    /// without vertices or faces is left alone and also returns false.
    pub fn compute_vertex_normals(&mut self, parallel: bool) -> bool {
        let vertex_count = self.vertices.len();
        if vertex_count == 0 || self.faces.is_empty() {
            return false;
        }
        if !self.has_face_normals() {
            self.compute_face_normals(parallel);
        }

        let mut sums = vec![Vector3::zeros(); vertex_count];
        for (face, n) in self.faces.iter().zip(&self.face_normals) {
            if face.is_valid(vertex_count) {
                for &v in face.corners() {
                    sums[v as usize] += n;
                }
            }
        }
        let mut complete = true;
        for n in &mut sums {
            match n.try_normalize(0.0) {
                Some(unit) => *n = unit,
                None => {
                    *n = Vector3::z();
                    complete = false;
                }
            }
        }
        self.normals = sums;
        complete
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    ///
    /// Per-vertex attribute arrays are dropped, since they would no longer
    /// cover every vertex.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        self.invalidate();
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(position);
        self.normals.clear();
        self.texcoords.clear();
        self.colors.clear();
        id
    }

    /// Add a face and return its ID. Face normals are dropped.
    ///
    /// The face is stored as given; use [`Mesh::is_valid`] or
    /// [`build_from_faces`](super::build_from_faces) for validated input.
    pub fn add_face(&mut self, face: Face) -> FaceId {
        self.invalidate();
        let id = FaceId::new(self.faces.len());
        self.faces.push(face);
        self.face_normals.clear();
        id
    }

    /// Add a triangle face and return its ID.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) -> FaceId {
        self.add_face(Face::triangle(a, b, c))
    }

    /// Add a quad face and return its ID.
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) -> FaceId {
        self.add_face(Face::quad(a, b, c, d))
    }

    /// Append a copy of `other`, shifting its face indices past the vertices
    /// already in this mesh.
    ///
    /// An optional attribute is kept when both meshes have it, or when this
    /// mesh had no vertices (no faces, for face normals) and `other` has it.
    /// Otherwise it is dropped.
    pub fn append(&mut self, other: &Mesh) {
        self.invalidate();
        let vertex_count = self.vertices.len();
        let face_count = self.faces.len();
        let merge_vertex_attr = |ours: bool, theirs: bool| (vertex_count == 0 || ours) && theirs;
        let keep_normals = merge_vertex_attr(self.has_vertex_normals(), other.has_vertex_normals());
        let keep_texcoords =
            merge_vertex_attr(self.has_texture_coordinates(), other.has_texture_coordinates());
        let keep_colors = merge_vertex_attr(self.has_vertex_colors(), other.has_vertex_colors());
        let keep_face_normals =
            (face_count == 0 || self.has_face_normals()) && other.has_face_normals();

        let offset = vertex_count as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(other.faces.iter().map(|f| Face {
            vi: f.vi.map(|v| v.saturating_add(offset)),
        }));
        extend_or_clear(&mut self.normals, &other.normals, keep_normals);
        extend_or_clear(&mut self.texcoords, &other.texcoords, keep_texcoords);
        extend_or_clear(&mut self.colors, &other.colors, keep_colors);
        extend_or_clear(&mut self.face_normals, &other.face_normals, keep_face_normals);
    }

    /// Move a vertex.
    pub fn set_position(&mut self, v: VertexId, position: Point3<f64>) {
        self.invalidate();
        self.vertices[v.index()] = position;
    }

    /// Replace a face.
    pub fn set_face(&mut self, f: FaceId, face: Face) {
        self.invalidate();
        self.faces[f.index()] = face;
    }

    /// Mutable access to all vertex positions. Drops the derived caches.
    pub fn vertices_mut(&mut self) -> &mut [Point3<f64>] {
        self.invalidate();
        &mut self.vertices
    }

    /// Mutable access to all faces. Drops the derived caches.
    pub fn faces_mut(&mut self) -> &mut [Face] {
        self.invalidate();
        &mut self.faces
    }

    /// Set per-vertex normals. Pass an empty vector to remove them.
    pub fn set_vertex_normals(&mut self, normals: Vec<Vector3<f64>>) -> Result<()> {
        check_len("normals", self.vertices.len(), normals.len())?;
        self.normals = normals;
        Ok(())
    }

    /// Set per-vertex texture coordinates. Pass an empty vector to remove them.
    pub fn set_texture_coordinates(&mut self, texcoords: Vec<Point2<f64>>) -> Result<()> {
        check_len("texcoords", self.vertices.len(), texcoords.len())?;
        self.texcoords = texcoords;
        Ok(())
    }

    /// Set per-vertex colors. Pass an empty vector to remove them.
    pub fn set_vertex_colors(&mut self, colors: Vec<Color>) -> Result<()> {
        check_len("colors", self.vertices.len(), colors.len())?;
        self.colors = colors;
        Ok(())
    }

    /// Set per-face normals. Pass an empty vector to remove them.
    pub fn set_face_normals(&mut self, normals: Vec<Vector3<f64>>) -> Result<()> {
        check_len("face_normals", self.faces.len(), normals.len())?;
        self.face_normals = normals;
        Ok(())
    }

    /// Reverse the orientation of every face and negate all normals.
    pub fn flip(&mut self) {
        self.invalidate();
        for f in &mut self.faces {
            f.flip();
        }
        for n in self.normals.iter_mut().chain(self.face_normals.iter_mut()) {
            *n = -*n;
        }
    }

    /// Remove all vertices, faces and attributes.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // ==================== Derived data ====================

    /// Get the topology, building it on first use.
    ///
    /// A failed build is not cached; the next call tries again.
    pub fn topology(&self) -> Result<&Topology> {
        self.topology.get_or_try_init(|| Topology::build(self))
    }

    /// Get the topology with every vertex's edges in radial order.
    pub fn sorted_topology(&mut self) -> Result<&Topology> {
        self.topology()?;
        let top = self
            .topology
            .get_mut()
            .ok_or_else(|| MeshError::InvalidState("topology cache is empty".to_string()))?;
        if !top.is_radially_sorted() {
            top.sort_radial_edges()?;
        }
        Ok(&*top)
    }

    /// Returns true if a topology is cached.
    pub fn has_topology(&self) -> bool {
        self.topology.get().is_some()
    }

    /// Drop the cached topology.
    pub fn destroy_topology(&mut self) {
        self.topology = OnceCell::new();
    }

    /// The cached partition, if one has been built.
    pub fn partition(&self) -> Option<&Partition> {
        self.partition.as_ref()
    }

    /// Drop the cached partition.
    pub fn destroy_partition(&mut self) {
        self.partition = None;
    }

    /// Drop every derived cache.
    pub(crate) fn invalidate(&mut self) {
        self.destroy_topology();
        self.destroy_partition();
    }

    // ==================== Validation ====================

    /// Check attribute lengths and every face, returning the first problem.
    pub fn validate(&self) -> Result<()> {
        let n = self.vertices.len();
        check_len("normals", n, self.normals.len())?;
        check_len("texcoords", n, self.texcoords.len())?;
        check_len("colors", n, self.colors.len())?;
        check_len("face_normals", self.faces.len(), self.face_normals.len())?;

        for (fi, face) in self.faces.iter().enumerate() {
            if let Some(&v) = face.vi.iter().find(|&&v| v as usize >= n) {
                return Err(MeshError::InvalidVertexIndex {
                    face: fi,
                    vertex: v as usize,
                });
            }
            if !face.is_valid(n) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
        Ok(())
    }

    /// Check if the mesh is structurally valid.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn check_len(name: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual == 0 || actual == expected {
        Ok(())
    } else {
        Err(MeshError::AttributeLength {
            name,
            expected,
            actual,
        })
    }
}

fn extend_or_clear<T: Copy>(ours: &mut Vec<T>, theirs: &[T], keep: bool) {
    if keep {
        ours.extend_from_slice(theirs);
    } else {
        ours.clear();
    }
}

/// Unit normal from the cross product of the face diagonals.
pub(crate) fn face_normal(vertices: &[Point3<f64>], face: &Face) -> Option<Vector3<f64>> {
    let mut p = [Point3::origin(); 4];
    for (slot, &v) in p.iter_mut().zip(&face.vi) {
        *slot = *vertices.get(v as usize)?;
    }
    let n = (p[2] - p[0]).cross(&(p[3] - p[1]));
    let len = n.norm();
    if len > 0.0 && len.is_finite() {
        Some(n / len)
    } else {
        None
    }
}
