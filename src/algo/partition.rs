//! Splitting a mesh into size-bounded parts.
//!
//! A [`Partition`] cuts a mesh into consecutive face ranges, each with its
//! own consecutive vertex range, so that every part can be drawn or shipped
//! as a small self-contained mesh. Both limits are per part: at most
//! `max_vertices` vertices and at most `max_triangles` triangles, a quad
//! counting as two.
//!
//! Building a partition reorders the mesh itself. Faces are sorted so that
//! nearby faces are adjacent, then vertices are sorted so that each part's
//! vertices are contiguous. Adjacent parts share the vertices on their
//! common border; a vertex needed by a part further away is duplicated.
//!
//! # Example
//!
//! ```
//! use meshtopo::algo::partition::{partition, PartitionOptions};
//! use meshtopo::mesh::build_from_quads;
//! use nalgebra::Point3;
//!
//! // a 4x4 grid of quads
//! let mut vertices = Vec::new();
//! for j in 0..5 {
//!     for i in 0..5 {
//!         vertices.push(Point3::new(i as f64, j as f64, 0.0));
//!     }
//! }
//! let mut quads = Vec::new();
//! for j in 0..4 {
//!     for i in 0..4 {
//!         let v = j * 5 + i;
//!         quads.push([v, v + 1, v + 6, v + 5]);
//!     }
//! }
//! let mut mesh = build_from_quads(&vertices, &quads).unwrap();
//!
//! let options = PartitionOptions::new(12, 8);
//! let parts = partition(&mut mesh, &options).unwrap();
//! assert!(parts.part_count() > 1);
//! for part in parts.parts() {
//!     assert!(part.vertex_count <= 12 && part.triangle_count <= 8);
//! }
//! ```

use std::collections::HashMap;
use std::ops::Range;

use nalgebra::Point3;
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::mesh::{Face, Mesh};

/// Options for [`partition`].
#[derive(Debug, Clone)]
pub struct PartitionOptions {
    /// Maximum number of vertices in a part (at least 3).
    pub max_vertices: usize,

    /// Maximum number of triangles in a part, quads counting as two
    /// (at least 1).
    pub max_triangles: usize,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            max_vertices: u16::MAX as usize,
            max_triangles: u16::MAX as usize,
            parallel: true,
        }
    }
}

impl PartitionOptions {
    /// Create options with the given limits.
    pub fn new(max_vertices: usize, max_triangles: usize) -> Self {
        Self {
            max_vertices,
            max_triangles,
            ..Self::default()
        }
    }

    /// Set the vertex limit.
    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices;
        self
    }

    /// Set the triangle limit.
    pub fn with_max_triangles(mut self, max_triangles: usize) -> Self {
        self.max_triangles = max_triangles;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// One part of a [`Partition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshPart {
    /// Faces of the part.
    pub faces: Range<usize>,

    /// Vertices used by the part's faces.
    pub vertices: Range<usize>,

    /// Number of vertices, equal to `vertices.len()`.
    pub vertex_count: usize,

    /// Number of triangles, quads counting as two.
    pub triangle_count: usize,
}

/// A mesh cut into consecutive parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    parts: Vec<MeshPart>,
    max_vertex_count: usize,
    max_triangle_count: usize,
}

impl Partition {
    /// The parts in face order.
    #[inline]
    pub fn parts(&self) -> &[MeshPart] {
        &self.parts
    }

    /// Get a part by index.
    #[inline]
    pub fn part(&self, i: usize) -> &MeshPart {
        &self.parts[i]
    }

    /// Number of parts.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Largest vertex count of any part.
    #[inline]
    pub fn max_vertex_count(&self) -> usize {
        self.max_vertex_count
    }

    /// Largest triangle count of any part.
    #[inline]
    pub fn max_triangle_count(&self) -> usize {
        self.max_triangle_count
    }

    /// Check the partition against the mesh it was built for.
    ///
    /// The face ranges must tile the mesh's faces in order, every face must
    /// use only vertices in its part's range, and the recorded counts must
    /// match.
    pub fn validate(&self, mesh: &Mesh) -> Result<()> {
        let bad = |msg: String| Err(MeshError::InvalidPartition(msg));
        let face_count = mesh.face_count();

        let (Some(first), Some(last)) = (self.parts.first(), self.parts.last()) else {
            return bad("no parts".to_string());
        };
        if self.max_triangle_count < 1 || self.max_vertex_count < 3 {
            return bad(format!(
                "maxima of {} vertices and {} triangles are too small",
                self.max_vertex_count, self.max_triangle_count
            ));
        }
        if first.faces.start != 0 || last.faces.end != face_count {
            return bad(format!(
                "faces {:?} to {:?} do not cover {} faces",
                first.faces, last.faces, face_count
            ));
        }

        for (pi, part) in self.parts.iter().enumerate() {
            if part.triangle_count < 1 || part.vertex_count < 1 {
                return bad(format!("part {} is empty", pi));
            }
            if part.vertex_count != part.vertices.len() {
                return bad(format!(
                    "part {} counts {} vertices in range {:?}",
                    pi, part.vertex_count, part.vertices
                ));
            }
            if part.faces.start > part.faces.end || part.faces.end > face_count {
                return bad(format!("part {} has face range {:?}", pi, part.faces));
            }
            if part.vertices.end > mesh.vertex_count() {
                return bad(format!("part {} has vertex range {:?}", pi, part.vertices));
            }

            let mut triangles = 0;
            for (fi, face) in mesh.faces()[part.faces.clone()].iter().enumerate() {
                triangles += face.triangle_equivalents();
                if face.vi.iter().any(|&v| !part.vertices.contains(&(v as usize))) {
                    return bad(format!(
                        "face {} uses a vertex outside part {}",
                        part.faces.start + fi,
                        pi
                    ));
                }
            }
            if triangles != part.triangle_count {
                return bad(format!(
                    "part {} counts {} triangles, found {}",
                    pi, part.triangle_count, triangles
                ));
            }

            if pi > 0 {
                let prev = &self.parts[pi - 1];
                if part.faces.start != prev.faces.end {
                    return bad(format!("part {} does not follow part {}", pi, pi - 1));
                }
                if part.vertices.start > prev.vertices.end {
                    return bad(format!("part {} leaves a vertex gap", pi));
                }
            }
        }
        Ok(())
    }

    /// Check if the partition is consistent with `mesh`.
    pub fn is_valid(&self, mesh: &Mesh) -> bool {
        self.validate(mesh).is_ok()
    }
}

/// Partition a mesh, reordering its faces and vertices.
///
/// A cached partition is returned as is when its part maxima fit within the
/// requested limits. Otherwise a new one is built and cached on the mesh.
///
/// A mesh that fits within both limits becomes a single part and is not
/// reordered. Otherwise faces are sorted by a coarse grid cell of their
/// centroid (in texture space when the mesh has texture coordinates) and
/// parts are filled greedily; the limits must then be at least 4 vertices and
/// 2 triangles, so that any face fits in an empty part.
///
/// # Errors
///
/// Fails without touching the mesh when a limit is too small, the mesh has
/// no faces, a face references a missing vertex, or the result fails
/// [`Partition::validate`].
pub fn partition<'a>(mesh: &'a mut Mesh, options: &PartitionOptions) -> Result<&'a Partition> {
    let reusable = mesh.partition.as_ref().is_some_and(|p| {
        p.max_vertex_count <= options.max_vertices && p.max_triangle_count <= options.max_triangles
    });
    if !reusable {
        mesh.destroy_partition();
        let (work, built) = build(mesh, options)?;
        if let Some(work) = work {
            *mesh = work;
        }
        mesh.partition = Some(built);
    }
    mesh.partition
        .as_ref()
        .ok_or_else(|| MeshError::InvalidState("partition cache is empty".to_string()))
}

/// Build a partition. Returns the reordered mesh, or `None` when the mesh
/// is kept as is.
fn build(mesh: &Mesh, options: &PartitionOptions) -> Result<(Option<Mesh>, Partition)> {
    let max_vertices = options.max_vertices;
    let max_triangles = options.max_triangles;
    if max_vertices < 3 {
        return Err(MeshError::invalid_param(
            "max_vertices",
            max_vertices,
            "must be at least 3",
        ));
    }
    if max_triangles < 1 {
        return Err(MeshError::invalid_param(
            "max_triangles",
            max_triangles,
            "must be at least 1",
        ));
    }
    if mesh.face_count() == 0 {
        return Err(MeshError::EmptyMesh);
    }
    let vertex_count = mesh.vertex_count();
    for (fi, face) in mesh.faces().iter().enumerate() {
        if let Some(&v) = face.vi.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(MeshError::InvalidVertexIndex {
                face: fi,
                vertex: v as usize,
            });
        }
    }

    let triangle_count: usize = mesh.faces().iter().map(Face::triangle_equivalents).sum();
    if vertex_count <= max_vertices && triangle_count <= max_triangles {
        let whole = Partition {
            parts: vec![MeshPart {
                faces: 0..mesh.face_count(),
                vertices: 0..vertex_count,
                vertex_count,
                triangle_count,
            }],
            max_vertex_count: vertex_count,
            max_triangle_count: triangle_count,
        };
        check(&whole, mesh)?;
        log::debug!("partition: mesh fits in one part");
        return Ok((None, whole));
    }

    if max_vertices < 4 {
        return Err(MeshError::invalid_param(
            "max_vertices",
            max_vertices,
            "must be at least 4 to split a mesh",
        ));
    }
    if max_triangles < 2 {
        return Err(MeshError::invalid_param(
            "max_triangles",
            max_triangles,
            "must be at least 2 to split a mesh",
        ));
    }

    let mut work = Mesh {
        vertices: mesh.vertices.clone(),
        normals: mesh.normals.clone(),
        texcoords: mesh.texcoords.clone(),
        colors: mesh.colors.clone(),
        faces: mesh.faces.clone(),
        face_normals: mesh.face_normals.clone(),
        ..Mesh::default()
    };

    let keys = face_sort_keys(&work, options.parallel);
    let mut order: Vec<usize> = (0..work.face_count()).collect();
    order.sort_by_key(|&f| keys[f]);
    work.permute_faces(&order);

    let mut partition = Partition::default();
    let mut marks = vec![0u32; vertex_count];
    let mut face_start = 0;
    let mut mark = 3u32;
    while face_start < work.face_count() {
        let mut part = PartBuilder {
            mark,
            duplicates: HashMap::new(),
            vertex_count: 0,
        };
        let mut triangles = 0;
        let mut face_end = face_start;
        while face_end < work.face_count()
            && triangles + 2 <= max_triangles
            && part.vertex_count + 4 <= max_vertices
        {
            let mut face = work.faces[face_end];
            let is_triangle = face.is_triangle();
            triangles += face.triangle_equivalents();
            for j in 0..face.corner_count() {
                face.vi[j] = part.add(&mut work, &mut marks, face.vi[j]);
            }
            // a duplicated third corner must stay the fourth as well
            if is_triangle {
                face.vi[3] = face.vi[2];
            }
            work.faces[face_end] = face;
            face_end += 1;
        }

        log::trace!(
            "part {}: faces {}..{}, {} vertices, {} triangles, {} duplicated",
            partition.parts.len(),
            face_start,
            face_end,
            part.vertex_count,
            triangles,
            part.duplicates.len()
        );
        partition.max_vertex_count = partition.max_vertex_count.max(part.vertex_count);
        partition.max_triangle_count = partition.max_triangle_count.max(triangles);
        partition.parts.push(MeshPart {
            faces: face_start..face_end,
            vertices: 0..0,
            vertex_count: part.vertex_count,
            triangle_count: triangles,
        });
        face_start = face_end;
        mark += 2;
    }

    // Vertices sort by mark: unused first, then each part's run, with shared
    // borders between neighbors.
    let mut order: Vec<usize> = (0..marks.len()).collect();
    order.sort_by_key(|&v| marks[v]);
    let sorted: Vec<u32> = order.iter().map(|&v| marks[v]).collect();
    work.permute_vertices(&order);

    for (pi, part) in partition.parts.iter_mut().enumerate() {
        let shared_before = 2 * pi as u32 + 2;
        let shared_after = shared_before + 2;
        let start = sorted.partition_point(|&m| m < shared_before);
        let end = sorted.partition_point(|&m| m <= shared_after);
        part.vertices = start..end;
    }

    check(&partition, &work)?;
    log::debug!(
        "partition: {} parts, {} vertices ({} added), at most {} vertices and {} triangles per part",
        partition.parts.len(),
        work.vertex_count(),
        work.vertex_count() - vertex_count,
        partition.max_vertex_count,
        partition.max_triangle_count
    );
    Ok((Some(work), partition))
}

fn check(partition: &Partition, mesh: &Mesh) -> Result<()> {
    partition.validate(mesh).map_err(|err| {
        log::warn!("discarding partition: {}", err);
        err
    })
}

/// Vertex bookkeeping for the part being filled.
///
/// Marks are `0` for an unused vertex, `m` for a vertex owned by the part
/// with mark `m`, and `m - 1` for one shared by that part and the one before.
/// Parts are numbered 3, 5, 7 and so on.
struct PartBuilder {
    mark: u32,
    /// Copies made for this part, by original vertex.
    duplicates: HashMap<u32, u32>,
    vertex_count: usize,
}

impl PartBuilder {
    /// Claim vertex `v` for this part and return the index the face should
    /// use.
    fn add(&mut self, mesh: &mut Mesh, marks: &mut Vec<u32>, v: u32) -> u32 {
        let current = marks[v as usize];
        if current == self.mark || current + 1 == self.mark {
            return v;
        }
        if current == 0 {
            marks[v as usize] = self.mark;
            self.vertex_count += 1;
            return v;
        }
        if current + 2 == self.mark {
            marks[v as usize] = self.mark - 1;
            self.vertex_count += 1;
            return v;
        }
        if let Some(&dup) = self.duplicates.get(&v) {
            return dup;
        }
        let dup = duplicate_vertex(mesh, v as usize);
        marks.push(self.mark);
        self.duplicates.insert(v, dup);
        self.vertex_count += 1;
        dup
    }
}

/// Append a copy of a vertex with all of its attributes.
fn duplicate_vertex(mesh: &mut Mesh, v: usize) -> u32 {
    let n = mesh.vertices.len();
    mesh.vertices.push(mesh.vertices[v]);
    if mesh.normals.len() == n {
        mesh.normals.push(mesh.normals[v]);
    }
    if mesh.texcoords.len() == n {
        mesh.texcoords.push(mesh.texcoords[v]);
    }
    if mesh.colors.len() == n {
        mesh.colors.push(mesh.colors[v]);
    }
    n as u32
}

/// Grid cell of each face centroid, 100 cells per axis over the bounding
/// box of the positions or texture coordinates.
fn face_sort_keys(mesh: &Mesh, parallel: bool) -> Vec<[i32; 3]> {
    let uv: Vec<Point3<f64>>;
    let points: &[Point3<f64>] = if mesh.has_texture_coordinates() {
        uv = mesh
            .texcoords
            .iter()
            .map(|t| Point3::new(t.x, t.y, 0.0))
            .collect();
        &uv
    } else {
        &mesh.vertices
    };

    let Some(first) = points.first() else {
        return vec![[0; 3]; mesh.face_count()];
    };
    let (mut lo, mut hi) = (*first, *first);
    for p in points {
        for i in 0..3 {
            lo[i] = lo[i].min(p[i]);
            hi[i] = hi[i].max(p[i]);
        }
    }

    let key = |face: &Face| {
        let corners = face.corners();
        let sum = corners
            .iter()
            .fold(Point3::origin().coords, |acc, &v| acc + points[v as usize].coords);
        let center = sum / corners.len() as f64;
        [0, 1, 2].map(|i| grid_cell(center[i], lo[i], hi[i]))
    };
    if parallel {
        mesh.faces.par_iter().map(key).collect()
    } else {
        mesh.faces.iter().map(key).collect()
    }
}

fn grid_cell(x: f64, lo: f64, hi: f64) -> i32 {
    if hi > lo {
        ((x - lo) / (hi - lo) * 100.0).floor() as i32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_faces, build_from_quads, build_from_triangles, FaceId};
    use nalgebra::Point2;

    fn grid(n: usize) -> Mesh {
        let mut vertices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let mut quads = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let v = j * (n + 1) + i;
                quads.push([v, v + 1, v + n + 2, v + n + 1]);
            }
        }
        build_from_quads(&vertices, &quads).unwrap()
    }

    /// Corner positions of every face, bit-exact and sorted.
    fn face_geometry(mesh: &Mesh) -> Vec<Vec<[u64; 3]>> {
        let mut faces: Vec<Vec<[u64; 3]>> = (0..mesh.face_count())
            .map(|f| {
                mesh.face_positions(FaceId::new(f))
                    .iter()
                    .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
                    .collect()
            })
            .collect();
        faces.sort();
        faces
    }

    #[test]
    fn test_grid_is_split_within_limits() {
        let mut mesh = grid(8);
        let before = face_geometry(&mesh);
        let options = PartitionOptions::new(20, 16);
        let parts = partition(&mut mesh, &options).unwrap().clone();

        assert!(parts.part_count() >= 2);
        assert!(parts.max_vertex_count() <= 20);
        assert!(parts.max_triangle_count() <= 16);
        let mut next_face = 0;
        for part in parts.parts() {
            assert_eq!(part.faces.start, next_face);
            next_face = part.faces.end;
            assert!(part.vertex_count <= 20);
            assert!(part.triangle_count <= 16);
        }
        assert_eq!(next_face, mesh.face_count());

        assert!(parts.is_valid(&mesh));
        assert_eq!(mesh.face_count(), 64);
        assert!(mesh.vertex_count() >= 81);
        assert_eq!(face_geometry(&mesh), before);
        assert_eq!(mesh.partition(), Some(&parts));
    }

    #[test]
    fn test_small_mesh_is_one_part() {
        let mut mesh = grid(2);
        let faces = mesh.faces().to_vec();
        let parts = partition(&mut mesh, &PartitionOptions::default()).unwrap();
        assert_eq!(parts.part_count(), 1);
        assert_eq!(
            parts.part(0),
            &MeshPart {
                faces: 0..4,
                vertices: 0..9,
                vertex_count: 9,
                triangle_count: 8,
            }
        );
        assert_eq!(parts.max_vertex_count(), 9);
        assert_eq!(parts.max_triangle_count(), 8);
        assert_eq!(mesh.faces(), &faces[..]);
    }

    #[test]
    fn test_far_parts_duplicate_shared_vertex() {
        // every triangle of a fan uses the center; one triangle per part
        let mut vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        for i in 0..12 {
            let a = i as f64 * std::f64::consts::TAU / 12.0;
            vertices.push(Point3::new(a.cos(), a.sin(), 0.0));
        }
        let faces: Vec<[usize; 3]> = (0..12).map(|i| [0, 1 + i, 1 + (i + 1) % 12]).collect();
        let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
        mesh.set_vertex_colors(vec![[7, 7, 7, 255]; 13]).unwrap();
        let before = face_geometry(&mesh);

        let parts = partition(&mut mesh, &PartitionOptions::new(4, 2)).unwrap().clone();
        assert_eq!(parts.part_count(), 12);
        assert!(mesh.vertex_count() > 13);
        assert!(mesh.has_vertex_colors());
        assert!(parts.is_valid(&mesh));
        assert_eq!(face_geometry(&mesh), before);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_duplicated_third_corner_stays_a_triangle() {
        // a strip where the last triangle closes back onto the first vertex,
        // which by then belongs to a part two steps back
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ];
        let faces = vec![
            Face::triangle(0, 1, 2),
            Face::triangle(2, 1, 3),
            Face::triangle(3, 4, 0),
        ];
        let mut mesh = build_from_faces(&vertices, &faces).unwrap();
        let (work, parts) = build(&mesh, &PartitionOptions::new(4, 2).sequential()).unwrap();
        let work = work.unwrap();

        assert_eq!(parts.part_count(), 3);
        assert!(parts.parts().iter().all(|p| p.triangle_count == 1));
        assert!(work.faces().iter().all(Face::is_triangle));
        assert_eq!(work.vertex_count(), 6);
        assert!(parts.is_valid(&work));

        partition(&mut mesh, &PartitionOptions::new(4, 2)).unwrap();
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.quad_count(), 0);
    }

    #[test]
    fn test_texture_space_ordering() {
        let mut mesh = grid(6);
        let uv: Vec<Point2<f64>> = mesh
            .vertices()
            .iter()
            .map(|p| Point2::new(p.y, p.x))
            .collect();
        mesh.set_texture_coordinates(uv).unwrap();
        let parts = partition(&mut mesh, &PartitionOptions::new(16, 8))
            .unwrap()
            .clone();
        assert!(parts.part_count() > 1);
        assert!(parts.is_valid(&mesh));
        assert!(mesh.has_texture_coordinates());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = grid(7);
        let mut b = a.clone();
        let pa = partition(&mut a, &PartitionOptions::new(12, 10)).unwrap().clone();
        let pb = partition(&mut b, &PartitionOptions::new(12, 10).sequential())
            .unwrap()
            .clone();
        assert_eq!(pa, pb);
        assert_eq!(a.faces(), b.faces());
        assert_eq!(a.vertices(), b.vertices());
    }

    #[test]
    fn test_cached_partition_is_reused() {
        let mut mesh = grid(8);
        let first = partition(&mut mesh, &PartitionOptions::new(20, 16)).unwrap().clone();
        let faces = mesh.faces().to_vec();

        let again = partition(&mut mesh, &PartitionOptions::new(1000, 1000)).unwrap();
        assert_eq!(again, &first);
        assert_eq!(mesh.faces(), &faces[..]);

        let smaller = partition(&mut mesh, &PartitionOptions::new(10, 6)).unwrap().clone();
        assert!(smaller.part_count() > first.part_count());
        assert!(smaller.max_vertex_count() <= 10);
        assert!(smaller.is_valid(&mesh));
    }

    #[test]
    fn test_partition_drops_topology() {
        let mut mesh = grid(4);
        mesh.topology().unwrap();
        partition(&mut mesh, &PartitionOptions::new(8, 4)).unwrap();
        assert!(!mesh.has_topology());
        assert!(mesh.partition().is_some());

        mesh.add_vertex(Point3::new(9.0, 9.0, 9.0));
        assert!(mesh.partition().is_none());
    }

    #[test]
    fn test_bad_limits_are_rejected() {
        let mut mesh = grid(4);
        let faces = mesh.faces().to_vec();
        for (v, t) in [(2, 100), (100, 0), (3, 100), (100, 1)] {
            let err = partition(&mut mesh, &PartitionOptions::new(v, t)).unwrap_err();
            assert!(matches!(err, MeshError::InvalidParameter { .. }), "{:?}", err);
        }
        assert_eq!(mesh.faces(), &faces[..]);
        assert!(mesh.partition().is_none());
    }

    #[test]
    fn test_bad_mesh_is_rejected() {
        let mut empty = Mesh::new();
        assert_eq!(
            partition(&mut empty, &PartitionOptions::default()).unwrap_err(),
            MeshError::EmptyMesh
        );

        let mut mesh = grid(4);
        mesh.add_triangle(0, 1, 500);
        let faces = mesh.faces().to_vec();
        let err = partition(&mut mesh, &PartitionOptions::new(8, 4)).unwrap_err();
        assert_eq!(err, MeshError::InvalidVertexIndex { face: 16, vertex: 500 });
        assert_eq!(mesh.faces(), &faces[..]);
    }

    #[test]
    fn test_validate_catches_tampering() {
        let mut mesh = grid(4);
        let parts = partition(&mut mesh, &PartitionOptions::new(8, 4)).unwrap().clone();
        assert!(parts.is_valid(&mesh));

        let mut broken = parts.clone();
        broken.parts[0].triangle_count += 1;
        assert!(matches!(
            broken.validate(&mesh),
            Err(MeshError::InvalidPartition(_))
        ));

        let mut gap = parts.clone();
        gap.parts.remove(0);
        assert!(!gap.is_valid(&mesh));
        assert!(!Partition::default().is_valid(&mesh));
    }
}
