//! Manifold, orientation and boundary classification.
//!
//! This is the lightweight path: it sorts one record per face side and scans
//! runs of equal edges, without building a [`Topology`]. Use it when only
//! the three flags are needed.
//!
//! # Algorithm
//!
//! 1. Give every vertex an id: its own index, or with `topological` set, the
//!    canonical id of its position so that coincident vertices are one.
//! 2. Record `(lo, hi, reversed)` for each side of each face whose indices
//!    are all in range, skipping zero-length sides. A face that leaves fewer
//!    than three sides contributes nothing.
//! 3. Sort the records and scan runs of equal `(lo, hi)`:
//!    - a run of one is a boundary edge;
//!    - a run of two walked in the same direction breaks orientation;
//!    - a longer run is non-manifold and ends the scan.
//!
//! A mesh needs at least [`MIN_MANIFOLD_SIDES`] side records to be reported
//! manifold, which rules out lone triangles and quads.
//!
//! # Example
//!
//! ```
//! use meshtopo::algo::manifold::classify_manifold;
//! use meshtopo::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! let c = classify_manifold(&mesh, false);
//! assert!(!c.is_manifold);
//! assert!(c.has_boundary);
//! ```
//!
//! [`Topology`]: crate::topology::Topology

use crate::mesh::Mesh;
use crate::topology::unify_positions;

/// Fewest side records a mesh reported as manifold can have.
pub const MIN_MANIFOLD_SIDES: usize = 6;

/// Result of [`classify_manifold`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifoldClassification {
    /// No edge has more than two faces, and there are enough edges to form
    /// a surface.
    pub is_manifold: bool,

    /// Every edge with two faces is walked once in each direction.
    pub is_oriented: bool,

    /// Some edge has exactly one face.
    pub has_boundary: bool,
}

impl ManifoldClassification {
    /// Returns true for a manifold without boundary.
    pub fn is_closed(&self) -> bool {
        self.is_manifold && !self.has_boundary
    }
}

/// Classify a mesh from its face sides.
///
/// With `topological` false every mesh vertex is distinct, so a seam of
/// duplicated vertices reads as boundary. With `topological` true vertices
/// at the same position are welded first.
///
/// When a non-manifold edge stops the scan, the orientation and boundary
/// flags reflect the edges scanned so far.
pub fn classify_manifold(mesh: &Mesh, topological: bool) -> ManifoldClassification {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 || mesh.face_count() == 0 {
        return ManifoldClassification::default();
    }

    let ids: Vec<u32> = if topological {
        unify_positions(mesh.vertices())
            .map
            .iter()
            .map(|v| v.raw())
            .collect()
    } else {
        (0..vertex_count as u32).collect()
    };

    let mut sides: Vec<(u32, u32, bool)> = Vec::with_capacity(4 * mesh.face_count());
    for face in mesh.faces() {
        if face.vi.iter().any(|&v| v as usize >= vertex_count) {
            continue;
        }
        let start = sides.len();
        for j in 0..4 {
            let a = ids[face.vi[j] as usize];
            let b = ids[face.vi[(j + 1) % 4] as usize];
            if a != b {
                sides.push((a.min(b), a.max(b), a > b));
            }
        }
        if sides.len() < start + 3 {
            sides.truncate(start);
        }
    }
    if sides.is_empty() {
        return ManifoldClassification::default();
    }
    sides.sort_unstable();

    let mut result = ManifoldClassification {
        is_manifold: sides.len() >= MIN_MANIFOLD_SIDES,
        is_oriented: true,
        has_boundary: false,
    };
    let mut i = 0;
    while i < sides.len() {
        let (lo, hi, reversed) = sides[i];
        let run = sides[i..]
            .iter()
            .take_while(|s| s.0 == lo && s.1 == hi)
            .count();
        match run {
            1 => result.has_boundary = true,
            2 => {
                if sides[i + 1].2 == reversed {
                    result.is_oriented = false;
                }
            }
            _ => {
                result.is_manifold = false;
                break;
            }
        }
        i += run;
    }

    log::debug!(
        "classified {} side records: manifold={} oriented={} boundary={}",
        sides.len(),
        result.is_manifold,
        result.is_oriented,
        result.has_boundary
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_quads, build_from_triangles};
    use nalgebra::Point3;

    fn square(second: [usize; 3]) -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], second]).unwrap()
    }

    fn tetrahedron() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_single_triangle() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let c = classify_manifold(&mesh, false);
        assert!(!c.is_manifold);
        assert!(c.has_boundary);
        assert!(c.is_oriented);
    }

    #[test]
    fn test_closed_tetrahedron() {
        let c = classify_manifold(&tetrahedron(), false);
        assert_eq!(
            c,
            ManifoldClassification {
                is_manifold: true,
                is_oriented: true,
                has_boundary: false,
            }
        );
        assert!(c.is_closed());
    }

    #[test]
    fn test_open_square() {
        let c = classify_manifold(&square([0, 2, 3]), false);
        assert!(c.is_manifold);
        assert!(c.is_oriented);
        assert!(c.has_boundary);
    }

    #[test]
    fn test_orientation_conflict() {
        let c = classify_manifold(&square([0, 3, 2]), false);
        assert!(c.is_manifold);
        assert!(!c.is_oriented);
    }

    #[test]
    fn test_non_manifold_fin() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        assert!(!classify_manifold(&mesh, false).is_manifold);
    }

    #[test]
    fn test_topological_welds_seams() {
        // two quads side by side with their shared edge duplicated
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
        let mesh = build_from_quads(&vertices, &[[0, 1, 2, 3], [4, 5, 6, 7]]).unwrap();

        let split = classify_manifold(&mesh, false);
        let welded = classify_manifold(&mesh, true);
        assert!(split.is_manifold && welded.is_manifold);
        assert!(split.has_boundary && welded.has_boundary);

        // a fold along the seam only shows up once the seam is welded
        let mut folded = mesh.clone();
        folded.faces_mut()[1].vi = [4, 7, 6, 5];
        assert!(classify_manifold(&folded, false).is_oriented);
        assert!(!classify_manifold(&folded, true).is_oriented);
    }

    #[test]
    fn test_bad_faces_are_ignored() {
        let mut mesh = tetrahedron();
        mesh.add_triangle(0, 1, 99);
        mesh.add_triangle(2, 2, 3);
        let c = classify_manifold(&mesh, false);
        assert!(c.is_closed());
        assert!(c.is_oriented);
    }

    #[test]
    fn test_empty_mesh() {
        assert_eq!(
            classify_manifold(&Mesh::new(), true),
            ManifoldClassification::default()
        );
    }
}
