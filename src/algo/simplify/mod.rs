//! Face simplification and cleanup.
//!
//! These operations rewrite the mesh in place and drop its cached topology
//! and partition whenever they change anything.
//!
//! # Conversions
//!
//! - [`triangles_to_quads`]: merge pairs of nearly coplanar triangles whose
//!   shared edge is the long diagonal of a roughly square quad
//! - [`quads_to_triangles`]: split every quad along its shorter diagonal,
//!   or drop the collapsed corner of a degenerate quad
//!
//! # Cleanup
//!
//! - [`cull_degenerate_faces`]: repair faces whose corners coincide by
//!   dropping the repeated corner, removing the ones that cannot be repaired
//! - [`cull_unused_vertices`]: remove vertices no face uses
//! - [`combine_identical_vertices`]: merge vertices with identical positions
//!   and attributes
//! - [`compact`]: both culls in one call
//!
//! # Example
//!
//! ```
//! use meshtopo::algo::simplify::{quads_to_triangles, triangles_to_quads, QuadOptions};
//! use meshtopo::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//!
//! assert!(triangles_to_quads(&mut mesh, &QuadOptions::default()).unwrap());
//! assert_eq!(mesh.quad_count(), 1);
//!
//! assert!(quads_to_triangles(&mut mesh));
//! assert_eq!(mesh.triangle_count(), 2);
//! ```

mod cull;
mod quads;

pub use cull::{combine_identical_vertices, compact, cull_degenerate_faces, cull_unused_vertices};
pub use quads::{quads_to_triangles, triangles_to_quads};

/// Options for [`triangles_to_quads`].
#[derive(Debug, Clone)]
pub struct QuadOptions {
    /// Largest angle between the normals of two triangles that may be
    /// merged, in radians.
    pub angle_tolerance: f64,

    /// Smallest accepted ratio between the new quad's diagonals. The ratio
    /// must lie in `[min_diagonal_ratio, 1 / min_diagonal_ratio]`.
    pub min_diagonal_ratio: f64,
}

impl Default for QuadOptions {
    fn default() -> Self {
        Self {
            angle_tolerance: 2.5_f64.to_radians(),
            min_diagonal_ratio: 0.875,
        }
    }
}

impl QuadOptions {
    /// Create options with the given tolerances.
    pub fn new(angle_tolerance: f64, min_diagonal_ratio: f64) -> Self {
        Self {
            angle_tolerance,
            min_diagonal_ratio,
        }
    }

    /// Set the angle tolerance in radians.
    pub fn with_angle_tolerance(mut self, radians: f64) -> Self {
        self.angle_tolerance = radians;
        self
    }

    /// Set the angle tolerance in degrees.
    pub fn with_angle_degrees(mut self, degrees: f64) -> Self {
        self.angle_tolerance = degrees.to_radians();
        self
    }

    /// Set the smallest accepted diagonal ratio.
    pub fn with_min_diagonal_ratio(mut self, ratio: f64) -> Self {
        self.min_diagonal_ratio = ratio;
        self
    }
}
