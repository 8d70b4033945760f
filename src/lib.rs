//! # Meshtopo
//!
//! Topology, classification and partitioning for indexed triangle and quad
//! meshes.
//!
//! A [`Mesh`](mesh::Mesh) stores positions, optional per-vertex attributes and
//! faces of three or four corners. On top of it this crate derives:
//!
//! - **Topology**: coincident vertices welded into unique vertices, unique
//!   edges with their faces, and radially sorted vertex edge lists
//! - **Classification**: a fast manifold, orientation and boundary check that
//!   needs no topology
//! - **Partitioning**: consecutive face and vertex ranges that respect vertex
//!   and triangle limits, for renderers with small index buffers
//! - **Simplification**: merging triangle pairs into quads, splitting quads,
//!   culling degenerate faces and unused vertices
//!
//! ## Quick Start
//!
//! ```
//! use meshtopo::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let top = mesh.topology().unwrap();
//! assert_eq!(top.edge_count(), 6);
//! assert!(top.is_closed());
//!
//! let c = classify_manifold(&mesh, true);
//! assert!(c.is_closed() && c.is_oriented);
//!
//! let parts = partition(&mut mesh, &PartitionOptions::default()).unwrap();
//! assert_eq!(parts.part_count(), 1);
//! ```
//!
//! ## Caching
//!
//! The topology and the partition are cached on the mesh. Every mutating
//! method drops both, so a cached value always describes the current faces
//! and vertices.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;
pub mod topology;

/// Prelude module for convenient imports.
///
/// ```
/// use meshtopo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::manifold::{classify_manifold, ManifoldClassification};
    pub use crate::algo::partition::{partition, MeshPart, Partition, PartitionOptions};
    pub use crate::algo::simplify::{
        combine_identical_vertices, compact, cull_degenerate_faces, cull_unused_vertices,
        quads_to_triangles, triangles_to_quads, QuadOptions,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_faces, build_from_quads, build_from_triangles, EdgeId, Face, FaceId, Mesh,
        TopVertexId, VertexId,
    };
    pub use crate::topology::{TopEdge, TopFace, TopVertex, Topology};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
