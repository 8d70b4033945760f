//! Core mesh data structures.
//!
//! This module provides the indexed mesh representation and related types
//! for storing triangle/quad meshes as flat, cache-friendly arrays.
//!
//! # Overview
//!
//! The primary type is [`Mesh`]: an array of vertex positions, optional
//! per-vertex attributes, and an array of [`Face`] records. A face always
//! holds four vertex indices; it is a triangle when the last two are equal.
//!
//! # Index Types
//!
//! Elements are identified by type-safe `u32` index wrappers:
//! - [`VertexId`] - Identifies a mesh vertex
//! - [`FaceId`] - Identifies a face
//! - [`TopVertexId`] - Identifies a topological vertex (unique position)
//! - [`EdgeId`] - Identifies a topological edge
//!
//! # Construction
//!
//! ```
//! use meshtopo::mesh::{build_from_triangles, Mesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
//! ```

mod builder;
mod face;
mod index;
mod indexed;
mod permute;

pub use builder::{
    build_from_faces, build_from_quads, build_from_triangles, to_face_vertex,
    to_face_vertex_quads,
};
pub use face::Face;
pub use index::{EdgeId, FaceId, TopVertexId, VertexId};
pub use indexed::{Color, Mesh};

pub(crate) use indexed::face_normal;
