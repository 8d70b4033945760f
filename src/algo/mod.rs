//! Mesh processing algorithms.
//!
//! This module contains the operations that analyze or rewrite a [`Mesh`]
//! outside of its topology:
//!
//! - **Manifold analysis**: manifold, orientation and boundary tests from a
//!   sorted edge list, without building a full topology
//! - **Partitioning**: splitting a mesh into contiguous face/vertex ranges
//!   under vertex and triangle limits
//! - **Simplification**: triangle/quad conversion, degenerate face culling,
//!   unused vertex removal and identical vertex merging
//!
//! [`Mesh`]: crate::mesh::Mesh

pub mod manifold;
pub mod partition;
pub mod simplify;
