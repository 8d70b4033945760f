//! Mesh construction utilities.
//!
//! This module provides functions for building indexed meshes from the
//! face-vertex lists commonly produced by file readers and generators, and
//! for converting back.

use nalgebra::Point3;

use super::face::Face;
use super::indexed::Mesh;
use crate::error::{MeshError, Result};

/// Build a mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Returns
/// A mesh, or an error if a face is out of range or degenerate.
///
/// # Example
/// ```
/// use meshtopo::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<Mesh> {
    let faces: Vec<[usize; 4]> = faces.iter().map(|&[a, b, c]| [a, b, c, c]).collect();
    build(vertices, &faces)
}

/// Build a mesh from vertices and quad faces.
///
/// A quad whose last two indices are equal is stored as a triangle.
///
/// # Example
/// ```
/// use meshtopo::mesh::build_from_quads;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
/// assert_eq!(mesh.quad_count(), 1);
/// ```
pub fn build_from_quads(vertices: &[Point3<f64>], faces: &[[usize; 4]]) -> Result<Mesh> {
    build(vertices, faces)
}

/// Build a mesh from vertices and a mix of triangle and quad [`Face`]s.
pub fn build_from_faces(vertices: &[Point3<f64>], faces: &[Face]) -> Result<Mesh> {
    let faces: Vec<[usize; 4]> = faces.iter().map(|f| f.vi.map(|v| v as usize)).collect();
    build(vertices, &faces)
}

fn build(vertices: &[Point3<f64>], faces: &[[usize; 4]]) -> Result<Mesh> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    if vertices.len() >= u32::MAX as usize {
        return Err(MeshError::invalid_param(
            "vertices",
            vertices.len(),
            "too many vertices for 32-bit indices",
        ));
    }

    let mut mesh = Mesh::with_capacity(vertices.len(), faces.len());
    mesh.vertices.extend_from_slice(vertices);

    for (fi, vi) in faces.iter().enumerate() {
        // Validate vertex indices
        if let Some(&v) = vi.iter().find(|&&v| v >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: v });
        }
        let face = Face::from(vi.map(|v| v as u32));
        if !face.is_valid(vertices.len()) {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        mesh.faces.push(face);
    }

    Ok(mesh)
}

/// Convert a mesh to face-vertex triangles.
///
/// Quads are split along their `v0`-`v2` diagonal.
pub fn to_face_vertex(mesh: &Mesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut triangles = Vec::with_capacity(mesh.face_count() + mesh.quad_count());
    for face in mesh.faces() {
        let [a, b, c, d] = face.vi.map(|v| v as usize);
        triangles.push([a, b, c]);
        if face.is_quad() {
            triangles.push([a, c, d]);
        }
    }
    (mesh.vertices().to_vec(), triangles)
}

/// Convert a mesh to face-vertex quads (triangles repeat their last index).
pub fn to_face_vertex_quads(mesh: &Mesh) -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
    let faces = mesh.faces().iter().map(|f| f.vi.map(|v| v as usize)).collect();
    (mesh.vertices().to_vec(), faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_vertices() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_build_triangles() {
        let mesh = build_from_triangles(&square_vertices(), &[[0, 1, 2], [0, 2, 3]]).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_build_mixed() {
        let mut vertices = square_vertices();
        vertices.push(Point3::new(2.0, 0.5, 0.0));
        let faces = [Face::quad(0, 1, 2, 3), Face::triangle(1, 4, 2)];
        let mesh = build_from_faces(&vertices, &faces).unwrap();
        assert_eq!(mesh.quad_count(), 1);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_empty_faces() {
        let result = build_from_triangles(&square_vertices(), &[]);
        assert_eq!(result.unwrap_err(), MeshError::EmptyMesh);
    }

    #[test]
    fn test_invalid_index() {
        let result = build_from_triangles(&square_vertices(), &[[0, 1, 7]]);
        assert_eq!(
            result.unwrap_err(),
            MeshError::InvalidVertexIndex { face: 0, vertex: 7 }
        );
    }

    #[test]
    fn test_degenerate_face() {
        let result = build_from_quads(&square_vertices(), &[[0, 1, 2, 3], [0, 1, 2, 1]]);
        assert_eq!(result.unwrap_err(), MeshError::DegenerateFace { face: 1 });
    }

    #[test]
    fn test_to_face_vertex_splits_quads() {
        let mesh = build_from_quads(&square_vertices(), &[[0, 1, 2, 3]]).unwrap();
        let (vertices, triangles) = to_face_vertex(&mesh);
        assert_eq!(vertices.len(), 4);
        assert_eq!(triangles, vec![[0, 1, 2], [0, 2, 3]]);

        let (_, quads) = to_face_vertex_quads(&mesh);
        assert_eq!(quads, vec![[0, 1, 2, 3]]);
    }
}
