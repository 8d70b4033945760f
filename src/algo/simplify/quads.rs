//! Triangle and quad conversion.

use nalgebra::Vector3;

use super::QuadOptions;
use crate::error::{MeshError, Result};
use crate::mesh::{face_normal, EdgeId, Face, Mesh};

/// Smallest angle and distance treated as nonzero (2^-32).
const ZERO_TOLERANCE: f64 = 2.328_306_436_538_696_3e-10;

/// Square root of the f64 epsilon.
const SQRT_EPSILON: f64 = 1.490_116_119_384_765_6e-8;

/// Merge pairs of triangles into quads.
///
/// Two triangles sharing an edge `e` become one quad when:
/// - `e` has exactly those two faces and they use the same mesh vertices
///   along it, walked in opposite directions;
/// - the angle between their normals is within the tolerance;
/// - `e` is strictly the longest side of both triangles;
/// - the other diagonal of the quad over `e` has a length ratio within
///   `[min_diagonal_ratio, 1 / min_diagonal_ratio]`.
///
/// The quad takes the place of the lower-indexed triangle and the other
/// triangle is removed. Face normals are computed from positions when the
/// mesh has none. Returns true if any pair was merged.
///
/// # Errors
///
/// Rejects a negative or non-finite angle and a ratio that is not positive
/// and finite. A mesh whose topology cannot be built is an error as well.
pub fn triangles_to_quads(mesh: &mut Mesh, options: &QuadOptions) -> Result<bool> {
    let angle = options.angle_tolerance;
    if !(angle >= 0.0 && angle.is_finite()) {
        return Err(MeshError::invalid_param(
            "angle_tolerance",
            angle,
            "must be finite and non-negative",
        ));
    }
    let ratio = options.min_diagonal_ratio;
    if !(ratio > 0.0 && ratio.is_finite()) {
        return Err(MeshError::invalid_param(
            "min_diagonal_ratio",
            ratio,
            "must be finite and positive",
        ));
    }
    if mesh.face_count() < 2 {
        return Ok(false);
    }

    let min_cos = angle.max(ZERO_TOLERANCE).cos().clamp(0.5, 1.0 - SQRT_EPSILON);
    let ratio = ratio.max(ZERO_TOLERANCE);
    let (mut min_ratio, mut max_ratio) = (ratio.min(1.0 / ratio), ratio.max(1.0 / ratio));
    let rel_tol = 8.0 * SQRT_EPSILON;
    min_ratio = min_ratio.min(1.0 - rel_tol);
    max_ratio = max_ratio.max(1.0 + rel_tol);

    let merges = {
        let top = mesh.topology()?;
        let faces = mesh.faces();
        let vertices = mesh.vertices();

        let computed: Vec<Vector3<f64>>;
        let normals: &[Vector3<f64>] = if mesh.has_face_normals() {
            mesh.face_normals()
        } else {
            computed = faces
                .iter()
                .map(|f| face_normal(vertices, f).unwrap_or_else(Vector3::zeros))
                .collect();
            &computed
        };

        let lengths: Vec<f64> = (0..top.edge_count())
            .map(|ei| {
                top.edge_segment(mesh, EdgeId::new(ei))
                    .map_or(f64::NAN, |(a, b)| (b - a).norm())
            })
            .collect();

        let mut merged = vec![false; faces.len()];
        let mut merges = Vec::new();
        for (ei, edge) in top.edges().iter().enumerate() {
            let length = lengths[ei];
            if !(length > 0.0 && length.is_finite()) {
                continue;
            }
            let [f0, f1] = match edge.faces[..] {
                [a, b] => [a.index(), b.index()],
                _ => continue,
            };
            let (a, b) = (&faces[f0], &faces[f1]);
            if a.is_quad() || b.is_quad() || merged[f0] || merged[f1] {
                continue;
            }
            if normals[f0].dot(&normals[f1]) < min_cos {
                continue;
            }
            let Some(quad) = merged_quad(a, b) else {
                continue;
            };

            // a tie with another side blocks the merge
            let longest = |f: usize| {
                top.faces()[f].edges[..3]
                    .iter()
                    .all(|&e| e.index() == ei || lengths[e.index()] < length)
            };
            if !longest(f0) || !longest(f1) {
                continue;
            }

            let diagonal = (vertices[quad[1] as usize] - vertices[quad[3] as usize]).norm();
            let d = diagonal / length;
            if !(d >= min_ratio && d <= max_ratio) {
                continue;
            }

            merged[f0] = true;
            merged[f1] = true;
            merges.push((f0.min(f1), f0.max(f1), quad));
        }
        merges
    };

    if merges.is_empty() {
        return Ok(false);
    }
    let mut keep = vec![true; mesh.face_count()];
    for &(lo, hi, quad) in &merges {
        mesh.faces[lo] = Face::quad(quad[0], quad[1], quad[2], quad[3]);
        keep[hi] = false;
    }
    mesh.retain_faces(&keep);
    mesh.invalidate();
    log::debug!("merged {} triangle pairs into quads", merges.len());
    Ok(true)
}

/// The quad covering triangles `a` and `b`, if they share an edge with
/// opposite winding and distinct third corners.
fn merged_quad(a: &Face, b: &Face) -> Option<[u32; 4]> {
    let (a, b) = (a.vi, b.vi);
    for i in 0..3 {
        for j in 0..3 {
            if a[i] == b[j] && a[(i + 1) % 3] == b[(j + 2) % 3] && a[(i + 2) % 3] != b[(j + 1) % 3] {
                return Some([a[i], b[(j + 1) % 3], a[(i + 1) % 3], a[(i + 2) % 3]]);
            }
        }
    }
    None
}

/// Split every valid quad into triangles.
///
/// A quad with one side much shorter than its shorter diagonal loses a
/// corner and becomes a single triangle. Otherwise it is split along the
/// shorter diagonal: the first half keeps the quad's slot and the second is
/// appended. Face normals, when present, are recomputed for both halves.
///
/// Returns true if the mesh has no quads left.
pub fn quads_to_triangles(mesh: &mut Mesh) -> bool {
    let vertex_count = mesh.vertex_count();
    let face_count = mesh.face_count();
    let track_normals = mesh.has_face_normals();
    let mut changed = false;

    for fi in 0..face_count {
        let face = mesh.faces[fi];
        if !face.is_quad() || !face.is_valid(vertex_count) {
            continue;
        }
        changed = true;

        let p = face.vi.map(|v| mesh.vertices[v as usize]);
        let d0 = (p[2] - p[0]).norm();
        let d1 = (p[3] - p[1]).norm();
        let mut shortest = (d0.min(d1) * 1e-6).min(ZERO_TOLERANCE);
        let mut collapsed = None;
        for k in 0..4 {
            let d = (p[(k + 1) % 4] - p[k]).norm();
            if d < shortest {
                collapsed = Some(k);
                shortest = d;
            }
        }

        let [v0, v1, v2, v3] = face.vi;
        let (first, second) = match collapsed {
            Some(0) => (Face::triangle(v1, v2, v3), None),
            Some(1) => (Face::triangle(v2, v3, v0), None),
            Some(2) => (Face::triangle(v3, v0, v1), None),
            Some(_) => (Face::triangle(v0, v1, v2), None),
            None if d0 <= d1 => (Face::triangle(v0, v1, v2), Some(Face::triangle(v0, v2, v3))),
            None => (Face::triangle(v0, v1, v3), Some(Face::triangle(v1, v2, v3))),
        };
        let normal = |f: &Face| face_normal(&mesh.vertices, f).unwrap_or_else(Vector3::zeros);
        let normals = (normal(&first), second.as_ref().map(normal));
        mesh.faces[fi] = first;
        if track_normals {
            mesh.face_normals[fi] = normals.0;
        }
        if let Some(second) = second {
            mesh.faces.push(second);
            if track_normals {
                mesh.face_normals.push(normals.1.unwrap_or_else(Vector3::zeros));
            }
        }
    }

    if changed {
        mesh.invalidate();
        log::debug!(
            "split quads: {} faces became {}",
            face_count,
            mesh.face_count()
        );
    }
    mesh.quad_count() == 0
}
