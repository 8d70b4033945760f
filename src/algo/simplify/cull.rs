//! Degenerate face and unused vertex cleanup.

use std::cmp::Ordering;

use nalgebra::{Point3, Vector3};

use crate::mesh::{Face, Mesh};
use crate::topology::{compare_points, unify_positions};

/// Repair or remove faces that are degenerate once coincident vertices are
/// welded.
///
/// A face is degenerate when it is invalid on its own indices or on the
/// welded ones, for example a quad with two corners at the same position. A
/// repeated or out-of-range corner is dropped by shifting the later corners
/// down, which turns such a quad into a valid triangle. Faces that are still
/// invalid afterwards are removed along with their face normals.
///
/// Returns the number of degenerate faces found, repaired or removed.
pub fn cull_degenerate_faces(mesh: &mut Mesh) -> usize {
    if mesh.face_count() == 0 {
        return 0;
    }
    let vertex_count = mesh.vertex_count();
    let unified = unify_positions(&mesh.vertices);
    let top_count = unified.count();
    let top_of = |v: u32| unified.map.get(v as usize).map_or(u32::MAX, |t| t.raw());
    let missing = |t: u32| t as usize >= top_count;

    let mut keep = vec![true; mesh.face_count()];
    let mut degenerate = 0;
    for (fi, face) in mesh.faces.iter_mut().enumerate() {
        let mut top = Face { vi: face.vi.map(&top_of) };
        if top.is_valid(top_count) {
            continue;
        }
        degenerate += 1;

        let (f, t) = (&mut face.vi, &mut top.vi);
        if t[0] == t[1] || missing(t[0]) {
            drop_corner(f, t, 0);
        }
        if t[1] == t[2] || missing(t[1]) {
            drop_corner(f, t, 1);
        }
        if missing(t[2]) {
            f[2] = f[3];
            t[2] = t[3];
        }
        if missing(t[3]) {
            f[3] = f[2];
            t[3] = t[2];
        } else if t[0] == t[3] && t[2] != t[3] {
            drop_corner(f, t, 0);
        }

        if !face.is_valid(vertex_count) || !top.is_valid(top_count) {
            keep[fi] = false;
        }
    }

    if degenerate > 0 {
        let removed = mesh.retain_faces(&keep);
        mesh.invalidate();
        log::debug!(
            "culled degenerate faces: {} repaired, {} removed",
            degenerate - removed,
            removed
        );
    }
    degenerate
}

/// Shift corners `j + 1..=3` down by one in both index sets.
fn drop_corner(f: &mut [u32; 4], t: &mut [u32; 4], j: usize) {
    f.copy_within(j + 1.., j);
    t.copy_within(j + 1.., j);
}

/// Remove vertices that no face uses.
///
/// Degenerate faces are culled first. Per-vertex attributes are compacted
/// with the positions and faces are renumbered. When no vertex is used the
/// whole mesh is cleared. Returns the number of vertices removed.
pub fn cull_unused_vertices(mesh: &mut Mesh) -> usize {
    cull_degenerate_faces(mesh);

    let vertex_count = mesh.vertex_count();
    let mut used = vec![false; vertex_count];
    for face in mesh.faces() {
        for &v in &face.vi {
            if let Some(u) = used.get_mut(v as usize) {
                *u = true;
            }
        }
    }
    if !used.contains(&true) {
        if vertex_count > 0 || mesh.face_count() > 0 {
            log::debug!("no vertex is used, clearing the mesh");
        }
        mesh.clear();
        return vertex_count;
    }
    mesh.retain_vertices(&used)
}

/// Merge vertices whose positions and compared attributes are identical.
///
/// Positions always take part in the comparison, bit for bit. Normals take
/// part unless `ignore_normals` is set, in which case the normals of merged
/// vertices are averaged. Texture coordinates and colors take part unless
/// `ignore_texcoords` is set, in which case they are dropped from the mesh
/// when anything merges.
///
/// Returns the number of vertices merged away.
pub fn combine_identical_vertices(
    mesh: &mut Mesh,
    ignore_normals: bool,
    ignore_texcoords: bool,
) -> usize {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 {
        return 0;
    }
    let use_normals = !ignore_normals && mesh.has_vertex_normals();
    let use_texcoords = !ignore_texcoords && mesh.has_texture_coordinates();
    let use_colors = !ignore_texcoords && mesh.has_vertex_colors();

    let compare = |a: usize, b: usize| -> Ordering {
        let mut ord = compare_points(&mesh.vertices[a], &mesh.vertices[b]);
        if use_normals {
            ord = ord.then_with(|| {
                compare_points(
                    &Point3::from(mesh.normals[a]),
                    &Point3::from(mesh.normals[b]),
                )
            });
        }
        if use_texcoords {
            let (s, t) = (&mesh.texcoords[a], &mesh.texcoords[b]);
            ord = ord.then_with(|| s.x.total_cmp(&t.x).then_with(|| s.y.total_cmp(&t.y)));
        }
        if use_colors {
            ord = ord.then_with(|| mesh.colors[a].cmp(&mesh.colors[b]));
        }
        ord
    };

    let mut order: Vec<usize> = (0..vertex_count).collect();
    order.sort_by(|&a, &b| compare(a, b).then(a.cmp(&b)));
    let mut remap = vec![0u32; vertex_count];
    let mut kept: Vec<usize> = Vec::new();
    for (i, &v) in order.iter().enumerate() {
        if i == 0 || compare(order[i - 1], v) != Ordering::Equal {
            kept.push(v);
        }
        remap[v] = (kept.len() - 1) as u32;
    }
    let merged = vertex_count - kept.len();
    if merged == 0 {
        return 0;
    }

    let vertices = pick(&mesh.vertices, &kept);
    let normals = if !mesh.has_vertex_normals() {
        Vec::new()
    } else if ignore_normals {
        let mut sums = vec![Vector3::zeros(); kept.len()];
        for (v, n) in mesh.normals.iter().enumerate() {
            sums[remap[v] as usize] += n;
        }
        for n in &mut sums {
            if let Some(unit) = n.try_normalize(0.0) {
                *n = unit;
            }
        }
        sums
    } else {
        pick(&mesh.normals, &kept)
    };
    let (texcoords, colors) = if ignore_texcoords {
        (Vec::new(), Vec::new())
    } else {
        (
            if mesh.has_texture_coordinates() {
                pick(&mesh.texcoords, &kept)
            } else {
                Vec::new()
            },
            if mesh.has_vertex_colors() {
                pick(&mesh.colors, &kept)
            } else {
                Vec::new()
            },
        )
    };

    mesh.vertices = vertices;
    mesh.normals = normals;
    mesh.texcoords = texcoords;
    mesh.colors = colors;
    for face in &mut mesh.faces {
        for v in &mut face.vi {
            *v = remap.get(*v as usize).copied().unwrap_or(u32::MAX);
        }
    }
    mesh.invalidate();
    log::debug!(
        "combined identical vertices: {} became {}",
        vertex_count,
        mesh.vertex_count()
    );
    merged
}

fn pick<T: Copy>(values: &[T], kept: &[usize]) -> Vec<T> {
    kept.iter().map(|&v| values[v]).collect()
}

/// Cull degenerate faces and unused vertices, then release spare capacity.
///
/// Returns the number of vertices removed.
pub fn compact(mesh: &mut Mesh) -> usize {
    let removed = cull_unused_vertices(mesh);
    mesh.vertices.shrink_to_fit();
    mesh.normals.shrink_to_fit();
    mesh.texcoords.shrink_to_fit();
    mesh.colors.shrink_to_fit();
    mesh.faces.shrink_to_fit();
    mesh.face_normals.shrink_to_fit();
    removed
}
