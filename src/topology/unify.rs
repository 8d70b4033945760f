//! Exact-match vertex welding.
//!
//! Positions are compared bit for bit through [`f64::total_cmp`]: two
//! vertices share a canonical id exactly when their three coordinates have
//! identical bit patterns. No tolerance is applied; callers that want fuzzy
//! welding quantize positions first.

use std::cmp::Ordering;

use nalgebra::Point3;

use crate::mesh::TopVertexId;

/// Lexicographic total order on `(x, y, z)`.
#[inline]
pub(crate) fn compare_points(a: &Point3<f64>, b: &Point3<f64>) -> Ordering {
    a.x.total_cmp(&b.x)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.z.total_cmp(&b.z))
}

/// The result of unifying a position array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unification {
    /// Canonical id of each input position.
    pub map: Vec<TopVertexId>,

    /// Input indices sorted so that each canonical run is contiguous.
    order: Vec<u32>,

    /// Start of each run in `order`, plus a final end marker.
    offsets: Vec<usize>,
}

impl Unification {
    /// Number of distinct positions.
    #[inline]
    pub fn count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Input indices that share canonical id `id`, in ascending order.
    pub fn group(&self, id: TopVertexId) -> &[u32] {
        let i = id.index();
        &self.order[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Iterate the groups in canonical id order.
    pub fn groups(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.offsets.windows(2).map(move |w| &self.order[w[0]..w[1]])
    }
}

/// Assign dense canonical ids to exactly-equal positions.
///
/// Ids are handed out in sorted `(x, y, z)` order, so unifying the array of
/// one representative per id yields the identity mapping.
///
/// # Example
/// ```
/// use meshtopo::topology::unify_positions;
/// use nalgebra::Point3;
///
/// let points = [
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
/// ];
/// let u = unify_positions(&points);
/// assert_eq!(u.count(), 2);
/// assert_eq!(u.map[0], u.map[2]);
/// assert_ne!(u.map[0], u.map[1]);
/// ```
pub fn unify_positions(points: &[Point3<f64>]) -> Unification {
    let mut order: Vec<u32> = (0..points.len() as u32).collect();
    order.sort_unstable_by(|&a, &b| {
        compare_points(&points[a as usize], &points[b as usize]).then(a.cmp(&b))
    });

    let mut map = vec![TopVertexId::invalid(); points.len()];
    let mut offsets = Vec::new();
    for (i, &vi) in order.iter().enumerate() {
        let starts_run = i == 0
            || compare_points(&points[order[i - 1] as usize], &points[vi as usize])
                != Ordering::Equal;
        if starts_run {
            offsets.push(i);
        }
        map[vi as usize] = TopVertexId::new(offsets.len() - 1);
    }
    offsets.push(order.len());

    Unification { map, order, offsets }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let u = unify_positions(&[]);
        assert_eq!(u.count(), 0);
        assert!(u.map.is_empty());
        assert_eq!(u.groups().count(), 0);
    }

    #[test]
    fn test_groups_are_sorted_runs() {
        let points = [
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(-1.0, 5.0, 5.0),
        ];
        let u = unify_positions(&points);
        assert_eq!(u.count(), 3);
        assert_eq!(u.group(TopVertexId::new(0)), &[4]);
        assert_eq!(u.group(TopVertexId::new(1)), &[1, 3]);
        assert_eq!(u.group(TopVertexId::new(2)), &[0, 2]);
        assert_eq!(u.map[0], TopVertexId::new(2));
    }

    #[test]
    fn test_exact_equality_only() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1e-300, 0.0, 0.0),
            Point3::new(-0.0, 0.0, 0.0),
        ];
        let u = unify_positions(&points);
        // no tolerance, and signed zeros differ bitwise
        assert_eq!(u.count(), 3);
    }

    #[test]
    fn test_representatives_unify_to_identity() {
        let points = [
            Point3::new(3.0, 1.0, 2.0),
            Point3::new(0.5, 0.5, 0.5),
            Point3::new(3.0, 1.0, 2.0),
            Point3::new(0.5, 0.5, 9.0),
        ];
        let u = unify_positions(&points);
        let reps: Vec<_> = u.groups().map(|g| points[g[0] as usize]).collect();
        let again = unify_positions(&reps);
        let identity: Vec<_> = (0..reps.len()).map(TopVertexId::new).collect();
        assert_eq!(again.map, identity);
    }
}
