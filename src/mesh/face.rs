//! The indexed face record.

use super::index::VertexId;

/// A triangle or quad given by four vertex indices.
///
/// A face is a triangle when its third and fourth indices are equal; every
/// other face is a quad. Corners are listed in counter-clockwise order when
/// viewed from the side the face normal points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Face {
    /// Vertex indices. `vi[2] == vi[3]` marks a triangle.
    pub vi: [u32; 4],
}

impl Face {
    /// Create a triangle face.
    #[inline]
    pub const fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self { vi: [a, b, c, c] }
    }

    /// Create a quad face.
    ///
    /// Passing `d == c` yields a triangle.
    #[inline]
    pub const fn quad(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self { vi: [a, b, c, d] }
    }

    /// Returns true if the face is a triangle.
    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.vi[2] == self.vi[3]
    }

    /// Returns true if the face is a quad.
    #[inline]
    pub fn is_quad(&self) -> bool {
        self.vi[2] != self.vi[3]
    }

    /// Number of distinct corners: 3 for a triangle, 4 for a quad.
    #[inline]
    pub fn corner_count(&self) -> usize {
        if self.is_triangle() {
            3
        } else {
            4
        }
    }

    /// Triangle-equivalent size: a quad counts as 2.
    #[inline]
    pub fn triangle_equivalents(&self) -> usize {
        self.corner_count() - 2
    }

    /// The corner indices (3 or 4 of them).
    #[inline]
    pub fn corners(&self) -> &[u32] {
        &self.vi[..self.corner_count()]
    }

    /// The vertex at corner `j`.
    #[inline]
    pub fn vertex(&self, j: usize) -> VertexId {
        VertexId::from(self.vi[j])
    }

    /// Iterate the sides as `(start, end)` vertex pairs.
    ///
    /// Side `j` runs from corner `j` to corner `(j + 1) % n`.
    pub fn sides(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = self.corner_count();
        (0..n).map(move |j| (self.vi[j], self.vi[(j + 1) % n]))
    }

    /// Check the face against a vertex count.
    ///
    /// All indices must be in range, the first three pairwise distinct, and a
    /// quad's fourth index must differ from the first two.
    pub fn is_valid(&self, vertex_count: usize) -> bool {
        let [a, b, c, d] = self.vi;
        if self.vi.iter().any(|&v| v as usize >= vertex_count) {
            return false;
        }
        if a == b || b == c || c == a {
            return false;
        }
        c == d || (d != a && d != b)
    }

    /// Reverse the winding of the face.
    pub fn flip(&mut self) {
        if self.is_triangle() {
            self.vi = [self.vi[0], self.vi[2], self.vi[1], self.vi[1]];
        } else {
            self.vi.swap(1, 3);
        }
    }
}

impl From<[u32; 3]> for Face {
    fn from(v: [u32; 3]) -> Self {
        Face::triangle(v[0], v[1], v[2])
    }
}

impl From<[u32; 4]> for Face {
    fn from(vi: [u32; 4]) -> Self {
        Face { vi }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_and_quad() {
        let t = Face::triangle(0, 1, 2);
        assert!(t.is_triangle());
        assert_eq!(t.corners(), &[0, 1, 2]);
        assert_eq!(t.triangle_equivalents(), 1);

        let q = Face::quad(0, 1, 2, 3);
        assert!(q.is_quad());
        assert_eq!(q.corner_count(), 4);
        assert_eq!(q.triangle_equivalents(), 2);
    }

    #[test]
    fn test_sides_wrap_around() {
        let q = Face::quad(4, 5, 6, 7);
        let sides: Vec<_> = q.sides().collect();
        assert_eq!(sides, vec![(4, 5), (5, 6), (6, 7), (7, 4)]);

        let t = Face::triangle(4, 5, 6);
        let sides: Vec<_> = t.sides().collect();
        assert_eq!(sides, vec![(4, 5), (5, 6), (6, 4)]);
    }

    #[test]
    fn test_validity() {
        assert!(Face::triangle(0, 1, 2).is_valid(3));
        assert!(!Face::triangle(0, 1, 3).is_valid(3));
        assert!(!Face::triangle(0, 0, 2).is_valid(3));
        assert!(!Face::quad(0, 1, 2, 0).is_valid(4));
        assert!(!Face::quad(0, 1, 2, 1).is_valid(4));
        // a quad may only collapse into a triangle through its last two corners
        assert!(Face::quad(0, 1, 2, 2).is_valid(3));
    }

    #[test]
    fn test_flip() {
        let mut t = Face::triangle(0, 1, 2);
        t.flip();
        assert_eq!(t.vi, [0, 2, 1, 1]);
        assert!(t.is_triangle());

        let mut q = Face::quad(0, 1, 2, 3);
        q.flip();
        assert_eq!(q.vi, [0, 3, 2, 1]);
    }
}
