//! Map coordinates: [`Pos`] and [`Dims`].
//!
//! Maps are addressed by `(row, col)` with row 0 at the visual top, and
//! stored row-major.

use std::fmt;

// ---------------------------------------------------------------------------
// Pos
// ---------------------------------------------------------------------------

/// A cell coordinate. Ordering is row-major (row first, then column), which
/// is also the scan order of every grid traversal in this crate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Pos {
    #[inline]
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

// ---------------------------------------------------------------------------
// Dims
// ---------------------------------------------------------------------------

/// Grid dimensions (rows × cols).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl Dims {
    #[inline]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    #[inline]
    pub const fn len(self) -> usize {
        self.rows * self.cols
    }

    /// Total number of cells, or `None` if the product overflows `usize`.
    #[inline]
    pub const fn checked_len(self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Whether `p` addresses a cell of a grid with these dimensions.
    #[inline]
    pub const fn contains(self, p: Pos) -> bool {
        p.row < self.rows && p.col < self.cols
    }

    /// Row-major buffer index of `p`, or `None` when out of bounds.
    #[inline]
    pub const fn index(self, p: Pos) -> Option<usize> {
        if self.contains(p) {
            Some(p.row * self.cols + p.col)
        } else {
            None
        }
    }

    /// Row-major iterator over every coordinate.
    #[inline]
    pub fn iter(self) -> PosIter {
        PosIter { dims: self, next: 0 }
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl IntoIterator for Dims {
    type Item = Pos;
    type IntoIter = PosIter;
    #[inline]
    fn into_iter(self) -> PosIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// PosIter
// ---------------------------------------------------------------------------

/// Row-major iterator over the coordinates of a [`Dims`].
#[derive(Clone, Debug)]
pub struct PosIter {
    dims: Dims,
    next: usize,
}

impl Iterator for PosIter {
    type Item = Pos;

    #[inline]
    fn next(&mut self) -> Option<Pos> {
        if self.next >= self.dims.len() {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(Pos::new(i / self.dims.cols, i % self.dims.cols))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dims.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PosIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_orders_row_major() {
        assert!(Pos::new(0, 9) < Pos::new(1, 0));
        assert!(Pos::new(2, 3) < Pos::new(2, 4));
    }

    #[test]
    fn dims_index_and_contains() {
        let d = Dims::new(3, 4);
        assert_eq!(d.len(), 12);
        assert_eq!(d.index(Pos::new(2, 1)), Some(9));
        assert_eq!(d.index(Pos::new(3, 0)), None);
        assert!(!d.contains(Pos::new(0, 4)));
    }

    #[test]
    fn iter_is_row_major() {
        let pts: Vec<_> = Dims::new(2, 2).iter().collect();
        assert_eq!(
            pts,
            vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(1, 0), Pos::new(1, 1)]
        );
        assert_eq!(Dims::new(0, 5).iter().count(), 0);
    }
}
