//! Sparse Boundary Matrix over GF(2)
//!
//! The boundary operator of a filtration is an `n x n` matrix whose entry
//! `(i, j)` is 1 iff simplex `i` is a codimension-1 face of simplex `j`.
//! Only the nonzero entries are stored, once per column and once per row,
//! together with a cached pivot (`low`) for every column.
//!
//! Column addition is the single mutator. Over GF(2) it is the symmetric
//! difference of the two row sets, and it keeps the row index and the low
//! cache in step with the column it changes.

use ndarray::Array2;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use super::simplex::Filtration;
use crate::config::Construction;
use crate::error::{PersistenceError, Result};

/// Sparse `n x n` GF(2) matrix of face/coface incidences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryMatrix {
    size: usize,
    /// Column j -> row indices with a nonzero entry
    columns: Vec<BTreeSet<usize>>,
    /// Row i -> column indices with a nonzero entry
    rows: Vec<BTreeSet<usize>>,
    /// Cached largest row index per column
    lows: Vec<Option<usize>>,
}

impl BoundaryMatrix {
    /// All-zero matrix of the given size.
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            columns: vec![BTreeSet::new(); size],
            rows: vec![BTreeSet::new(); size],
            lows: vec![None; size],
        }
    }

    /// Matrix from explicit `(row, column)` entries.
    ///
    /// Repeated pairs cancel, as they would under GF(2) addition.
    pub fn from_entries(
        size: usize,
        entries: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self> {
        let mut matrix = Self::zeros(size);
        for (i, j) in entries {
            matrix.check_index(i)?;
            matrix.check_index(j)?;
            matrix.toggle(i, j);
        }
        for j in 0..size {
            matrix.refresh_low(j);
        }
        Ok(matrix)
    }

    /// Build the boundary matrix of a validated filtration.
    pub fn build(filtration: &Filtration, construction: Construction) -> Self {
        let matrix = match construction {
            Construction::PairScan => Self::build_pair_scan(filtration),
            Construction::FaceLookup => Self::build_face_lookup(filtration),
        };
        debug!(
            size = matrix.size,
            nnz = matrix.nnz(),
            ?construction,
            "built boundary matrix"
        );
        matrix
    }

    /// Test every pair `i < j` for the face relation.
    fn build_pair_scan(filtration: &Filtration) -> Self {
        let n = filtration.len();
        let mut matrix = Self::zeros(n);
        let simplices = filtration.simplices();

        for (i, face) in simplices.iter().enumerate() {
            for (j, coface) in simplices.iter().enumerate().skip(i + 1) {
                if face.is_face_of(coface) {
                    matrix.toggle(i, j);
                }
            }
        }
        for j in 0..n {
            matrix.refresh_low(j);
        }
        matrix
    }

    /// Look every codimension-1 face up by its vertex set.
    fn build_face_lookup(filtration: &Filtration) -> Self {
        let n = filtration.len();
        let mut matrix = Self::zeros(n);

        for (j, simplex) in filtration.iter().enumerate() {
            for face in simplex.faces() {
                // A validated filtration has every face at a smaller index
                if let Some(i) = filtration.position(&face) {
                    if i < j {
                        matrix.toggle(i, j);
                    }
                }
            }
            matrix.refresh_low(j);
        }
        matrix
    }

    /// Number of simplices (rows and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of nonzero entries.
    pub fn nnz(&self) -> usize {
        self.columns.iter().map(BTreeSet::len).sum()
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.columns
            .get(column)
            .is_some_and(|rows| rows.contains(&row))
    }

    /// Row indices of column `j`, ascending.
    ///
    /// # Panics
    /// If `j >= size`.
    pub fn column(&self, j: usize) -> impl Iterator<Item = usize> + '_ {
        self.columns[j].iter().copied()
    }

    /// Column indices of row `i`, ascending.
    ///
    /// # Panics
    /// If `i >= size`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows[i].iter().copied()
    }

    /// Largest row index with a nonzero entry in column `j`, `None` for a
    /// zero column.
    ///
    /// # Panics
    /// If `j >= size`.
    pub fn low(&self, j: usize) -> Option<usize> {
        self.lows[j]
    }

    pub fn is_zero_column(&self, j: usize) -> bool {
        self.columns[j].is_empty()
    }

    /// All nonzero entries as `(row, column)` pairs, column by column.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .flat_map(|(j, rows)| rows.iter().map(move |&i| (i, j)))
    }

    /// Add column `src` into column `dst` over GF(2).
    ///
    /// Afterwards `(i, dst)` is present iff exactly one of `(i, dst)` and
    /// `(i, src)` was present before. Column `src` is not modified.
    pub fn add_column(&mut self, dst: usize, src: usize) -> Result<()> {
        self.check_index(dst)?;
        self.check_index(src)?;
        if dst == src {
            return Err(PersistenceError::AliasedColumns { column: dst });
        }
        self.xor_column(dst, src);
        Ok(())
    }

    /// Unchecked column addition used by the reduction.
    pub(crate) fn xor_column(&mut self, dst: usize, src: usize) {
        debug_assert_ne!(dst, src);
        let (target, source) = if dst < src {
            let (left, right) = self.columns.split_at_mut(src);
            (&mut left[dst], &right[0])
        } else {
            let (left, right) = self.columns.split_at_mut(dst);
            (&mut right[0], &left[src])
        };

        for &row in source {
            if target.remove(&row) {
                self.rows[row].remove(&dst);
            } else {
                target.insert(row);
                self.rows[row].insert(dst);
            }
        }
        self.lows[dst] = target.iter().next_back().copied();
    }

    /// True iff no two nonzero columns share a low.
    pub fn has_unique_pivots(&self) -> bool {
        self.find_shared_pivot().is_none()
    }

    /// First `(row, earlier column, later column)` sharing a pivot.
    pub fn find_shared_pivot(&self) -> Option<(usize, usize, usize)> {
        let mut owner: Vec<Option<usize>> = vec![None; self.size];
        for (j, low) in self.lows.iter().enumerate() {
            if let Some(i) = *low {
                if let Some(first) = owner[i] {
                    return Some((i, first, j));
                }
                owner[i] = Some(j);
            }
        }
        None
    }

    /// Dense 0/1 view for diagnostics.
    pub fn to_dense(&self) -> Array2<u8> {
        let mut dense = Array2::<u8>::zeros((self.size, self.size));
        for (i, j) in self.entries() {
            dense[[i, j]] = 1;
        }
        dense
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.size {
            Ok(())
        } else {
            Err(PersistenceError::IndexOutOfBounds { index, size: self.size })
        }
    }

    /// Flip entry `(i, j)` without touching the low cache.
    fn toggle(&mut self, i: usize, j: usize) {
        if self.columns[j].remove(&i) {
            self.rows[i].remove(&j);
        } else {
            self.columns[j].insert(i);
            self.rows[i].insert(j);
        }
    }

    fn refresh_low(&mut self, j: usize) {
        self.lows[j] = self.columns[j].iter().next_back().copied();
    }
}

/// Dense grid, one row per line, entries separated by spaces.
impl fmt::Display for BoundaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.size {
            let line: Vec<&str> = (0..self.size)
                .map(|j| if self.contains(i, j) { "1" } else { "0" })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::simplex::Simplex;
    use ndarray::array;

    fn triangle_boundary() -> Filtration {
        Filtration::new(vec![
            Simplex::new(0, 0.0, [0]),
            Simplex::new(0, 0.0, [1]),
            Simplex::new(0, 0.0, [2]),
            Simplex::new(1, 1.0, [0, 1]),
            Simplex::new(1, 1.0, [1, 2]),
            Simplex::new(1, 1.0, [0, 2]),
        ])
        .unwrap()
    }

    #[test]
    fn test_triangle_entries() {
        let m = BoundaryMatrix::build(&triangle_boundary(), Construction::PairScan);
        let entries: Vec<_> = m.entries().collect();
        assert_eq!(entries, vec![(0, 3), (1, 3), (1, 4), (2, 4), (0, 5), (2, 5)]);
        assert_eq!(m.size(), 6);
        assert_eq!(m.nnz(), 6);
        assert_eq!(m.low(3), Some(1));
        assert_eq!(m.low(5), Some(2));
        assert_eq!(m.low(0), None);
        assert_eq!(m.row(1).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(m.column(5).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_constructions_agree() {
        let f = Filtration::sorted(vec![
            Simplex::from_vertices([0], 0.0),
            Simplex::from_vertices([1], 0.0),
            Simplex::from_vertices([2], 0.0),
            Simplex::from_vertices([3], 0.0),
            Simplex::from_vertices([0, 1], 1.0),
            Simplex::from_vertices([1, 2], 1.0),
            Simplex::from_vertices([0, 2], 1.5),
            Simplex::from_vertices([2, 3], 2.0),
            Simplex::from_vertices([0, 1, 2], 2.0),
        ])
        .unwrap();
        let scan = BoundaryMatrix::build(&f, Construction::PairScan);
        let lookup = BoundaryMatrix::build(&f, Construction::FaceLookup);
        assert_eq!(scan, lookup);
    }

    #[test]
    fn test_strictly_upper_triangular() {
        let m = BoundaryMatrix::build(&triangle_boundary(), Construction::FaceLookup);
        assert!(m.entries().all(|(i, j)| i < j));
    }

    #[test]
    fn test_add_column_is_symmetric_difference() {
        let mut m = BoundaryMatrix::build(&triangle_boundary(), Construction::FaceLookup);
        m.add_column(5, 3).unwrap();
        assert_eq!(m.column(5).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(m.column(3).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(m.row(0).collect::<Vec<_>>(), vec![3]);
        assert_eq!(m.row(1).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(m.low(5), Some(2));

        m.add_column(5, 4).unwrap();
        assert!(m.is_zero_column(5));
        assert_eq!(m.low(5), None);
    }

    #[test]
    fn test_add_column_twice_restores() {
        let original = BoundaryMatrix::build(&triangle_boundary(), Construction::FaceLookup);
        let mut m = original.clone();
        m.add_column(4, 5).unwrap();
        assert_ne!(m, original);
        m.add_column(4, 5).unwrap();
        assert_eq!(m, original);
    }

    #[test]
    fn test_add_column_rejects_bad_indices() {
        let mut m = BoundaryMatrix::zeros(3);
        assert_eq!(
            m.add_column(1, 1),
            Err(PersistenceError::AliasedColumns { column: 1 })
        );
        assert_eq!(
            m.add_column(0, 3),
            Err(PersistenceError::IndexOutOfBounds { index: 3, size: 3 })
        );
    }

    #[test]
    fn test_from_entries_cancels_pairs() {
        let m = BoundaryMatrix::from_entries(3, [(0, 2), (1, 2), (0, 2)]).unwrap();
        assert_eq!(m.column(2).collect::<Vec<_>>(), vec![1]);
        assert!(BoundaryMatrix::from_entries(2, [(0, 5)]).is_err());
    }

    #[test]
    fn test_shared_pivot_detection() {
        let m = BoundaryMatrix::build(&triangle_boundary(), Construction::FaceLookup);
        assert_eq!(m.find_shared_pivot(), Some((2, 4, 5)));
        assert!(!m.has_unique_pivots());
        assert!(BoundaryMatrix::zeros(4).has_unique_pivots());
    }

    #[test]
    fn test_dense_view_and_display() {
        let f = Filtration::new(vec![
            Simplex::new(0, 0.0, [0]),
            Simplex::new(0, 0.0, [1]),
            Simplex::new(1, 1.0, [0, 1]),
        ])
        .unwrap();
        let m = BoundaryMatrix::build(&f, Construction::FaceLookup);
        assert_eq!(m.to_dense(), array![[0u8, 0, 1], [0, 0, 1], [0, 0, 0]]);
        assert_eq!(m.to_string(), "0 0 1\n0 0 1\n0 0 0\n");
    }

    #[test]
    fn test_empty_matrix() {
        let m = BoundaryMatrix::build(&Filtration::empty(), Construction::PairScan);
        assert_eq!(m.size(), 0);
        assert_eq!(m.entries().count(), 0);
        assert_eq!(m.to_string(), "");
    }
}
