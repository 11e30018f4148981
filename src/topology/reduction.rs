//! Column Reduction (Standard Persistence Algorithm)
//!
//! Processes columns left to right. While column `j` shares its low with an
//! earlier column, the earliest such column is added into it. Every addition
//! cancels the shared pivot entry, so `low(j)` strictly decreases or the
//! column becomes zero, and the loop for one column ends after at most `n`
//! additions.
//!
//! After reduction no two nonzero columns have the same low.
//!
//! ## Reference
//!
//! Edelsbrunner, Letscher, Zomorodian (2002). "Topological Persistence
//! and Simplification". Discrete & Computational Geometry.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, trace};

use super::boundary::BoundaryMatrix;

/// Counters collected during one reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReductionStats {
    /// Matrix size
    pub columns: usize,
    /// Column additions performed
    pub column_additions: usize,
    /// Columns that are zero after reduction
    pub zero_columns: usize,
    /// Nonzero columns after reduction, one per (birth, death) pair
    pub pivot_pairs: usize,
}

/// Row -> columns whose current low is that row.
#[derive(Debug, Clone)]
struct PivotOwners {
    owners: Vec<BTreeSet<usize>>,
}

impl PivotOwners {
    fn seed(matrix: &BoundaryMatrix) -> Self {
        let mut owners = vec![BTreeSet::new(); matrix.size()];
        for j in 0..matrix.size() {
            if let Some(row) = matrix.low(j) {
                owners[row].insert(j);
            }
        }
        Self { owners }
    }

    /// Smallest column below `limit` that owns `row`.
    fn earliest_before(&self, row: usize, limit: usize) -> Option<usize> {
        self.owners[row].range(..limit).next().copied()
    }

    fn reassign(&mut self, column: usize, from: usize, to: Option<usize>) {
        self.owners[from].remove(&column);
        if let Some(row) = to {
            self.owners[row].insert(column);
        }
    }
}

/// Reduce `matrix` in place so that every nonzero column has a distinct low.
///
/// Reducing an already reduced matrix performs no additions.
///
/// # Panics
/// On an internal invariant violation: the chosen column lacks the shared
/// pivot entry, an addition fails to lower the pivot, or one column needs
/// more than `n` additions.
pub fn reduce(matrix: &mut BoundaryMatrix) -> ReductionStats {
    let n = matrix.size();
    let mut owners = PivotOwners::seed(matrix);
    let mut stats = ReductionStats {
        columns: n,
        ..ReductionStats::default()
    };

    for j in 0..n {
        let mut steps = 0usize;

        while let Some(pivot) = matrix.low(j) {
            let Some(i) = owners.earliest_before(pivot, j) else {
                break;
            };
            assert!(
                matrix.low(i) == Some(pivot),
                "column {i} is registered for pivot row {pivot} but its low is {:?}",
                matrix.low(i)
            );

            matrix.xor_column(j, i);
            trace!(target: "tda_barcode::reduction", "{j} <- {j} + {i} ({i} < {j})");

            let new_low = matrix.low(j);
            assert!(
                new_low < Some(pivot),
                "adding column {i} into {j} did not lower pivot {pivot}"
            );
            owners.reassign(j, pivot, new_low);

            steps += 1;
            assert!(steps <= n, "column {j} exceeded {n} reduction steps");
        }

        stats.column_additions += steps;
        if matrix.low(j).is_some() {
            stats.pivot_pairs += 1;
        } else {
            stats.zero_columns += 1;
        }
    }

    debug!(
        columns = stats.columns,
        additions = stats.column_additions,
        pairs = stats.pivot_pairs,
        "reduced boundary matrix"
    );
    stats
}
