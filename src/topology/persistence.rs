//! Persistent Homology Pipeline
//!
//! 1. Build the sparse boundary matrix of the filtration
//! 2. Reduce it column by column
//! 3. Read the barcode off the reduced matrix
//!
//! The reduced matrix is returned with the barcode so callers can print or
//! inspect the pairing.

use std::collections::BTreeSet;

use tracing::{debug, info_span};

use super::barcode::Barcode;
use super::boundary::BoundaryMatrix;
use super::reduction::{reduce, ReductionStats};
use super::simplex::Filtration;
use crate::config::PersistenceConfig;
use crate::error::{PersistenceError, Result};

/// Output of one persistence computation.
#[derive(Debug, Clone)]
pub struct Persistence {
    /// Column-reduced boundary matrix
    pub reduced: BoundaryMatrix,
    pub barcode: Barcode,
    pub stats: ReductionStats,
}

/// Compute the barcode of a filtration.
///
/// # Arguments
/// * `filtration` - Validated filtration, faces before cofaces
/// * `config` - Matrix construction strategy and post-checks
///
/// # Returns
/// * `Persistence` with the reduced matrix, the sorted barcode and
///   reduction counters
pub fn compute_persistence(
    filtration: &Filtration,
    config: &PersistenceConfig,
) -> Result<Persistence> {
    let span = info_span!("persistence", simplices = filtration.len());
    let _guard = span.enter();

    let mut matrix = BoundaryMatrix::build(filtration, config.construction);
    let original = config.validate_reduction.then(|| matrix.clone());
    let stats = reduce(&mut matrix);

    if let Some(original) = &original {
        check_closed(original, &matrix)?;
    }

    let barcode = Barcode::from_reduced(&matrix, filtration)?;
    debug!(
        bars = barcode.len(),
        essential = barcode.essential_count(),
        "extracted barcode"
    );

    Ok(Persistence {
        reduced: matrix,
        barcode,
        stats,
    })
}

/// Every reduced column is a sum of boundary columns, so applying the
/// original boundary to it must give zero.
fn check_closed(original: &BoundaryMatrix, reduced: &BoundaryMatrix) -> Result<()> {
    for j in 0..reduced.size() {
        let mut boundary = BTreeSet::new();
        for i in reduced.column(j) {
            for k in original.column(i) {
                if !boundary.insert(k) {
                    boundary.remove(&k);
                }
            }
        }
        if !boundary.is_empty() {
            return Err(PersistenceError::OpenBoundary { column: j });
        }
    }
    Ok(())
}

/// Convenience function using the default configuration
pub fn compute_barcode(filtration: &Filtration) -> Result<Barcode> {
    compute_persistence(filtration, &PersistenceConfig::default()).map(|p| p.barcode)
}
