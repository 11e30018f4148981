//! Pipeline configuration.

use serde::Serialize;

/// Strategy used to build the boundary matrix from a filtration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Construction {
    /// Test every pair `i < j` for the face relation. O(n²) subset tests.
    PairScan,
    /// Enumerate the codimension-1 faces of each simplex and look them up
    /// by vertex set. Same result as `PairScan` on a valid filtration.
    #[default]
    FaceLookup,
}

/// Configuration for [`compute_persistence`](crate::compute_persistence).
#[derive(Debug, Clone, Serialize)]
pub struct PersistenceConfig {
    /// How the boundary matrix is built
    pub construction: Construction,
    /// Check after reduction that every reduced column still has zero
    /// boundary, against a copy of the unreduced matrix
    pub validate_reduction: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            construction: Construction::FaceLookup,
            validate_reduction: false,
        }
    }
}

impl PersistenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_construction(mut self, construction: Construction) -> Self {
        self.construction = construction;
        self
    }

    pub fn with_validation(mut self, validate_reduction: bool) -> Self {
        self.validate_reduction = validate_reduction;
        self
    }
}
