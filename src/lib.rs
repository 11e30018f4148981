//! # tda-barcode
//!
//! Persistent homology barcodes via sparse boundary matrix reduction over
//! GF(2).
//!
//! ## Pipeline
//!
//! ```text
//! Filtration ──► BoundaryMatrix ──► reduce (in place) ──► Barcode
//! ```
//!
//! 1. **Filtration**: simplices ordered by filtration value, every face
//!    before its cofaces. Validated on construction.
//!
//! 2. **Boundary matrix**: entry (i, j) is 1 iff simplex i is a
//!    codimension-1 face of simplex j. Stored sparsely, column and row wise.
//!
//! 3. **Reduction**: the standard algorithm adds earlier columns into later
//!    ones until no two columns share a pivot row.
//!
//! 4. **Barcode**: each pivot (i, j) is a bar [val(i), val(j)); each
//!    unpaired simplex is an essential bar [val(i), ∞).
//!
//! ## Example
//!
//! ```
//! use tda_barcode::{compute_barcode, Filtration, Simplex};
//!
//! let circle = Filtration::new(vec![
//!     Simplex::new(0, 0.0, [0]),
//!     Simplex::new(0, 0.0, [1]),
//!     Simplex::new(0, 0.0, [2]),
//!     Simplex::new(1, 1.0, [0, 1]),
//!     Simplex::new(1, 1.0, [1, 2]),
//!     Simplex::new(1, 1.0, [0, 2]),
//! ])?;
//!
//! let barcode = compute_barcode(&circle)?;
//! assert_eq!(barcode.betti_numbers(), vec![1, 1]);
//! # Ok::<(), tda_barcode::PersistenceError>(())
//! ```
//!
//! ## References
//!
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - Zomorodian & Carlsson, "Computing Persistent Homology" (2005)

pub mod config;
pub mod error;
pub mod topology;

pub use config::{Construction, PersistenceConfig};
pub use error::{PersistenceError, Result};

// Re-exports from topology
pub use topology::{
    // Input
    Filtration,
    Simplex,
    VietorisRips,
    // Matrix and reduction
    BoundaryMatrix,
    ReductionStats,
    reduce,
    // Output
    Bar,
    Barcode,
    Persistence,
    compute_barcode,
    compute_persistence,
};
