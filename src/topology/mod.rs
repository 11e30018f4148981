//! Topology Module: Filtrations, Boundary Matrices and Barcodes
//!
//! Implements the persistent homology pipeline over GF(2):
//! - Filtrations of simplicial complexes (validated, faces before cofaces)
//! - Vietoris-Rips filtrations from distance matrices or point clouds
//! - Sparse boundary matrix with row index and cached pivots
//! - Standard left-to-right column reduction
//! - Barcode extraction and summaries (Betti numbers, entropy)
//!
//! ## Mathematical Background
//!
//! A filtration orders the simplices of a complex so that every face comes
//! before its cofaces. The boundary matrix records which simplex is a face
//! of which. Reducing it pairs each simplex that creates a homology class
//! with the simplex that destroys it; unpaired creators are essential.

mod barcode;
mod boundary;
mod persistence;
mod reduction;
mod simplex;
mod vietoris_rips;

pub use barcode::{Bar, Barcode};
pub use boundary::BoundaryMatrix;
pub use persistence::{compute_barcode, compute_persistence, Persistence};
pub use reduction::{reduce, ReductionStats};
pub use simplex::{Filtration, Simplex};
pub use vietoris_rips::VietorisRips;
