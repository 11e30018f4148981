//! Error taxonomy for filtration validation and matrix access.
//!
//! The reduction itself has no recoverable failure surface: a malformed
//! filtration is rejected before any matrix is built, and internal invariant
//! violations inside the reduction are assertion failures.

use thiserror::Error;

/// Errors surfaced by the persistence pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    /// A simplex was declared with no vertices.
    #[error("simplex at index {index} has an empty vertex set")]
    EmptySimplex { index: usize },

    /// Declared dimension does not match the number of vertices.
    #[error("simplex at index {index} declares dimension {dim} but has {vertices} vertices")]
    DimensionMismatch {
        index: usize,
        dim: usize,
        vertices: usize,
    },

    /// Filtration value is NaN or infinite.
    #[error("simplex at index {index} has non-finite filtration value {value}")]
    NonFiniteValue { index: usize, value: f64 },

    /// The same vertex set occurs twice in the filtration.
    #[error(
        "simplex at index {index} repeats the vertex set {vertices:?} first seen at index {first}"
    )]
    DuplicateSimplex {
        index: usize,
        first: usize,
        vertices: Vec<usize>,
    },

    /// A codimension-1 face is absent from the filtration.
    #[error("face {face:?} of simplex at index {index} is missing from the filtration")]
    MissingFace { index: usize, face: Vec<usize> },

    /// A face is placed at or after its coface.
    #[error("face {face:?} at index {face_index} does not precede its coface at index {index}")]
    FaceAfterCoface {
        index: usize,
        face_index: usize,
        face: Vec<usize>,
    },

    /// Filtration values decrease along the sequence.
    #[error("simplex at index {index} has value {value} below the preceding value {previous}")]
    ValueOrder {
        index: usize,
        value: f64,
        previous: f64,
    },

    /// Column or row index outside the `n x n` matrix.
    #[error("index {index} is out of bounds for a matrix of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Column addition with the same source and destination.
    #[error("cannot add column {column} into itself")]
    AliasedColumns { column: usize },

    /// Matrix and filtration disagree on the number of simplices.
    #[error("matrix has size {matrix} but the filtration has {filtration} simplices")]
    SizeMismatch { matrix: usize, filtration: usize },

    /// Distance matrix that cannot hold pairwise distances.
    #[error("invalid distance matrix: {reason}")]
    InvalidDistanceMatrix { reason: String },

    /// A reduced column whose own boundary is nonzero, so it is not a sum
    /// of boundary columns.
    #[error("reduced column {column} has a nonzero boundary")]
    OpenBoundary { column: usize },

    /// Two columns of a supposedly reduced matrix share a pivot row.
    #[error("columns {first} and {second} share pivot row {row} after reduction")]
    ReductionInvariant {
        row: usize,
        first: usize,
        second: usize,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PersistenceError>;
