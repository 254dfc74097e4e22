//! Error types for the opensubdiv-stencil crate.

use thiserror::Error;

/// Main error type for opensubdiv-stencil operations.
///
/// Errors are only ever produced at API boundaries: when a table or a
/// descriptor is constructed, or by the O(1) shape checks an evaluator runs
/// once per call. The per-vertex kernel itself never fails.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Buffer descriptor values are not internally consistent.
    #[error("Invalid buffer descriptor (offset: {offset}, length: {length}, stride: {stride})")]
    InvalidBufferDescriptor {
        offset: usize,
        length: usize,
        stride: usize,
    },

    /// Primvar length exceeds the kernel's scratch storage.
    #[error("Primvar length {length} exceeds kernel capacity ({max})")]
    PrimvarLengthExceeded { length: usize, max: usize },

    /// Destination rows are wider than the source rows they are computed from.
    #[error("Destination length {dst_length} exceeds source length {src_length}")]
    IncompatibleDescriptors {
        src_length: usize,
        dst_length: usize,
    },

    /// Stencil table arrays are inconsistent.
    #[error("Invalid stencil table: {0}")]
    InvalidStencilTable(String),

    /// Index out of bounds.
    #[error("Index {index} out of bounds (max: {max})")]
    IndexOutOfBounds { index: usize, max: usize },

    /// Invalid buffer size.
    #[error("Invalid buffer size: expected {expected}, got {actual}")]
    InvalidBufferSize { expected: usize, actual: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
