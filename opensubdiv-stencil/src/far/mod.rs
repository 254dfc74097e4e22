//! # Feature Adaptive Representation
//!
//! `Far` holds the device independent data evaluators consume. Here that is
//! the stencil tables: ragged arrays of (control vertex, weight) terms, one
//! run of terms per refined vertex.
//!
//! Tables are immutable once built. All invariants the evaluators rely on
//! (matching array lengths, packed monotonic offsets, terms in bounds) are
//! checked when a table is constructed, never per element during evaluation.
pub mod limit_stencil_table;
pub use limit_stencil_table::*;

pub mod stencil_table;
pub use stencil_table::*;
