#![doc(
    html_logo_url = "https://raw.githubusercontent.com/virtualritz/opensubdiv/master/osd-logo.png"
)]
//! # Stencil Evaluation
//!
//! This crate evaluates refined subdivision-surface vertices from a coarse
//! control cage using precomputed *stencils*, the way the `Osd` CPU
//! evaluators of [*Pixar’s
//! OpenSubdiv*](https://graphics.pixar.com/opensubdiv/) do.
//!
//! A stencil is a sparse linear combination: a list of (control vertex
//! index, weight) pairs. Every refined vertex is the weighted sum of the
//! control vertices its stencil lists. Once a [`far::StencilTable`] has been
//! built for a topology, deforming the cage only requires re-running the
//! stencils, which is what this crate does, in parallel and without copying
//! interleaved vertex buffers.
//!
//! ## Features
#![doc = document_features::document_features!()]
//!
//! ## Overview
//!
//! * [`far`] holds the host-side stencil data: [`far::StencilTable`] and
//!   [`far::LimitStencilTable`]. Both validate their ragged layout once, on
//!   construction.
//! * [`osd`] holds the evaluators. Buffers are plain `f32` slices (or
//!   [`osd::CpuVertexBuffer`]s) addressed through
//!   [`osd::BufferDescriptor`]s, so positions can live interleaved with
//!   other primvars.
//!
//! ```
//! use opensubdiv_stencil::{far, osd};
//!
//! // Three control vertices with two channels each.
//! let src = [1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0];
//!
//! // Refined vertex 0 is the midpoint of 0 and 1, refined vertex 1 copies 2.
//! let table = far::StencilTable::from_sizes(
//!     vec![2, 1],
//!     vec![0u32.into(), 1u32.into(), 2u32.into()],
//!     vec![0.5, 0.5, 1.0],
//! )?;
//!
//! let desc = osd::BufferDescriptor::new(0, 2, 2)?;
//! let mut dst = [0.0_f32; 4];
//!
//! osd::cpu_evaluator::eval_stencils(&src, desc, &mut dst, desc, table.stencils(), 0..2)?;
//! assert_eq!(dst, [2.0, 3.0, 5.0, 6.0]);
//! # Ok::<(), opensubdiv_stencil::Error>(())
//! ```
//!
//! ## API Conventions
//!
//! * Use canonical Rust naming – `numStencils()` becomes
//!   [`StencilTable::len()`](far::StencilTable::len).
//! * Use unsigned integer types, specifically `usize` and `u32`, for anything
//!   that can only contain positive values (indices, sizes, offsets, counts).
//! * Options use the [init struct
//!   pattern](https://xaeroxe.github.io/init-struct-pattern/).

pub mod error;
pub mod far;
pub mod osd;

pub use error::{Error, Result};

use bytemuck::{Pod, Zeroable};
use derive_more::{Display, From, Into};

/// A control vertex index or a position in a stencil table's term arrays.
///
/// # Examples
///
/// ```
/// use opensubdiv_stencil::Index;
///
/// // Create an index from a u32
/// let idx = Index::from(42u32);
/// assert_eq!(idx.0, 42);
///
/// // Convert back to u32
/// let value: u32 = idx.into();
/// assert_eq!(value, 42);
///
/// // Create from usize
/// let idx = Index::from(100usize);
/// let as_usize: usize = idx.into();
/// assert_eq!(as_usize, 100);
/// ```
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Pod,
    Zeroable,
)]
#[repr(transparent)]
pub struct Index(pub u32);

/// Truncates to the low 32 bits; `value` must be at most `u32::MAX`.
impl From<usize> for Index {
    #[inline]
    fn from(value: usize) -> Self {
        Index(value as u32)
    }
}

impl From<Index> for usize {
    #[inline]
    fn from(index: Index) -> Self {
        index.0 as usize
    }
}
