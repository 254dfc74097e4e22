//! # OpenSubdiv
//! `Osd` contains the code that applies [`far`](crate::far) structures to
//! vertex data. Here that is **refinement**: computing refined (or limit)
//! vertex positions, and any other primvar, from coarse control vertices by
//! stencil evaluation.
//!
//! * **Interleaved/Batched Buffer Configuration**
//!
//!   A [`BufferDescriptor`] describes where a primvar lives in a flat `f32`
//!   buffer, so evaluators read and write interleaved layouts in place.
//! * **Evaluators**
//!
//!   [`cpu_evaluator`] runs on the calling thread. `rayon_evaluator` (feature
//!   `rayon`) splits the output range into chunks of
//!   [`EvaluatorOptions::grain_size`] rows and evaluates them on `rayon`'s
//!   thread pool. Both produce bit-identical results.
//!
//! Evaluators don't own vertex buffers; clients provide their own buffers as
//! a source and destination. [`CpuVertexBuffer`] is a convenient owned buffer.
//!
//! Tightly packed 4- and 8-float primvars take a fixed-width fast path (see
//! [`KernelPath`]), everything else the generic one.
use std::num::NonZeroUsize;

pub mod buffer_descriptor;
pub use buffer_descriptor::*;

pub mod cpu_evaluator;

pub mod cpu_vertex_buffer;
pub use cpu_vertex_buffer::*;

pub mod kernel;
pub use kernel::{KernelPath, MAX_PRIMVAR_LENGTH};

#[cfg(feature = "rayon")]
pub mod rayon_evaluator;

/// Default for [`EvaluatorOptions::grain_size`].
pub const DEFAULT_GRAIN_SIZE: usize = 200;

/// Evaluator configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum number of output vertices evaluated by one parallel task.
    ///
    /// Smaller values balance load better, larger ones spend less time on
    /// task overhead. Default: [`DEFAULT_GRAIN_SIZE`].
    pub grain_size: NonZeroUsize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            grain_size: NonZeroUsize::new(DEFAULT_GRAIN_SIZE).expect("non-zero grain size"),
        }
    }
}

/// A destination buffer paired with its layout, e.g. for derivative outputs.
#[derive(Debug)]
pub struct PrimvarOutput<'a> {
    pub buffer: &'a mut CpuVertexBuffer,
    pub desc: BufferDescriptor,
}
