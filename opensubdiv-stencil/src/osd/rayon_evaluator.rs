//! Parallel stencil evaluation on `rayon`'s work-stealing thread pool.
//!
//! The output range is cut into sub-ranges of at most
//! [`EvaluatorOptions::grain_size`] rows. Each sub-range owns a disjoint
//! slice of the destination buffer, so tasks never synchronize. All writes
//! are complete when the call returns.
use std::ops::Range;

use rayon::prelude::*;

use super::kernel::{eval_sub_range, Executor, KernelBinding, RowKernel, StencilWindow};
use super::{BufferDescriptor, CpuVertexBuffer, EvaluatorOptions, PrimvarOutput};
use crate::far::{LimitStencilTable, StencilArrays, StencilTable};
use crate::Result;

struct ParallelRows<'a> {
    src: &'a [f32],
    dst: &'a mut [f32],
    window: StencilWindow<'a>,
    dst_stride: usize,
    grain_size: usize,
}

impl Executor for ParallelRows<'_> {
    fn execute<K: RowKernel>(self, kernel: &K) {
        let ParallelRows {
            src,
            dst,
            window,
            dst_stride,
            grain_size,
        } = self;
        let rows = window.len();
        // A chunk never needs more rows than the window has; keeps the
        // chunk arithmetic below within `dst.len()`.
        let grain_size = grain_size.min(rows);

        // Chunk `k` holds output rows `k * grain_size..`; the last one may be
        // shorter and ends after the last row's final channel.
        dst.par_chunks_mut(grain_size * dst_stride)
            .enumerate()
            .for_each(|(chunk, dst)| {
                let begin = chunk * grain_size;
                let end = rows.min(begin + grain_size);
                eval_sub_range(kernel, src, &window, begin..end, dst, dst_stride);
            });
    }
}

/// Evaluate the stencils `range` of `stencils` from `src` into `dst` in
/// parallel.
///
/// Same contract as
/// [`cpu_evaluator::eval_stencils()`](crate::osd::cpu_evaluator::eval_stencils);
/// `options` controls how the range is split across tasks.
pub fn eval_stencils(
    src: &[f32],
    src_desc: BufferDescriptor,
    dst: &mut [f32],
    dst_desc: BufferDescriptor,
    stencils: StencilArrays<'_>,
    range: Range<usize>,
    options: &EvaluatorOptions,
) -> Result<()> {
    let Some(binding) =
        KernelBinding::new(src, &src_desc, dst, &dst_desc, &stencils, range.clone())?
    else {
        return Ok(());
    };

    log::trace!(
        "rayon: {} path, stencils {:?}, grain size {}",
        binding.path,
        range,
        options.grain_size
    );

    binding.path.dispatch(
        &src_desc,
        &dst_desc,
        ParallelRows {
            src: binding.src,
            dst: binding.dst,
            window: binding.window,
            dst_stride: dst_desc.stride(),
            grain_size: options.grain_size.get(),
        },
    );

    Ok(())
}

/// Evaluate all stencils of `stencil_table` using `rayon` for CPU
/// parallelism.
///
/// This is a drop-in replacement for
/// [`super::cpu_evaluator::evaluate_stencils`] with default
/// [`EvaluatorOptions`]. It operates on the same [`CpuVertexBuffer`] type.
///
/// * `src_buffer` -- Input primvar buffer.
/// * `src_desc` -- Vertex buffer descriptor for the input buffer.
/// * `dst_buffer` -- Output primvar buffer.
/// * `dst_desc` -- Vertex buffer descriptor for the output buffer.
/// * `stencil_table` -- A [`StencilTable`].
pub fn evaluate_stencils(
    src_buffer: &CpuVertexBuffer,
    src_desc: BufferDescriptor,
    dst_buffer: &mut CpuVertexBuffer,
    dst_desc: BufferDescriptor,
    stencil_table: &StencilTable,
) -> Result<()> {
    eval_stencils(
        src_buffer.bind_cpu_buffer(),
        src_desc,
        dst_buffer.bind_cpu_buffer_mut(),
        dst_desc,
        stencil_table.stencils(),
        0..stencil_table.len(),
        &EvaluatorOptions::default(),
    )
}

/// Evaluate limit positions and, if requested, 1st derivatives. One parallel
/// dispatch per output.
pub fn evaluate_limit_stencils(
    src_buffer: &CpuVertexBuffer,
    src_desc: BufferDescriptor,
    dst: PrimvarOutput<'_>,
    du: Option<PrimvarOutput<'_>>,
    dv: Option<PrimvarOutput<'_>>,
    stencil_table: &LimitStencilTable,
) -> Result<()> {
    let src = src_buffer.bind_cpu_buffer();
    let range = 0..stencil_table.len();
    let options = EvaluatorOptions::default();

    for (output, stencils) in [
        (Some(dst), stencil_table.stencils()),
        (du, stencil_table.du_stencils()),
        (dv, stencil_table.dv_stencils()),
    ] {
        if let Some(output) = output {
            eval_stencils(
                src,
                src_desc,
                output.buffer.bind_cpu_buffer_mut(),
                output.desc,
                stencils,
                range.clone(),
                &options,
            )?;
        }
    }

    Ok(())
}
