//! Single-threaded stencil evaluation.
//!
//! Evaluates the whole requested range as one sub-range on the calling
//! thread. Results are bit-identical to
//! `rayon_evaluator` for any grain size.
use std::ops::Range;

use super::kernel::{eval_sub_range, Executor, KernelBinding, RowKernel, StencilWindow};
use super::{BufferDescriptor, CpuVertexBuffer, PrimvarOutput};
use crate::far::{LimitStencilTable, StencilArrays, StencilTable};
use crate::Result;

struct SerialRows<'a> {
    src: &'a [f32],
    dst: &'a mut [f32],
    window: StencilWindow<'a>,
    dst_stride: usize,
}

impl Executor for SerialRows<'_> {
    fn execute<K: RowKernel>(self, kernel: &K) {
        let rows = 0..self.window.len();
        eval_sub_range(kernel, self.src, &self.window, rows, self.dst, self.dst_stride);
    }
}

/// Evaluate the stencils `range` of `stencils` from `src` into `dst`.
///
/// Output row `i` of `dst` (as laid out by `dst_desc`) receives the weighted
/// sum of the source rows stencil `i` references. Rows outside `range` and
/// floats outside each row's `dst_desc.length()` window are not touched.
///
/// Returns an error, without writing anything, if `range` is not within
/// `stencils`, a buffer is too short for the rows it must provide, or
/// `dst_desc` is wider than `src_desc`.
pub fn eval_stencils(
    src: &[f32],
    src_desc: BufferDescriptor,
    dst: &mut [f32],
    dst_desc: BufferDescriptor,
    stencils: StencilArrays<'_>,
    range: Range<usize>,
) -> Result<()> {
    let Some(binding) =
        KernelBinding::new(src, &src_desc, dst, &dst_desc, &stencils, range.clone())?
    else {
        return Ok(());
    };

    log::trace!("cpu: {} path, stencils {:?}", binding.path, range);

    binding.path.dispatch(
        &src_desc,
        &dst_desc,
        SerialRows {
            src: binding.src,
            dst: binding.dst,
            window: binding.window,
            dst_stride: dst_desc.stride(),
        },
    );

    Ok(())
}

/// Evaluate all stencils of `stencil_table`.
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
    )
}

/// Evaluate limit positions and, if requested, 1st derivatives.
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
            )?;
        }
    }

    Ok(())
}
