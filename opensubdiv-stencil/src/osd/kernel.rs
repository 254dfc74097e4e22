//! The stencil kernel shared by all CPU evaluators.
//!
//! An evaluator binds its buffers and a range of stencils once
//! ([`KernelBinding::new()`]), picks a [`KernelPath`] from the descriptor
//! shapes and then hands contiguous sub-ranges of output rows to
//! [`eval_sub_range()`]. Every output row is written by exactly one
//! sub-range.
//!
//! Terms are summed in stencil order with plain `f32` arithmetic, on every
//! path, so the fixed-width paths produce bit-identical results to the
//! generic one and the result never depends on how a range was split.
use std::ops::Range;

use derive_more::Display;

use crate::far::StencilArrays;
use crate::osd::BufferDescriptor;
use crate::{Error, Index, Result};

/// Upper bound for [`BufferDescriptor::length()`]; the size of the generic
/// path's per-row scratch buffer.
pub const MAX_PRIMVAR_LENGTH: usize = 64;

/// Accumulation strategy, chosen once per call from the descriptor shapes.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum KernelPath {
    /// Any layout; rows of `src.length()` channels read with `src.stride()`.
    #[display("generic")]
    Generic,
    /// Tightly packed rows of 4 floats in both buffers.
    #[display("fixed4")]
    Fixed4,
    /// Tightly packed rows of 8 floats in both buffers.
    #[display("fixed8")]
    Fixed8,
}

impl KernelPath {
    /// Select the path for a source/destination layout pair.
    #[inline]
    pub fn select(src_desc: &BufferDescriptor, dst_desc: &BufferDescriptor) -> Self {
        match (
            src_desc.length(),
            src_desc.stride(),
            dst_desc.length(),
            dst_desc.stride(),
        ) {
            (4, 4, 4, 4) => KernelPath::Fixed4,
            (8, 8, 8, 8) => KernelPath::Fixed8,
            _ => KernelPath::Generic,
        }
    }

    /// Run `executor` with the row kernel for this path.
    #[inline]
    pub(crate) fn dispatch<E: Executor>(
        self,
        src_desc: &BufferDescriptor,
        dst_desc: &BufferDescriptor,
        executor: E,
    ) {
        match self {
            KernelPath::Generic => executor.execute(&GenericWidth {
                src_length: src_desc.length(),
                src_stride: src_desc.stride(),
                dst_length: dst_desc.length(),
            }),
            KernelPath::Fixed4 => executor.execute(&FixedWidth::<4>),
            KernelPath::Fixed8 => executor.execute(&FixedWidth::<8>),
        }
    }
}

/// Something that walks the rows of a [`KernelBinding`] with a row kernel,
/// serially or in parallel.
pub(crate) trait Executor {
    fn execute<K: RowKernel>(self, kernel: &K);
}

/// Computes one output row from its stencil terms.
pub(crate) trait RowKernel: Sync {
    /// Position of the first term of window-local stencil `local_begin`,
    /// relative to the window.
    #[inline]
    fn first_term(&self, window: &StencilWindow<'_>, local_begin: usize) -> usize {
        window.term_offset(local_begin)
    }

    /// `src` starts at row `0` of the source layout; `dst_row` starts at the
    /// output row's first channel.
    fn eval_row(&self, src: &[f32], indices: &[Index], weights: &[f32], dst_row: &mut [f32]);
}

/// Tightly packed rows of `N` floats.
pub(crate) struct FixedWidth<const N: usize>;

impl<const N: usize> RowKernel for FixedWidth<N> {
    #[inline(always)]
    fn eval_row(&self, src: &[f32], indices: &[Index], weights: &[f32], dst_row: &mut [f32]) {
        let mut result = [0.0_f32; N];

        for (&index, &weight) in indices.iter().zip(weights) {
            let start = usize::from(index) * N;
            for (r, s) in result.iter_mut().zip(&src[start..start + N]) {
                *r += *s * weight;
            }
        }

        dst_row[..N].copy_from_slice(&result);
    }
}

/// Arbitrary length and stride.
pub(crate) struct GenericWidth {
    src_length: usize,
    src_stride: usize,
    dst_length: usize,
}

impl RowKernel for GenericWidth {
    // A window that starts at stencil 0 of its range is already aligned; only
    // later sub-ranges move to their own first term.
    #[inline]
    fn first_term(&self, window: &StencilWindow<'_>, local_begin: usize) -> usize {
        if local_begin > 0 {
            window.term_offset(local_begin)
        } else {
            0
        }
    }

    #[inline]
    fn eval_row(&self, src: &[f32], indices: &[Index], weights: &[f32], dst_row: &mut [f32]) {
        let mut scratch = [0.0_f32; MAX_PRIMVAR_LENGTH];
        let result = &mut scratch[..self.src_length];

        for (&index, &weight) in indices.iter().zip(weights) {
            let start = usize::from(index) * self.src_stride;
            for (r, s) in result.iter_mut().zip(&src[start..start + self.src_length]) {
                *r += *s * weight;
            }
        }

        dst_row[..self.dst_length].copy_from_slice(&result[..self.dst_length]);
    }
}

/// The stencils of one evaluation range, re-based so that local stencil `0`
/// is the range's first stencil.
///
/// The term arrays are shifted by the first stencil's offset exactly once,
/// here. Term positions handed out by [`term_offset()`](Self::term_offset)
/// are relative to that shift.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StencilWindow<'a> {
    sizes: &'a [u32],
    offsets: &'a [Index],
    indices: &'a [Index],
    weights: &'a [f32],
    base: usize,
}

impl<'a> StencilWindow<'a> {
    /// `range` must be non-empty and within `stencils`.
    pub(crate) fn new(stencils: &StencilArrays<'a>, range: Range<usize>) -> Self {
        debug_assert!(range.start < range.end && range.end <= stencils.len());

        let base = if range.start > 0 {
            usize::from(stencils.offsets[range.start])
        } else {
            0
        };

        Self {
            sizes: &stencils.sizes[range.clone()],
            offsets: &stencils.offsets[range],
            indices: &stencils.indices[base..],
            weights: &stencils.weights[base..],
            base,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    fn term_offset(&self, local: usize) -> usize {
        usize::from(self.offsets[local]) - self.base
    }
}

/// Evaluate window-local stencils `rows` into `dst`.
///
/// `dst` starts at the first channel of output row `rows.start`; rows are
/// `dst_stride` floats apart. Terms are consumed in order from the first
/// stencil's term position on.
#[inline]
pub(crate) fn eval_sub_range<K: RowKernel>(
    kernel: &K,
    src: &[f32],
    window: &StencilWindow<'_>,
    rows: Range<usize>,
    dst: &mut [f32],
    dst_stride: usize,
) {
    let mut term = kernel.first_term(window, rows.start);

    for (i, dst_row) in rows.zip(dst.chunks_mut(dst_stride)) {
        let end = term + window.sizes[i] as usize;
        kernel.eval_row(
            src,
            &window.indices[term..end],
            &window.weights[term..end],
            dst_row,
        );
        term = end;
    }
}

/// Buffers and stencils of one evaluation call, checked and re-based.
pub(crate) struct KernelBinding<'a> {
    /// Source, starting at row `0`.
    pub(crate) src: &'a [f32],
    /// Destination, starting at the first output row of the range and ending
    /// after its last channel.
    pub(crate) dst: &'a mut [f32],
    pub(crate) window: StencilWindow<'a>,
    pub(crate) path: KernelPath,
}

impl<'a> KernelBinding<'a> {
    /// Check the O(1) call preconditions and bind the buffers.
    ///
    /// Returns `Ok(None)` for an empty range; nothing needs to be done then.
    pub(crate) fn new(
        src: &'a [f32],
        src_desc: &BufferDescriptor,
        dst: &'a mut [f32],
        dst_desc: &BufferDescriptor,
        stencils: &StencilArrays<'a>,
        range: Range<usize>,
    ) -> Result<Option<Self>> {
        if range.end > stencils.len() {
            return Err(Error::IndexOutOfBounds {
                index: range.end,
                max: stencils.len(),
            });
        }

        if range.start > range.end {
            return Err(Error::IndexOutOfBounds {
                index: range.start,
                max: range.end,
            });
        }

        if dst_desc.length() > src_desc.length() {
            return Err(Error::IncompatibleDescriptors {
                src_length: src_desc.length(),
                dst_length: dst_desc.length(),
            });
        }

        let src_len = src_desc.required_len(stencils.control_vertex_count());
        if src.len() < src_len {
            return Err(Error::InvalidBufferSize {
                expected: src_len,
                actual: src.len(),
            });
        }

        let dst_len = dst_desc.required_len(range.end);
        if dst.len() < dst_len {
            return Err(Error::InvalidBufferSize {
                expected: dst_len,
                actual: dst.len(),
            });
        }

        if range.is_empty() {
            return Ok(None);
        }

        let path = KernelPath::select(src_desc, dst_desc);
        let dst_start = dst_desc.offset() + range.start * dst_desc.stride();

        Ok(Some(Self {
            src: &src[src_desc.offset().min(src.len())..],
            dst: &mut dst[dst_start..dst_len],
            window: StencilWindow::new(stencils, range),
            path,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::far::StencilTable;

    fn desc(offset: u32, length: u32, stride: u32) -> BufferDescriptor {
        BufferDescriptor::new(offset, length, stride).unwrap()
    }

    #[test]
    fn path_selection() {
        assert_eq!(
            KernelPath::select(&desc(0, 4, 4), &desc(0, 4, 4)),
            KernelPath::Fixed4
        );
        assert_eq!(
            KernelPath::select(&desc(16, 8, 8), &desc(0, 8, 8)),
            KernelPath::Fixed8
        );
        // Padded source.
        assert_eq!(
            KernelPath::select(&desc(0, 4, 6), &desc(0, 4, 4)),
            KernelPath::Generic
        );
        // Narrower destination.
        assert_eq!(
            KernelPath::select(&desc(0, 4, 4), &desc(0, 3, 4)),
            KernelPath::Generic
        );
        assert_eq!(
            KernelPath::select(&desc(0, 3, 3), &desc(0, 3, 3)),
            KernelPath::Generic
        );
    }

    #[test]
    fn fixed_rows_match_generic_rows_bit_for_bit() {
        // Values with full mantissas, so rounding differences would show.
        let src: Vec<f32> = (0..8 * 32).map(|i| (i as f32 * 0.731).sin()).collect();
        let indices: Vec<Index> = (0..17).map(|i| Index((i * 7) % 32)).collect();
        let weights: Vec<f32> = (0..17).map(|i| (i as f32 * 1.37).cos() / 3.0).collect();

        let mut fixed = [0.0_f32; 4];
        let mut generic = [0.0_f32; 4];
        FixedWidth::<4>.eval_row(&src, &indices, &weights, &mut fixed);
        GenericWidth {
            src_length: 4,
            src_stride: 4,
            dst_length: 4,
        }
        .eval_row(&src, &indices, &weights, &mut generic);
        assert_eq!(fixed.map(f32::to_bits), generic.map(f32::to_bits));

        let mut fixed = [0.0_f32; 8];
        let mut generic = [0.0_f32; 8];
        FixedWidth::<8>.eval_row(&src, &indices, &weights, &mut fixed);
        GenericWidth {
            src_length: 8,
            src_stride: 8,
            dst_length: 8,
        }
        .eval_row(&src, &indices, &weights, &mut generic);
        assert_eq!(fixed.map(f32::to_bits), generic.map(f32::to_bits));
    }

    #[test]
    fn window_is_shifted_once() {
        // Offsets 0, 2, 5, 6, 9.
        let table = StencilTable::from_sizes(
            vec![2, 3, 1, 3, 2],
            (0..11u32).map(|i| Index(i % 4)).collect(),
            vec![1.0; 11],
        )
        .unwrap();
        let stencils = table.stencils();
        let generic = GenericWidth {
            src_length: 1,
            src_stride: 1,
            dst_length: 1,
        };

        let window = StencilWindow::new(&stencils, 0..5);
        assert_eq!(generic.first_term(&window, 0), 0);
        assert_eq!(generic.first_term(&window, 3), 6);
        assert_eq!(FixedWidth::<4>.first_term(&window, 3), 6);

        let window = StencilWindow::new(&stencils, 2..5);
        assert_eq!(window.indices.len(), 11 - 5);
        assert_eq!(generic.first_term(&window, 0), 0);
        assert_eq!(FixedWidth::<4>.first_term(&window, 0), 0);
        // Stencil 4 starts at term 9 of the table, term 4 of the window.
        assert_eq!(generic.first_term(&window, 2), 4);
        assert_eq!(FixedWidth::<8>.first_term(&window, 2), 4);
    }

    #[test]
    fn binding_rejects_short_buffers() {
        let table =
            StencilTable::from_sizes(vec![1, 1], vec![Index(0), Index(2)], vec![1.0; 2]).unwrap();
        let src = [0.0_f32; 8];
        let mut dst = [0.0_f32; 8];

        // Three control vertices of stride 3 need 9 floats.
        let result = KernelBinding::new(
            &src,
            &desc(0, 3, 3),
            &mut dst,
            &desc(0, 3, 3),
            &table.stencils(),
            0..2,
        );
        assert!(matches!(
            result,
            Err(Error::InvalidBufferSize {
                expected: 9,
                actual: 8
            })
        ));

        let result = KernelBinding::new(
            &src,
            &desc(0, 2, 2),
            &mut dst,
            &desc(0, 2, 2),
            &table.stencils(),
            1..3,
        );
        assert!(matches!(
            result,
            Err(Error::IndexOutOfBounds { index: 3, max: 2 })
        ));
    }

    #[test]
    fn binding_of_empty_range_is_a_no_op() {
        let table = StencilTable::from_sizes(vec![1], vec![Index(0)], vec![1.0]).unwrap();
        let src = [1.0_f32; 2];
        let mut dst = [0.0_f32; 2];

        let binding = KernelBinding::new(
            &src,
            &desc(0, 2, 2),
            &mut dst,
            &desc(0, 2, 2),
            &table.stencils(),
            1..1,
        )
        .unwrap();
        assert!(binding.is_none());
    }
}
