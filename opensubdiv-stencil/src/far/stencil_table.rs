//! Table of subdivision stencils.
//!
//! Stencils are the most direct method of evaluation of locations on the limit
//! of a surface. Every point of a limit surface can be computed by linearly
//! blending a collection of coarse control vertices.
//!
//! A stencil assigns a series of control vertex indices with a blending weight
//! that corresponds to a unique parametric location of the limit surface. When
//! the control vertices move in space, the limit location can be very
//! efficiently recomputed simply by applying the blending weights to the
//! series of coarse control vertices.
//!
//! A [`StencilTable`] stores many stencils as four parallel arrays:
//!
//! * `sizes[i]` – the number of terms of stencil `i`.
//! * `offsets[i]` – where the terms of stencil `i` start.
//! * `indices[]`/`weights[]` – the flattened terms.
use crate::{Error, Index, Result};

/// Gives read access to a single stencil in a [`StencilTable`].
#[derive(Clone, Copy, Debug)]
pub struct Stencil<'a> {
    indices: &'a [Index],
    weights: &'a [f32],
}

impl<'a> Stencil<'a> {
    /// Returns the indices of the control vertices.
    #[inline]
    pub fn indices(&self) -> &'a [Index] {
        self.indices
    }

    /// Returns the stencil interpolation weights.
    #[inline]
    pub fn weights(&self) -> &'a [f32] {
        self.weights
    }

    /// Returns the number of terms.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Borrowed view of the ragged stencil arrays, as consumed by the
/// evaluators in [`osd`](crate::osd).
///
/// A view can only be obtained from a validated table
/// ([`StencilTable::stencils()`] or one of the
/// [`LimitStencilTable`](crate::far::LimitStencilTable) weight sets), so an
/// evaluator can rely on the table invariants without checking them again.
#[derive(Clone, Copy, Debug)]
pub struct StencilArrays<'a> {
    pub(crate) sizes: &'a [u32],
    pub(crate) offsets: &'a [Index],
    pub(crate) indices: &'a [Index],
    pub(crate) weights: &'a [f32],
    pub(crate) control_vertex_count: usize,
}

impl<'a> StencilArrays<'a> {
    /// Returns the number of stencils.
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Returns the number of control vertices the stencils reference.
    #[inline]
    pub fn control_vertex_count(&self) -> usize {
        self.control_vertex_count
    }

    #[inline]
    pub fn sizes(&self) -> &'a [u32] {
        self.sizes
    }

    #[inline]
    pub fn offsets(&self) -> &'a [Index] {
        self.offsets
    }

    #[inline]
    pub fn indices(&self) -> &'a [Index] {
        self.indices
    }

    #[inline]
    pub fn weights(&self) -> &'a [f32] {
        self.weights
    }
}

/// Container for stencil data.
#[derive(Clone, Debug, PartialEq)]
pub struct StencilTable {
    sizes: Vec<u32>,
    offsets: Vec<Index>,
    indices: Vec<Index>,
    weights: Vec<f32>,
    control_vertex_count: usize,
}

impl StencilTable {
    /// Create a new stencil table from its four arrays.
    ///
    /// The `offsets` are taken as given. They are checked, not derived:
    ///
    /// * `sizes` and `offsets` must have the same length, as must `indices`
    ///   and `weights`.
    /// * The first stencil must start at term `0` and every following stencil
    ///   must start right where its predecessor ends.
    /// * All terms must lie within `indices`.
    ///
    /// Returns [`Error::InvalidStencilTable`] or
    /// [`Error::InvalidBufferSize`] if any of these does not hold.
    pub fn new(
        sizes: Vec<u32>,
        offsets: Vec<Index>,
        indices: Vec<Index>,
        weights: Vec<f32>,
    ) -> Result<Self> {
        if sizes.len() != offsets.len() {
            return Err(Error::InvalidStencilTable(format!(
                "{} sizes but {} offsets",
                sizes.len(),
                offsets.len()
            )));
        }

        if indices.len() != weights.len() {
            return Err(Error::InvalidStencilTable(format!(
                "{} indices but {} weights",
                indices.len(),
                weights.len()
            )));
        }

        let mut expected = 0usize;
        for (i, (&size, &offset)) in sizes.iter().zip(&offsets).enumerate() {
            let offset = usize::from(offset);
            if offset != expected {
                return Err(Error::InvalidStencilTable(format!(
                    "stencil {i} starts at term {offset}, expected {expected}"
                )));
            }
            expected = offset + size as usize;
        }

        if expected > indices.len() {
            return Err(Error::InvalidBufferSize {
                expected,
                actual: indices.len(),
            });
        }

        let control_vertex_count = indices
            .iter()
            .max()
            .map_or(0, |max| usize::from(*max) + 1);

        log::debug!(
            "stencil table: {} stencils, {} terms, {} control vertices",
            sizes.len(),
            expected,
            control_vertex_count
        );

        Ok(Self {
            sizes,
            offsets,
            indices,
            weights,
            control_vertex_count,
        })
    }

    /// Create a new stencil table, generating the offsets from `sizes`.
    ///
    /// Returns [`Error::InvalidStencilTable`] if a stencil would start past
    /// the last term an [`Index`] can address.
    pub fn from_sizes(sizes: Vec<u32>, indices: Vec<Index>, weights: Vec<f32>) -> Result<Self> {
        let mut offsets = Vec::with_capacity(sizes.len());
        let mut next = Some(0u32);

        for (i, &size) in sizes.iter().enumerate() {
            let start = next.ok_or_else(|| {
                Error::InvalidStencilTable(format!(
                    "stencil {i} starts past term {}",
                    u32::MAX
                ))
            })?;
            offsets.push(Index(start));
            next = start.checked_add(size);
        }

        Self::new(sizes, offsets, indices, weights)
    }

    /// Returns the number of stencils in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        0 == self.len()
    }

    /// Returns the number of control vertices indexed in the table.
    #[inline]
    pub fn control_vertex_count(&self) -> usize {
        self.control_vertex_count
    }

    /// Returns a Stencil at index i in the table.
    #[inline]
    pub fn stencil(&self, i: Index) -> Option<Stencil<'_>> {
        let i = usize::from(i);
        let size = *self.sizes.get(i)? as usize;
        let start = usize::from(self.offsets[i]);

        Some(Stencil {
            indices: &self.indices[start..start + size],
            weights: &self.weights[start..start + size],
        })
    }

    /// Returns an iterator over all stencils in the table.
    pub fn iter(&self) -> impl Iterator<Item = Stencil<'_>> + '_ {
        self.sizes
            .iter()
            .zip(&self.offsets)
            .map(move |(&size, &offset)| {
                let start = usize::from(offset);
                let end = start + size as usize;
                Stencil {
                    indices: &self.indices[start..end],
                    weights: &self.weights[start..end],
                }
            })
    }

    /// Returns the number of control vertices of each stencil in the table.
    #[inline]
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Returns the offset to a given stencil.
    #[inline]
    pub fn offsets(&self) -> &[Index] {
        &self.offsets
    }

    /// Returns the indices of the control vertices.
    #[inline]
    pub fn control_indices(&self) -> &[Index] {
        &self.indices
    }

    /// Returns the stencil interpolation weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Returns the view of the table the evaluators consume.
    #[inline]
    pub fn stencils(&self) -> StencilArrays<'_> {
        self.stencils_with_weights(&self.weights)
    }

    /// Same layout, different weights. Used for limit stencil derivatives;
    /// `weights` must have the length of [`weights()`](Self::weights).
    #[inline]
    pub(crate) fn stencils_with_weights<'a>(&'a self, weights: &'a [f32]) -> StencilArrays<'a> {
        debug_assert_eq!(weights.len(), self.weights.len());
        StencilArrays {
            sizes: &self.sizes,
            offsets: &self.offsets,
            indices: &self.indices,
            weights,
            control_vertex_count: self.control_vertex_count,
        }
    }
}
