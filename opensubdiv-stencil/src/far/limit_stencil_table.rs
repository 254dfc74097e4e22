//! Limit stencil table for evaluation at arbitrary parametric locations.
//!
//! A [`LimitStencilTable`] extends [`StencilTable`] with
//! derivative weights (du, dv, and optionally duu, duv, dvv) so that tangent
//! vectors and curvature can be evaluated efficiently on the limit surface.
//!
//! All weight sets share the base table's sizes, offsets and control indices,
//! so each one is evaluated by the same kernel.

use crate::far::{StencilArrays, StencilTable};
use crate::{Error, Index, Result};

/// Table of limit stencils with derivative weights.
#[derive(Clone, Debug, PartialEq)]
pub struct LimitStencilTable {
    base: StencilTable,
    du_weights: Vec<f32>,
    dv_weights: Vec<f32>,
    duu_weights: Vec<f32>,
    duv_weights: Vec<f32>,
    dvv_weights: Vec<f32>,
}

fn check_weights_len(weights: &[f32], expected: usize) -> Result<()> {
    if weights.len() == expected {
        Ok(())
    } else {
        Err(Error::InvalidBufferSize {
            expected,
            actual: weights.len(),
        })
    }
}

impl LimitStencilTable {
    /// Create a limit stencil table with 1st derivative weights.
    ///
    /// `du_weights` and `dv_weights` must have one weight per term of `base`.
    pub fn new(base: StencilTable, du_weights: Vec<f32>, dv_weights: Vec<f32>) -> Result<Self> {
        let terms_len = base.weights().len();
        check_weights_len(&du_weights, terms_len)?;
        check_weights_len(&dv_weights, terms_len)?;

        Ok(Self {
            base,
            du_weights,
            dv_weights,
            duu_weights: Vec::new(),
            duv_weights: Vec::new(),
            dvv_weights: Vec::new(),
        })
    }

    /// Add 2nd derivative weights (duu, duv, dvv).
    pub fn with_2nd_derivatives(
        mut self,
        duu_weights: Vec<f32>,
        duv_weights: Vec<f32>,
        dvv_weights: Vec<f32>,
    ) -> Result<Self> {
        let terms_len = self.base.weights().len();
        check_weights_len(&duu_weights, terms_len)?;
        check_weights_len(&duv_weights, terms_len)?;
        check_weights_len(&dvv_weights, terms_len)?;

        self.duu_weights = duu_weights;
        self.duv_weights = duv_weights;
        self.dvv_weights = dvv_weights;

        Ok(self)
    }

    /// Returns the underlying [`StencilTable`] (position weights).
    #[inline]
    pub fn as_stencil_table(&self) -> &StencilTable {
        &self.base
    }

    /// Returns the number of stencils in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Returns `true` if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Returns the number of control vertices indexed in the table.
    #[inline]
    pub fn control_vertex_count(&self) -> usize {
        self.base.control_vertex_count()
    }

    /// Returns the number of control vertices of each stencil in the table.
    #[inline]
    pub fn sizes(&self) -> &[u32] {
        self.base.sizes()
    }

    /// Returns the offset to a given stencil.
    #[inline]
    pub fn offsets(&self) -> &[Index] {
        self.base.offsets()
    }

    /// Returns the indices of the control vertices.
    #[inline]
    pub fn control_indices(&self) -> &[Index] {
        self.base.control_indices()
    }

    /// Returns the stencil interpolation weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        self.base.weights()
    }

    /// Returns the du derivative weights.
    #[inline]
    pub fn du_weights(&self) -> &[f32] {
        &self.du_weights
    }

    /// Returns the dv derivative weights.
    #[inline]
    pub fn dv_weights(&self) -> &[f32] {
        &self.dv_weights
    }

    /// Returns the duu derivative weights (empty unless 2nd derivatives were
    /// added).
    #[inline]
    pub fn duu_weights(&self) -> &[f32] {
        &self.duu_weights
    }

    /// Returns the duv derivative weights.
    #[inline]
    pub fn duv_weights(&self) -> &[f32] {
        &self.duv_weights
    }

    /// Returns the dvv derivative weights.
    #[inline]
    pub fn dvv_weights(&self) -> &[f32] {
        &self.dvv_weights
    }

    /// Whether 1st derivative weights (du, dv) are present.
    ///
    /// Always `true` unless the base table has no terms.
    #[inline]
    pub fn has_1st_derivatives(&self) -> bool {
        !self.du_weights.is_empty()
    }

    /// Whether 2nd derivative weights (duu, duv, dvv) are present.
    #[inline]
    pub fn has_2nd_derivatives(&self) -> bool {
        !self.duu_weights.is_empty()
    }

    /// Position stencils.
    #[inline]
    pub fn stencils(&self) -> StencilArrays<'_> {
        self.base.stencils()
    }

    #[inline]
    pub fn du_stencils(&self) -> StencilArrays<'_> {
        self.base.stencils_with_weights(&self.du_weights)
    }

    #[inline]
    pub fn dv_stencils(&self) -> StencilArrays<'_> {
        self.base.stencils_with_weights(&self.dv_weights)
    }

    /// Returns `None` unless 2nd derivatives were added.
    #[inline]
    pub fn duu_stencils(&self) -> Option<StencilArrays<'_>> {
        self.has_2nd_derivatives()
            .then(|| self.base.stencils_with_weights(&self.duu_weights))
    }

    #[inline]
    pub fn duv_stencils(&self) -> Option<StencilArrays<'_>> {
        self.has_2nd_derivatives()
            .then(|| self.base.stencils_with_weights(&self.duv_weights))
    }

    #[inline]
    pub fn dvv_stencils(&self) -> Option<StencilArrays<'_>> {
        self.has_2nd_derivatives()
            .then(|| self.base.stencils_with_weights(&self.dvv_weights))
    }
}
