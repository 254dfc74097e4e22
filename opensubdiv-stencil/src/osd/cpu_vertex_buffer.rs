use bytemuck::Pod;

use crate::{Error, Result};

/// Concrete vertex buffer class for CPU subdivision.
///
/// A tightly packed buffer of `vertices_len` rows with `elements_len` floats
/// each. Pass it to [`cpu_evaluator::evaluate_stencils()`](crate::osd::cpu_evaluator::evaluate_stencils())
/// or, with the `rayon` feature, to `rayon_evaluator::evaluate_stencils()`.
#[derive(Clone, Debug, PartialEq)]
pub struct CpuVertexBuffer {
    data: Vec<f32>,
    elements_len: usize,
    vertices_len: usize,
}

impl CpuVertexBuffer {
    /// Create a zero-initialized buffer.
    #[inline]
    pub fn new(elements_len: usize, vertices_len: usize) -> CpuVertexBuffer {
        CpuVertexBuffer {
            data: vec![0.0; elements_len * vertices_len],
            elements_len,
            vertices_len,
        }
    }

    /// Create a buffer from a slice of plain-old-data vertices, e.g.
    /// `&[[f32; 3]]`.
    ///
    /// Every vertex must cast to a whole number of rows of `elements_len`
    /// floats.
    pub fn from_vertices<V: Pod>(elements_len: usize, vertices: &[V]) -> Result<CpuVertexBuffer> {
        // Fails for vertex types that are not made of whole, aligned floats.
        let data: &[f32] =
            bytemuck::try_cast_slice(vertices).map_err(|_| Error::InvalidBufferSize {
                expected: std::mem::size_of::<f32>(),
                actual: std::mem::size_of::<V>(),
            })?;

        if 0 == elements_len || 0 != data.len() % elements_len {
            return Err(Error::InvalidBufferSize {
                expected: elements_len,
                actual: data.len(),
            });
        }

        Ok(CpuVertexBuffer {
            data: data.to_vec(),
            elements_len,
            vertices_len: data.len() / elements_len,
        })
    }

    /// Returns how many elements defined in this vertex buffer.
    #[inline]
    pub fn elements_len(&self) -> usize {
        self.elements_len
    }

    /// Returns how many vertices allocated in this vertex buffer.
    #[inline]
    pub fn vertices_len(&self) -> usize {
        self.vertices_len
    }

    /// Get the contents of this vertex buffer as a slice of [`f32`].
    #[inline]
    pub fn bind_cpu_buffer(&self) -> &[f32] {
        &self.data
    }

    /// Get the contents of this vertex buffer as a mutable slice of [`f32`].
    #[inline]
    pub fn bind_cpu_buffer_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// This method is meant to be used in client code in order to provide
    /// coarse vertices data.
    ///
    /// Copies `vertices_len` rows from the start of `src` into this buffer,
    /// beginning at row `start_vertex`.
    pub fn update_data(
        &mut self,
        src: &[f32],
        start_vertex: usize,
        vertices_len: usize,
    ) -> Result<()> {
        let elements_len = self.elements_len;

        if start_vertex + vertices_len > self.vertices_len {
            return Err(Error::IndexOutOfBounds {
                index: start_vertex + vertices_len,
                max: self.vertices_len,
            });
        }

        let count = vertices_len * elements_len;
        if count > src.len() {
            return Err(Error::InvalidBufferSize {
                expected: count,
                actual: src.len(),
            });
        }

        let start = start_vertex * elements_len;
        self.data[start..start + count].copy_from_slice(&src[..count]);

        Ok(())
    }
}
