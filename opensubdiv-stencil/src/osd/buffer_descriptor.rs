use crate::osd::MAX_PRIMVAR_LENGTH;
use crate::{Error, Result};

/// Describes where a primvar lives inside a flat `f32` buffer.
///
/// Row `i` occupies the floats `[offset + i * stride, offset + i * stride +
/// length)`. A `stride` larger than `length` describes interleaved or padded
/// layouts; e.g. positions in the first three channels of a
/// position/normal buffer are `BufferDescriptor::new(0, 3, 6)`, the normals
/// `BufferDescriptor::new(3, 3, 6)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferDescriptor {
    offset: u32,
    length: u32,
    stride: u32,
}

impl BufferDescriptor {
    /// Create a descriptor.
    ///
    /// Returns [`Error::InvalidBufferDescriptor`] unless
    /// [`is_valid()`](Self::is_valid) holds and
    /// [`Error::PrimvarLengthExceeded`] if `length` is larger than
    /// [`MAX_PRIMVAR_LENGTH`].
    pub fn new(offset: u32, length: u32, stride: u32) -> Result<Self> {
        let desc = Self {
            offset,
            length,
            stride,
        };

        if !desc.is_valid() {
            return Err(Error::InvalidBufferDescriptor {
                offset: offset as _,
                length: length as _,
                stride: stride as _,
            });
        }

        if MAX_PRIMVAR_LENGTH < desc.length() {
            return Err(Error::PrimvarLengthExceeded {
                length: desc.length(),
                max: MAX_PRIMVAR_LENGTH,
            });
        }

        Ok(desc)
    }

    /// Floats from the start of the buffer to row `0`.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset as _
    }

    /// Floats per row that take part in evaluation.
    #[inline]
    pub fn length(&self) -> usize {
        self.length as _
    }

    /// Floats between the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride as _
    }

    /// Returns the relative offset within a stride.
    #[inline]
    pub fn local_offset(&self) -> u32 {
        if self.stride != 0 {
            self.offset % self.stride
        } else {
            0
        }
    }

    /// True if the descriptor values are internally consistent.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (self.length != 0) && (self.length <= self.stride - self.local_offset())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        0 == self.length
    }

    /// Number of floats a buffer needs to hold `rows` rows of this layout.
    #[inline]
    pub fn required_len(&self, rows: usize) -> usize {
        match rows {
            0 => 0,
            rows => self.offset() + (rows - 1) * self.stride() + self.length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_layout() {
        let desc = BufferDescriptor::new(7, 4, 6).unwrap();

        assert_eq!(desc.local_offset(), 1);
        assert_eq!(desc.required_len(0), 0);
        assert_eq!(desc.required_len(1), 11);
        assert_eq!(desc.required_len(3), 23);
    }

    #[test]
    fn rejects_length_past_stride() {
        assert!(matches!(
            BufferDescriptor::new(2, 4, 5),
            Err(Error::InvalidBufferDescriptor { .. })
        ));
        assert!(BufferDescriptor::new(0, 0, 4).is_err());
        assert!(BufferDescriptor::new(0, 3, 0).is_err());
    }

    #[test]
    fn rejects_length_past_scratch() {
        let length = MAX_PRIMVAR_LENGTH as u32 + 1;

        assert_eq!(
            BufferDescriptor::new(0, length, length),
            Err(Error::PrimvarLengthExceeded {
                length: length as _,
                max: MAX_PRIMVAR_LENGTH,
            })
        );
    }
}
