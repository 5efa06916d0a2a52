//! Element width abstraction for the packed buffer.
//!
//! The whole index lives in one contiguous array of a caller-chosen numeric
//! element type. Coordinates and record references share that type, so
//! reference values must round-trip exactly through it: `f64` holds integers
//! up to 2^53, `f32` only up to 2^24. With the default `f64` element the
//! limit is far beyond any realistic item count; with `f32` it is the
//! caller's responsibility to stay below it.

use std::fmt::Debug;

use num_traits::Float;

/// Numeric element type of the packed buffer.
///
/// Implemented for `f64` (the default) and `f32`. The trait is open: any
/// float-like type that can represent the required reference range exactly
/// can be plugged in.
pub trait IndexElement: Float + Debug + 'static {
    /// Serialized width of one element in bytes.
    const BYTES: usize;

    /// Converts a record reference to the element type. Exact for all
    /// references the buffer can address.
    fn from_index(index: usize) -> Self;

    /// Converts a reference slot back to an index.
    fn to_index(self) -> usize;

    /// Lossless upcast used by the Hilbert grid mapping.
    fn as_f64(self) -> f64;

    /// Appends the little-endian encoding of this element.
    fn write_le(self, out: &mut Vec<u8>);

    /// Decodes one element from the first `Self::BYTES` bytes of `bytes`.
    fn read_le(bytes: &[u8]) -> Self;
}

impl IndexElement for f64 {
    const BYTES: usize = 8;

    #[inline]
    fn from_index(index: usize) -> Self {
        index as f64
    }

    #[inline]
    fn to_index(self) -> usize {
        self as usize
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes[..8]);
        f64::from_le_bytes(buf)
    }
}

impl IndexElement for f32 {
    const BYTES: usize = 4;

    #[inline]
    fn from_index(index: usize) -> Self {
        index as f32
    }

    #[inline]
    fn to_index(self) -> usize {
        self as usize
    }

    #[inline]
    fn as_f64(self) -> f64 {
        f64::from(self)
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&bytes[..4]);
        f32::from_le_bytes(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_f64() {
        for index in [0usize, 1, 16, 5465, 1 << 30] {
            assert_eq!(f64::from_index(index).to_index(), index);
        }
    }

    #[test]
    fn test_index_round_trip_f32() {
        for index in [0usize, 1, 16, 5465, (1 << 24) - 1] {
            assert_eq!(f32::from_index(index).to_index(), index);
        }
    }

    #[test]
    fn test_le_round_trip() {
        let mut out = Vec::new();
        (-12.5f64).write_le(&mut out);
        3.25f32.write_le(&mut out);
        assert_eq!(out.len(), 12);
        assert_eq!(f64::read_le(&out[..8]), -12.5);
        assert_eq!(f32::read_le(&out[8..]), 3.25);
    }
}
