//! Typed scalar fields and the extraction cursor.
//!
//! The wire format is not self-describing: field order and widths are a
//! contract between sender and receiver. [`WireScalar`] covers the
//! scalar set the protocol carries: 1-, 2- and 4-byte integers and
//! `f32`.

use crate::byte_order::normalize;
use crate::error::{Result, StreamError};

mod sealed {
    pub trait Sealed {}
}

/// A fixed-width scalar that can be appended to or extracted from a
/// packet. Sealed: the wire contract is limited to the widths the
/// byte-order normalizer understands.
pub trait WireScalar: sealed::Sealed + Copy {
    /// Field width in bytes on the wire.
    const WIDTH: usize;

    #[doc(hidden)]
    fn write_native(self, dst: &mut [u8]);

    #[doc(hidden)]
    fn read_native(src: &[u8]) -> Self;
}

macro_rules! impl_wire_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl WireScalar for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn write_native(self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_ne_bytes());
                }

                fn read_native(src: &[u8]) -> Self {
                    let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                    bytes.copy_from_slice(src);
                    <$ty>::from_ne_bytes(bytes)
                }
            }
        )*
    };
}

impl_wire_scalar!(u8, i8, u16, i16, u32, i32, f32);

/// Write one scalar's wire bytes at the start of `dst`.
pub(crate) fn put_scalar<T: WireScalar>(value: T, dst: &mut [u8], swap: bool) {
    let dst = &mut dst[..T::WIDTH];
    value.write_native(dst);
    normalize(dst, swap);
}

/// Read one scalar from the start of `src`, normalizing in place.
pub(crate) fn get_scalar<T: WireScalar>(src: &mut [u8], swap: bool) -> T {
    let src = &mut src[..T::WIDTH];
    normalize(src, swap);
    T::read_native(src)
}

/// Sequential extraction cursor over one decoded, checksum-stripped
/// payload.
///
/// Handed to the packet sink on each delivery; fields must be extracted
/// in exactly the order and widths they were appended on the sending
/// side. The cursor only advances; a fresh reader is created for every
/// packet.
pub struct FieldReader<'a> {
    payload: &'a mut [u8],
    pos: usize,
    swap: bool,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(payload: &'a mut [u8], swap: bool) -> Self {
        Self {
            payload,
            pos: 0,
            swap,
        }
    }

    /// Extract the next field.
    pub fn extract_field<T: WireScalar>(&mut self) -> Result<T> {
        let remaining = self.payload.len() - self.pos;
        if T::WIDTH > remaining {
            return Err(StreamError::PayloadExhausted {
                needed: T::WIDTH,
                remaining,
            });
        }
        let value = get_scalar(&mut self.payload[self.pos..self.pos + T::WIDTH], self.swap);
        self.pos += T::WIDTH;
        Ok(value)
    }

    /// The not-yet-extracted tail of the payload.
    pub fn remaining(&self) -> &[u8] {
        &self.payload[self.pos..]
    }

    /// Total payload length (fields only; framing and checksum already
    /// stripped).
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// True for a zero-length payload.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_roundtrip_without_swap() {
        let mut buf = [0u8; 4];
        put_scalar(1000u16, &mut buf, false);
        assert_eq!(get_scalar::<u16>(&mut buf, false), 1000);

        put_scalar(-70000i32, &mut buf, false);
        assert_eq!(get_scalar::<i32>(&mut buf, false), -70000);

        put_scalar(0.15625f32, &mut buf, false);
        assert_eq!(get_scalar::<f32>(&mut buf, false), 0.15625);
    }

    #[test]
    fn scalar_roundtrip_with_forced_swap() {
        // Exercises the reversal paths a little-endian test host never
        // takes on its own; put/get reversal must cancel out.
        let mut buf = [0u8; 4];
        for x in [0u16, 1, 0x0102, 1000, u16::MAX] {
            put_scalar(x, &mut buf, true);
            assert_eq!(get_scalar::<u16>(&mut buf, true), x);
        }

        put_scalar(0x0A0B0C0Du32, &mut buf, true);
        assert_eq!(get_scalar::<u32>(&mut buf, true), 0x0A0B0C0D);
    }

    #[test]
    fn native_put_with_host_swap_yields_little_endian_wire() {
        let swap = crate::byte_order::host_is_big_endian();
        let mut buf = [0u8; 4];

        put_scalar(0x0102u16, &mut buf, swap);
        assert_eq!(&buf[..2], &0x0102u16.to_le_bytes()[..]);

        put_scalar(0x01020304u32, &mut buf, swap);
        assert_eq!(&buf[..], &0x01020304u32.to_le_bytes()[..]);
    }

    #[test]
    fn single_bytes_never_swap() {
        let mut buf = [0u8; 1];
        put_scalar(0xABu8, &mut buf, true);
        assert_eq!(buf[0], 0xAB);
        assert_eq!(get_scalar::<u8>(&mut buf, true), 0xAB);
    }

    #[test]
    fn reader_walks_fields_in_order() {
        // u8=5, i8=-3, u16=1000 laid out little-endian.
        let mut payload = [0x05, 0xFD, 0xE8, 0x03];
        let mut reader = FieldReader::new(&mut payload, false);

        assert_eq!(reader.len(), 4);
        assert_eq!(reader.extract_field::<u8>().unwrap(), 5);
        assert_eq!(reader.extract_field::<i8>().unwrap(), -3);
        assert_eq!(reader.remaining(), &[0xE8, 0x03]);
        assert_eq!(reader.extract_field::<u16>().unwrap(), 1000);
        assert!(reader.remaining().is_empty());
    }

    #[test]
    fn reader_rejects_overrun() {
        let mut payload = [0x01u8];
        let mut reader = FieldReader::new(&mut payload, false);

        let err = reader.extract_field::<u16>().unwrap_err();
        assert!(matches!(
            err,
            StreamError::PayloadExhausted {
                needed: 2,
                remaining: 1
            }
        ));

        // The failed extract must not advance the cursor.
        assert_eq!(reader.extract_field::<u8>().unwrap(), 0x01);
    }

    #[test]
    fn empty_reader_reports_empty() {
        let mut payload = [0u8; 0];
        let reader = FieldReader::new(&mut payload, false);
        assert!(reader.is_empty());
        assert_eq!(reader.len(), 0);
    }
}
