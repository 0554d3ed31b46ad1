//! Single-byte additive checksum.
//!
//! Intentionally weak: a wrapping 8-bit sum detects simple corruption
//! (single bit flips, dropped bytes) but not reordering or flips that
//! cancel; see `two_compensating_flips_go_undetected` below.

use bytes::{BufMut, BytesMut};

/// Wrapping 8-bit sum of `buf`.
pub fn calculate(buf: &[u8]) -> u8 {
    buf.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Append the checksum of the current contents as the final byte.
pub fn append(buf: &mut BytesMut) {
    let sum = calculate(buf);
    buf.put_u8(sum);
}

/// Check a checksum-carrying buffer: recompute over all but the last
/// byte and compare against the last byte. An empty buffer has nothing
/// to hold a checksum and is invalid.
pub fn validate(buf: &[u8]) -> bool {
    match buf.split_last() {
        Some((&sum, body)) => calculate(body) == sum,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_wraps_at_one_byte() {
        assert_eq!(calculate(&[0xFF, 0x02]), 0x01);
        assert_eq!(calculate(&[0x80, 0x80]), 0x00);
    }

    #[test]
    fn empty_buffer_sums_to_zero() {
        assert_eq!(calculate(&[]), 0);
    }

    #[test]
    fn validates_immediately_after_append() {
        for body in [&[][..], &[0x05][..], &[0x05, 0xFD, 0xE8, 0x03][..]] {
            let mut buf = BytesMut::from(body);
            append(&mut buf);
            assert_eq!(buf.len(), body.len() + 1);
            assert!(validate(&buf));
        }
    }

    #[test]
    fn rejects_empty_buffer() {
        assert!(!validate(&[]));
    }

    #[test]
    fn detects_single_bit_flips() {
        let mut buf = BytesMut::from(&[0x11, 0x22, 0x33, 0x44][..]);
        append(&mut buf);

        for byte in 0..buf.len() {
            for bit in 0..8 {
                let mut tampered = buf.to_vec();
                tampered[byte] ^= 1 << bit;
                assert!(!validate(&tampered), "flip byte {byte} bit {bit}");
            }
        }
    }

    #[test]
    fn two_compensating_flips_go_undetected() {
        // Known detection gap of an additive sum: +1 on one byte and -1
        // on another cancel out.
        let mut buf = BytesMut::from(&[0x10, 0x20, 0x30][..]);
        append(&mut buf);

        let mut tampered = buf.to_vec();
        tampered[0] = tampered[0].wrapping_add(1);
        tampered[1] = tampered[1].wrapping_sub(1);
        assert!(validate(&tampered));
    }

    #[test]
    fn byte_swap_goes_undetected() {
        // Addition commutes, so reordering is invisible to the sum.
        let mut buf = BytesMut::from(&[0xAB, 0xCD][..]);
        append(&mut buf);

        let tampered = [buf[1], buf[0], buf[2]];
        assert!(validate(&tampered));
    }
}
