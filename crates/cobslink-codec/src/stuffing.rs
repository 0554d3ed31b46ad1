use bytes::{BufMut, BytesMut};

use crate::error::{CodecError, Result};

/// Frame delimiter. Appears exactly once per encoded frame, as the final byte.
pub const TERMINATOR: u8 = 0x00;

/// Structural overhead per frame: leading block-length byte + trailing terminator.
pub const OVERHEAD: usize = 2;

/// Maximum raw payload length (application fields + checksum byte).
///
/// Bounded so that a zero-free payload's single block (payload + its
/// length byte) stays representable in the one-byte block length.
pub const MAX_RAW_LEN: usize = 252;

/// Encode a raw payload into its byte-stuffed wire form.
///
/// Wire format:
/// ```text
/// ┌───────────────────┬──────────────────────┬──────────────────┐
/// │ Block length (1B) │ Stuffed payload      │ Terminator (1B)  │
/// │ distance to next  │ zeros replaced by    │ 0x00             │
/// │ zero, incl. self  │ block-length markers │                  │
/// └───────────────────┴──────────────────────┴──────────────────┘
/// ```
///
/// Every zero byte in `raw` is replaced by the distance to the *next*
/// zero (or the terminator), so the output contains no zero byte except
/// the final one. Output length is exactly `raw.len() + 2`.
pub fn encode(raw: &[u8], dst: &mut BytesMut) -> Result<()> {
    if raw.len() > MAX_RAW_LEN {
        return Err(CodecError::PayloadTooLarge {
            size: raw.len(),
            max: MAX_RAW_LEN,
        });
    }
    dst.reserve(raw.len() + OVERHEAD);

    // Open the first block with a placeholder length byte.
    let mut block_start = dst.len();
    dst.put_u8(0);

    for &byte in raw {
        if byte == TERMINATOR {
            // Close the current block: its leading byte becomes the
            // distance from block start to this zero. The zero itself
            // opens the next block.
            let here = dst.len();
            dst[block_start] = (here - block_start) as u8;
            block_start = here;
        }
        dst.put_u8(byte);
    }

    // Close the final block and delimit the frame.
    dst[block_start] = (dst.len() - block_start) as u8;
    dst.put_u8(TERMINATOR);

    Ok(())
}

/// Decode a byte-stuffed frame back into the raw payload.
///
/// `encoded` must be a complete frame including the leading block-length
/// byte and the trailing terminator; those two structural bytes are not
/// part of the output. Corrupted block structure never panics; the
/// caller is expected to checksum-validate the result.
pub fn decode(encoded: &[u8], dst: &mut BytesMut) -> Result<()> {
    if encoded.len() < OVERHEAD {
        return Err(CodecError::FrameTooShort {
            size: encoded.len(),
        });
    }
    let last = encoded.len() - 1;
    if encoded[last] != TERMINATOR {
        return Err(CodecError::MissingTerminator);
    }

    dst.reserve(encoded.len() - OVERHEAD);

    let mut remaining = encoded[0];
    for &byte in &encoded[1..last] {
        if remaining <= 1 {
            // End of block: this position held an original zero, and its
            // wire value is the next block's length.
            dst.put_u8(0);
            remaining = byte;
        } else {
            remaining -= 1;
            dst.put_u8(byte);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(raw: &[u8]) -> Vec<u8> {
        let mut enc = BytesMut::new();
        encode(raw, &mut enc).unwrap();
        assert_eq!(enc.len(), raw.len() + OVERHEAD);
        let mut dec = BytesMut::new();
        decode(&enc, &mut dec).unwrap();
        dec.to_vec()
    }

    #[test]
    fn encodes_known_vector() {
        let mut enc = BytesMut::new();
        encode(&[0x00, 0x01, 0x00], &mut enc).unwrap();
        assert_eq!(enc.as_ref(), &[0x01, 0x02, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn encodes_empty_payload() {
        let mut enc = BytesMut::new();
        encode(&[], &mut enc).unwrap();
        assert_eq!(enc.as_ref(), &[0x01, 0x00]);
    }

    #[test]
    fn roundtrips_empty_payload() {
        assert!(roundtrip(&[]).is_empty());
    }

    #[test]
    fn roundtrips_payload_without_zeros() {
        let raw = [0x05, 0xFD, 0xE8, 0x03];
        assert_eq!(roundtrip(&raw), raw);
    }

    #[test]
    fn roundtrips_payload_of_all_zeros() {
        let raw = [0u8; 16];
        assert_eq!(roundtrip(&raw), raw);
    }

    #[test]
    fn all_zeros_become_single_byte_blocks() {
        let mut enc = BytesMut::new();
        encode(&[0x00, 0x00], &mut enc).unwrap();
        assert_eq!(enc.as_ref(), &[0x01, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn roundtrips_every_length_up_to_max() {
        for len in 0..=MAX_RAW_LEN {
            let raw: Vec<u8> = (0..len).map(|i| (i % 7) as u8).collect();
            assert_eq!(roundtrip(&raw), raw, "length {len}");
        }
    }

    #[test]
    fn roundtrips_max_length_without_zeros() {
        let raw: Vec<u8> = (0..MAX_RAW_LEN).map(|i| (i % 255) as u8 + 1).collect();
        assert_eq!(roundtrip(&raw), raw);
    }

    #[test]
    fn output_has_no_interior_zero() {
        let raw: Vec<u8> = (0..=255u8).cycle().take(200).collect();
        let mut enc = BytesMut::new();
        encode(&raw, &mut enc).unwrap();
        let interior = &enc[..enc.len() - 1];
        assert!(interior.iter().all(|&b| b != TERMINATOR));
        assert_eq!(enc[enc.len() - 1], TERMINATOR);
    }

    #[test]
    fn length_law_holds() {
        for len in [0usize, 1, 7, 31, 252] {
            let raw = vec![0xAAu8; len];
            let mut enc = BytesMut::new();
            encode(&raw, &mut enc).unwrap();
            assert_eq!(enc.len(), len + OVERHEAD);
        }
    }

    #[test]
    fn rejects_oversized_payload() {
        let raw = vec![1u8; MAX_RAW_LEN + 1];
        let mut enc = BytesMut::new();
        let err = encode(&raw, &mut enc).unwrap_err();
        assert!(matches!(err, CodecError::PayloadTooLarge { size: 253, max: 252 }));
    }

    #[test]
    fn rejects_truncated_frame() {
        let mut dec = BytesMut::new();
        let err = decode(&[0x01], &mut dec).unwrap_err();
        assert!(matches!(err, CodecError::FrameTooShort { size: 1 }));
    }

    #[test]
    fn rejects_unterminated_frame() {
        let mut dec = BytesMut::new();
        let err = decode(&[0x02, 0x07, 0x09], &mut dec).unwrap_err();
        assert!(matches!(err, CodecError::MissingTerminator));
    }

    #[test]
    fn tolerates_corrupt_block_length() {
        // A zero block-length byte is never produced by encode; a wire
        // hit can still put one there. Decode must stay total and leave
        // rejection to the checksum.
        let mut dec = BytesMut::new();
        decode(&[0x00, 0x41, 0x42, 0x00], &mut dec).unwrap();
        assert_eq!(dec.len(), 2);
    }

    #[test]
    fn encode_appends_without_clobbering_prefix() {
        let mut enc = BytesMut::new();
        enc.extend_from_slice(b"xy");
        encode(&[0x07], &mut enc).unwrap();
        assert_eq!(enc.as_ref(), &[b'x', b'y', 0x02, 0x07, 0x00]);
    }
}
