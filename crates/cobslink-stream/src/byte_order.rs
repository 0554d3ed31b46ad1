//! Host byte-order probe and in-place scalar reversal.
//!
//! The wire carries multi-byte scalars in canonical little-endian
//! order. Little-endian hosts pass bytes through untouched; big-endian
//! hosts reverse 2- and 4-byte scalars on both append and extract. The
//! reversal is its own inverse, so one routine serves both directions.

/// Probe the host's native byte order against a known 2-byte pattern.
pub fn host_is_big_endian() -> bool {
    0x0102u16.to_ne_bytes()[0] == 0x01
}

/// Reverse a 2-byte scalar in place.
pub fn reverse2(bytes: &mut [u8]) {
    bytes.swap(0, 1);
}

/// Reverse a 4-byte scalar in place.
pub fn reverse4(bytes: &mut [u8]) {
    bytes.swap(0, 3);
    bytes.swap(1, 2);
}

/// Apply wire normalization to one scalar's bytes. Only 2- and 4-byte
/// widths are order-sensitive; single bytes pass through.
pub(crate) fn normalize(bytes: &mut [u8], swap: bool) {
    if !swap {
        return;
    }
    match bytes.len() {
        2 => reverse2(bytes),
        4 => reverse4(bytes),
        _ => {}
    }
}
