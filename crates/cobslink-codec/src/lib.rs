//! Byte-stuffing frame codec for zero-delimited serial packets.
//!
//! This is the algorithmic core of cobslink. Every packet is framed as:
//! - A 1-byte leading block length (distance to the next zero)
//! - The stuffed payload (interior zeros replaced by block-length markers)
//! - A single 0x00 terminator
//!
//! plus a 1-byte additive checksum appended to the raw payload before
//! stuffing. Frames can be delimited on a raw byte stream by scanning
//! for 0x00 alone.

pub mod checksum;
pub mod error;
pub mod stuffing;

pub use error::{CodecError, Result};
pub use stuffing::{decode, encode, MAX_RAW_LEN, OVERHEAD, TERMINATOR};
