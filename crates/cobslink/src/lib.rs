//! Framed packet transport for unreliable serial byte streams.
//!
//! cobslink delimits variable-length packets on a continuous byte
//! stream with a zero-terminated byte-stuffing codec, detects corrupted
//! packets with a one-byte additive checksum, and packs/unpacks typed
//! scalar fields in a fixed wire byte order regardless of host
//! endianness.
//!
//! # Crate Structure
//!
//! - [`codec`]: byte-stuffing frame codec and checksum
//! - [`link`]: byte-level transport abstraction (serial port, loopback)
//! - [`stream`]: packet assembler with typed field cursors

/// Re-export codec types.
pub mod codec {
    pub use cobslink_codec::*;
}

/// Re-export link types.
pub mod link {
    pub use cobslink_link::*;
}

/// Re-export stream types.
pub mod stream {
    pub use cobslink_stream::*;
}
