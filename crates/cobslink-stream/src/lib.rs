//! Packet assembly over a byte-stuffed serial link.
//!
//! This is the layer applications talk to. A [`PacketStream`] owns one
//! send and one receive buffer over a [`cobslink_link::ByteLink`]:
//! - sending: append typed fields, then [`PacketStream::send`] appends
//!   a checksum, stuff-encodes and writes one frame
//! - receiving: [`PacketStream::receive`] polls bytes without blocking,
//!   recognizes frame boundaries, validates, and dispatches each good
//!   packet to a [`PacketSink`] with a typed [`FieldReader`] cursor
//!
//! Field order and widths are a contract between the two ends; the wire
//! carries no type tags. Multi-byte scalars travel little-endian.

pub mod byte_order;
pub mod error;
pub mod fields;
pub mod stream;

pub use error::{Result, StreamError};
pub use fields::{FieldReader, WireScalar};
pub use stream::{PacketSink, PacketStream, Receipt, MAX_CAPACITY};
