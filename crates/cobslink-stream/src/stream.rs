use bytes::BytesMut;
use tracing::{debug, trace, warn};

use cobslink_codec::{checksum, stuffing};
use cobslink_link::ByteLink;

use crate::byte_order::host_is_big_endian;
use crate::error::{Result, StreamError};
use crate::fields::{put_scalar, FieldReader, WireScalar};

/// Maximum field capacity: one byte of the codec's raw-length budget is
/// reserved for the checksum.
pub const MAX_CAPACITY: usize = stuffing::MAX_RAW_LEN - 1;

/// Outcome of one [`PacketStream::receive`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receipt {
    /// No complete frame yet; bytes (if any) were buffered.
    Pending,
    /// A frame completed, validated, and was handed to the sink.
    Delivered,
    /// A frame completed but failed validation and was dropped.
    ChecksumMismatch,
    /// A frame grew past capacity before its terminator and was
    /// discarded. Framing is resynchronized; the next frame is intact.
    Overflow,
}

/// Consumes validated packets as they are delivered.
///
/// Invoked synchronously inside [`PacketStream::receive`]; extract
/// fields in exactly the order and widths the sender appended them.
/// The return value is advisory (logged when `false`, not propagated),
/// this is a best-effort protocol with no acknowledgement path.
pub trait PacketSink {
    fn on_packet(&mut self, fields: &mut FieldReader<'_>) -> bool;
}

impl<F> PacketSink for F
where
    F: FnMut(&mut FieldReader<'_>) -> bool,
{
    fn on_packet(&mut self, fields: &mut FieldReader<'_>) -> bool {
        self(fields)
    }
}

/// Packet assembler/disassembler over a byte link.
///
/// Owns one send buffer and one receive buffer; exactly one stream per
/// physical link end, driven by a single loop. Sending accumulates
/// typed fields, appends a checksum, stuff-encodes and writes one
/// frame. Receiving polls the link byte by byte, recognizes frame
/// boundaries on the 0x00 terminator, then decodes, validates and
/// dispatches to the sink.
#[derive(Debug)]
pub struct PacketStream<L, S> {
    link: L,
    sink: S,
    capacity: usize,
    swap: bool,
    send_buf: BytesMut,
    /// Encoded bytes of the in-progress incoming frame.
    recv_buf: Vec<u8>,
    /// Next free receive position; explicit instance state so streams
    /// never interfere and tests can start from a known point.
    recv_idx: usize,
    recv_overflow: bool,
    /// Decoded payload of the most recent completed frame.
    decoded: BytesMut,
}

impl<L: ByteLink, S: PacketSink> PacketStream<L, S> {
    /// Create a stream over `link` with room for `capacity` bytes of
    /// fields per packet (checksum and framing overhead not included).
    ///
    /// `capacity` may be at most [`MAX_CAPACITY`] (251) so the encoded
    /// frame stays within the codec's one-byte block-length range.
    pub fn new(link: L, capacity: usize, sink: S) -> Result<Self> {
        if capacity > MAX_CAPACITY {
            return Err(StreamError::CapacityOutOfRange {
                requested: capacity,
                max: MAX_CAPACITY,
            });
        }

        // Largest encoded frame: fields + checksum + framing overhead.
        let encoded_cap = capacity + 1 + stuffing::OVERHEAD;

        Ok(Self {
            link,
            sink,
            capacity,
            swap: host_is_big_endian(),
            send_buf: BytesMut::with_capacity(capacity + 1),
            recv_buf: vec![0u8; encoded_cap],
            recv_idx: 0,
            recv_overflow: false,
            decoded: BytesMut::with_capacity(capacity + 1),
        })
    }

    /// Append one typed field to the outgoing packet.
    ///
    /// Fields accumulate until [`send`](Self::send); the receiver must
    /// extract them in the same order and widths.
    pub fn add_field<T: WireScalar>(&mut self, value: T) -> Result<()> {
        let free = self.capacity - self.send_buf.len();
        if T::WIDTH > free {
            return Err(StreamError::CapacityExceeded {
                needed: T::WIDTH,
                free,
            });
        }

        let start = self.send_buf.len();
        self.send_buf.resize(start + T::WIDTH, 0);
        put_scalar(value, &mut self.send_buf[start..], self.swap);
        Ok(())
    }

    /// Checksum, encode and write the accumulated packet as one frame.
    ///
    /// The send buffer is reset whether or not the link write succeeds,
    /// so a failed send cannot leak stale fields into the next packet.
    pub fn send(&mut self) -> Result<()> {
        checksum::append(&mut self.send_buf);

        let mut encoded = BytesMut::with_capacity(self.send_buf.len() + stuffing::OVERHEAD);
        let encode_result = stuffing::encode(&self.send_buf, &mut encoded);
        self.send_buf.clear();
        encode_result?;

        self.link.write_all(&encoded)?;
        trace!(bytes = encoded.len(), "frame sent");
        Ok(())
    }

    /// Drain available bytes and process at most one completed frame.
    ///
    /// Never blocks: returns [`Receipt::Pending`] as soon as the link
    /// has no byte to offer. When a terminator completes a frame, the
    /// frame is decoded and checksum-validated, and on success the sink
    /// is invoked with a [`FieldReader`] over the payload. Bytes beyond
    /// the first completed frame stay queued in the link for the next
    /// call.
    pub fn receive(&mut self) -> Result<Receipt> {
        let encoded_len = loop {
            let Some(byte) = self.link.poll_byte()? else {
                return Ok(Receipt::Pending);
            };

            self.recv_buf[self.recv_idx] = byte;
            if byte == stuffing::TERMINATOR {
                let len = self.recv_idx + 1;
                self.recv_idx = 0;
                break len;
            } else if self.recv_idx < self.recv_buf.len() - 1 {
                self.recv_idx += 1;
            } else {
                // Out of room: stop advancing, keep consuming up to the
                // terminator so the next frame starts clean.
                self.recv_overflow = true;
            }
        };

        if std::mem::take(&mut self.recv_overflow) {
            warn!(
                capacity = self.capacity,
                "incoming frame exceeded capacity, discarded"
            );
            return Ok(Receipt::Overflow);
        }

        if encoded_len < stuffing::OVERHEAD {
            // A bare terminator, e.g. noise or the tail of a frame we
            // resynchronized past. Nothing to validate.
            debug!(encoded_len, "degenerate frame discarded");
            return Ok(Receipt::ChecksumMismatch);
        }

        self.decoded.clear();
        stuffing::decode(&self.recv_buf[..encoded_len], &mut self.decoded)?;

        if !checksum::validate(&self.decoded) {
            debug!(len = self.decoded.len(), "checksum mismatch, frame dropped");
            return Ok(Receipt::ChecksumMismatch);
        }

        let payload_len = self.decoded.len() - 1; // strip checksum
        trace!(len = payload_len, "frame delivered");

        let mut fields = FieldReader::new(&mut self.decoded[..payload_len], self.swap);
        if !self.sink.on_packet(&mut fields) {
            debug!("sink declined packet");
        }
        Ok(Receipt::Delivered)
    }

    /// Bytes of fields accumulated toward the next send.
    pub fn pending_send_bytes(&self) -> usize {
        self.send_buf.len()
    }

    /// The field capacity this stream was constructed with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Borrow the underlying link.
    pub fn link_ref(&self) -> &L {
        &self.link
    }

    /// Mutably borrow the underlying link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Borrow the sink.
    pub fn sink_ref(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the stream and return the link.
    pub fn into_link(self) -> L {
        self.link
    }
}
