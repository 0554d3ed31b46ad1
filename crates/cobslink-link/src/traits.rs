use std::io::{ErrorKind, Read, Write};

use crate::error::{LinkError, Result};

/// A byte-level transport a packet stream can be driven over.
///
/// The receive side is a non-blocking single-byte poll; the send side
/// takes a complete encoded frame. One link instance backs exactly one
/// stream and is not synchronized for concurrent use.
pub trait ByteLink {
    /// Fetch the next pending byte, or `None` if nothing is available
    /// right now. Never blocks.
    fn poll_byte(&mut self) -> Result<Option<u8>>;

    /// Write all of `bytes` to the transport, retrying short writes.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<L: ByteLink + ?Sized> ByteLink for &mut L {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        (**self).poll_byte()
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }
}

/// Adapts any non-blocking `Read + Write` stream into a [`ByteLink`].
///
/// `WouldBlock` and zero-length reads are reported as "no byte pending";
/// the inner stream must already be in non-blocking mode for `poll_byte`
/// to honor the no-block contract.
#[derive(Debug)]
pub struct IoLink<T> {
    inner: T,
}

impl<T: Read + Write> IoLink<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the adapter and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write> ByteLink for IoLink<T> {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(None),
                Err(err) => return Err(LinkError::Io(err)),
            }
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        write_all_retrying(&mut self.inner, bytes)
    }
}

/// Shared write loop: retries `Interrupted`/`WouldBlock`, treats a
/// zero-length write as a closed link.
pub(crate) fn write_all_retrying<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < bytes.len() {
        match writer.write(&bytes[offset..]) {
            Ok(0) => return Err(LinkError::Closed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(LinkError::Io(err)),
        }
    }

    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(LinkError::Io(err)),
        }
    }
}
