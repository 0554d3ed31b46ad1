//! Byte-level transport abstraction for cobslink.
//!
//! Provides the [`ByteLink`] capability the packet stream is driven
//! over (a non-blocking single-byte poll plus a whole-frame write)
//! and its concrete implementations:
//! - [`SerialPort`]: a termios serial line in raw 8N1 mode (Unix)
//! - [`IoLink`]: adapter over any non-blocking `Read + Write` stream
//! - [`Loopback`]: an in-memory pair for tests and demos
//!
//! This is the lowest layer of cobslink. Everything else builds on top
//! of the [`ByteLink`] trait provided here.

pub mod error;
pub mod loopback;
pub mod traits;

#[cfg(unix)]
pub mod serial;

pub use error::{LinkError, Result};
pub use loopback::Loopback;
pub use traits::{ByteLink, IoLink};

#[cfg(unix)]
pub use serial::{SerialConfig, SerialPort};
