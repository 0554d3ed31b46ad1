use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{LinkError, Result};
use crate::traits::{write_all_retrying, ByteLink};

/// Serial line configuration.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Line speed in baud. Must be one of the standard termios rates.
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud: 115_200 }
    }
}

/// A termios serial port in raw 8N1 non-blocking mode.
///
/// Opens the device read/write without becoming its controlling
/// terminal, disables all line discipline (no echo, no canonical
/// buffering, no CR/LF translation), and leaves reads non-blocking so
/// [`ByteLink::poll_byte`] returns immediately when the line is idle.
pub struct SerialPort {
    file: File,
    path: PathBuf,
}

impl SerialPort {
    /// Open a serial device with the default configuration (115200 baud).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &SerialConfig::default())
    }

    /// Open a serial device with explicit configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: &SerialConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let speed = baud_constant(config.baud)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
            .open(&path)
            .map_err(|source| LinkError::Open {
                path: path.clone(),
                source,
            })?;

        configure_raw_8n1(&file, speed).map_err(|source| LinkError::Configure {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), baud = config.baud, "serial port open");
        Ok(Self { file, path })
    }

    /// The device path this port was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteLink for SerialPort {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.file.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(None),
                Err(err) => return Err(LinkError::Io(err)),
            }
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        write_all_retrying(&mut self.file, bytes)
    }
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort").field("path", &self.path).finish()
    }
}

/// Apply raw-mode termios attributes: 8 data bits, no parity, 1 stop
/// bit, receiver enabled, modem control lines ignored, all input/output
/// processing off.
fn configure_raw_8n1(file: &File, speed: libc::speed_t) -> std::io::Result<()> {
    let fd = file.as_raw_fd();

    // SAFETY: a zeroed termios is a valid starting point; every flag
    // field is explicitly assigned below before the struct is applied.
    let mut tio: libc::termios = unsafe { std::mem::zeroed() };

    tio.c_iflag = 0;
    tio.c_oflag = 0;
    tio.c_cflag = libc::CS8 | libc::CREAD | libc::CLOCAL;
    tio.c_lflag = 0;
    // Non-canonical read thresholds; with O_NONBLOCK set these are
    // moot, but keep the intent explicit.
    tio.c_cc[libc::VMIN] = 1;
    tio.c_cc[libc::VTIME] = 0;

    // SAFETY: `tio` is a valid, initialized termios and `fd` is an open
    // descriptor owned by `file` for the duration of the call.
    let rc = unsafe {
        if libc::cfsetospeed(&mut tio, speed) != 0 || libc::cfsetispeed(&mut tio, speed) != 0 {
            -1
        } else {
            libc::tcsetattr(fd, libc::TCSANOW, &tio)
        }
    };

    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

fn baud_constant(baud: u32) -> Result<libc::speed_t> {
    let speed = match baud {
        9_600 => libc::B9600,
        19_200 => libc::B19200,
        38_400 => libc::B38400,
        57_600 => libc::B57600,
        115_200 => libc::B115200,
        230_400 => libc::B230400,
        other => return Err(LinkError::UnsupportedBaud(other)),
    };
    Ok(speed)
}
