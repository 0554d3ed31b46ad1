use std::fmt;
use std::io;

use cobslink_link::LinkError;
use cobslink_stream::StreamError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::Open { source, .. }
        | LinkError::Configure { source, .. }
        | LinkError::Io(source) => io_error(context, source),
        LinkError::UnsupportedBaud(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn stream_error(context: &str, err: StreamError) -> CliError {
    match err {
        StreamError::Link(err) => link_error(context, err),
        StreamError::CapacityOutOfRange { .. } | StreamError::CapacityExceeded { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        StreamError::PayloadExhausted { .. } | StreamError::Codec(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_taxonomy() {
        let denied = io_error("x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.code, PERMISSION_DENIED);

        let missing = io_error("x", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(missing.code, FAILURE);

        let blocked = io_error("x", io::Error::from(io::ErrorKind::WouldBlock));
        assert_eq!(blocked.code, TIMEOUT);
    }

    #[test]
    fn bad_baud_is_usage() {
        let err = link_error("open", LinkError::UnsupportedBaud(123));
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn capacity_errors_are_usage() {
        let err = stream_error(
            "send",
            StreamError::CapacityExceeded { needed: 4, free: 1 },
        );
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn link_errors_unwrap_through_stream_errors() {
        let inner = LinkError::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        let err = stream_error("send", StreamError::Link(inner));
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
