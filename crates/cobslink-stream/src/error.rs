/// Errors that can occur on a packet stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The requested field capacity cannot be framed within the
    /// codec's one-byte block-length range.
    #[error("capacity out of range ({requested} bytes, max {max})")]
    CapacityOutOfRange { requested: usize, max: usize },

    /// Appending the field would overrun the send buffer.
    #[error("send buffer capacity exceeded (field needs {needed} bytes, {free} free)")]
    CapacityExceeded { needed: usize, free: usize },

    /// Extracting the field would read past the end of the payload.
    #[error("payload exhausted (field needs {needed} bytes, {remaining} remaining)")]
    PayloadExhausted { needed: usize, remaining: usize },

    /// Codec-level error.
    #[error("codec error: {0}")]
    Codec(#[from] cobslink_codec::CodecError),

    /// Link-level error.
    #[error("link error: {0}")]
    Link(#[from] cobslink_link::LinkError),
}

pub type Result<T> = std::result::Result<T, StreamError>;
