/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw payload exceeds the maximum stuffable length.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The encoded frame is shorter than the structural minimum
    /// (block-length byte + terminator).
    #[error("encoded frame too short ({size} bytes, min 2)")]
    FrameTooShort { size: usize },

    /// The encoded frame does not end in the terminator byte.
    #[error("encoded frame missing 0x00 terminator")]
    MissingTerminator,
}

pub type Result<T> = std::result::Result<T, CodecError>;
