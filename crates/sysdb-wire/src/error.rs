use thiserror::Error;

/// Protocol-level failure (spec.md §7(a)): malformed frame, bad length,
/// unknown type, a string not null-terminated inside bounds. Always
/// surfaced to the connection as `PROTOCOL_ERROR`, never a dropped socket.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("truncated frame: needed {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("string not null-terminated within bounds")]
    UnterminatedString,

    #[error("invalid UTF-8 in string payload")]
    InvalidUtf8,

    #[error("unknown datum type tag {0}")]
    UnknownDatumType(u32),

    #[error("unknown object type {0:#x}")]
    UnknownObjectType(u32),

    #[error("unknown frame code {0}")]
    UnknownCode(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
