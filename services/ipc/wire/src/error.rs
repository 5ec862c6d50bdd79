//! Wire codec error types.

use thiserror::Error;

/// Convenience result alias for codec operations
pub type Result<T> = std::result::Result<T, WireError>;

/// Wire codec errors
///
/// Every error is a deterministic function of the input. A failed decode leaves
/// the cursor at an unspecified position and the context must be discarded.
#[derive(Error, Debug)]
pub enum WireError {
    /// Value has no wire representation
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Cursor ran past the end of the input
    #[error("malformed buffer: need {needed} byte(s) at offset {offset}, {available} available")]
    MalformedBuffer {
        /// Cursor position of the failed read
        offset: usize,
        /// Bytes required by the read
        needed: usize,
        /// Bytes left in the input
        available: usize,
    },

    /// Length or count prefix wider than the platform allows
    #[error("length prefix at offset {offset} does not fit in a machine word")]
    LengthOverflow {
        /// Cursor position of the prefix
        offset: usize,
    },

    /// Tag and value (or tag and params) do not fit together
    #[error("type context mismatch: {0}")]
    TypeContextMismatch(String),

    /// Unknown wire type tag
    #[error("unknown wire type {0:#04x}")]
    UnknownWireType(u8),

    /// String body is not valid UTF-8
    #[error("invalid utf-8 in string body: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Decomposed float exponent cannot be reconstructed
    #[error("float exponent out of range: {0}")]
    FloatExponent(String),

    /// Input continues after a complete value
    #[error("{0} trailing byte(s) after value")]
    TrailingBytes(usize),

    /// Nesting limit exceeded while decoding
    #[error("nesting depth exceeded: {0}")]
    DepthExceeded(usize),
}

impl WireError {
    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        WireError::TypeContextMismatch(msg.into())
    }
}
