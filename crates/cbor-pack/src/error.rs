//! Encoder error types.

use thiserror::Error;

/// Error type for CBOR encoding operations.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// No registered encoder, fallback or default handler accepted the value.
    #[error("cannot serialize type {0}")]
    UnsupportedType(String),
    #[error(transparent)]
    InvalidValue(#[from] InvalidValue),
    /// The output sink refused a write. Bytes already written stay written.
    #[error("failed to write to output sink: {0}")]
    Io(#[from] std::io::Error),
}

impl EncodeError {
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, EncodeError::InvalidValue(_))
    }
}

/// Malformed input to a specific encoder or value constructor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidValue {
    #[error("semantic tag number {0} is outside 0..2^64")]
    TagOutOfRange(i128),
    #[error("naive datetime {0} encountered and no default timezone has been set")]
    NaiveDateTime(String),
    #[error("cyclic data structure detected but value sharing is disabled")]
    CyclicStructure,
    #[error("simple value {0} is reserved (24..=31)")]
    SimpleValueOutOfRange(u8),
    #[error("prefix length {prefix_len} exceeds {max} bits")]
    PrefixTooLong { prefix_len: u8, max: u8 },
    #[error("malformed decimal literal {0:?}")]
    MalformedDecimal(String),
    #[error("malformed network literal {0:?}")]
    MalformedNetwork(String),
    #[error("malformed MIME message: {0}")]
    MalformedMessage(String),
}
