//! NDR error types

use thiserror::Error;

/// NDR encoding/decoding errors
#[derive(Debug, Error)]
pub enum NdrError {
    /// Buffer underflow - not enough data
    #[error("buffer underflow: needed {needed} bytes, have {have}")]
    BufferUnderflow { needed: usize, have: usize },

    /// Invalid string - bad offset or encoding
    #[error("invalid string: {0}")]
    InvalidString(String),

    /// Invalid pointer - unexpected referent ID
    #[error("invalid pointer: referent ID {0}")]
    InvalidPointer(u32),

    /// Array size mismatch
    #[error("array size mismatch: expected {expected}, got {got}")]
    ArraySizeMismatch { expected: usize, got: usize },

    /// Invalid enum value
    #[error("invalid enum value: {0}")]
    InvalidEnumValue(i32),

    /// Conformance mismatch
    #[error("conformance mismatch: max_count={max_count}, actual_count={actual_count}")]
    ConformanceMismatch { max_count: u32, actual_count: u32 },

    /// Length field exceeds the configured sanity bound
    #[error("allocation limit exceeded: requested {requested}, limit {limit}")]
    AllocationLimitExceeded { requested: usize, limit: usize },

    /// Size arithmetic overflowed
    #[error("integer overflow in size computation")]
    IntegerOverflow,

    /// Stream finished while pointer bodies were still queued
    #[error("{0} deferred pointer bodies were never flushed")]
    UnflushedDeferrals(usize),

    /// Bytes left over after a complete frame
    #[error("{0} trailing bytes after end of frame")]
    TrailingData(usize),

    /// A payload hook refused the value
    #[error("payload rejected: {0}")]
    Rejected(String),

    /// UTF-8 decoding error
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// UTF-16 decoding error
    #[error("UTF-16 error: {0}")]
    Utf16Error(#[from] std::char::DecodeUtf16Error),
}

/// Result type for NDR operations
pub type Result<T> = std::result::Result<T, NdrError>;
