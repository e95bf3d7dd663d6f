//! Error types for protocol decoding

use thiserror::Error;

/// Errors that can occur while decoding a controller signal frame
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// Frame is not valid UTF-8 text
    #[error("signal frame is not valid UTF-8")]
    NotUtf8,

    /// Value field is not a decimal number
    #[error("invalid signal value: {0:?}")]
    InvalidValue(String),
}
