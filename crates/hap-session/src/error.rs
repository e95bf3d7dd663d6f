//! Error types for the session engine

use thiserror::Error;

use crate::transport::TransportError;

/// Errors that end a session
///
/// There are no recoverable errors here: every variant drives the state
/// machine toward `Stopped` with resources released. The engine favors a
/// safe shutdown over resilience so devices are never left powered in an
/// undefined state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Discovery ended without observing a controller
    #[error("no controller found during discovery")]
    NoControllerFound,

    /// A connection attempt failed while entering the session
    #[error("failed to connect {device}: {source}")]
    ConnectionFailed {
        /// Device the connection was attempted to
        device: String,
        /// Underlying transport failure
        source: TransportError,
    },

    /// A read or write against a connected device failed mid-session
    #[error("device I/O failure on {device}: {source}")]
    DeviceIo {
        /// Device the operation targeted
        device: String,
        /// Underlying transport failure
        source: TransportError,
    },

    /// The controller produced a frame that does not decode
    #[error("controller signal decode failed: {0}")]
    BadSignal(#[from] hap_protocol::SignalError),

    /// Transport failure outside any single device operation
    #[error(transparent)]
    Transport(#[from] TransportError),
}
