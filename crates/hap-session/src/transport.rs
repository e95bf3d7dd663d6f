//! Wireless transport capability
//!
//! The session engine is written against this trait rather than a concrete
//! wireless stack. A backend provides advertisement scanning, connection
//! establishment and characteristic reads/writes; `hap-sim` implements it
//! in-process for tests and the console runner.

use std::future::Future;

use hap_discover::{Advertisement, DeviceAddress};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors surfaced by a transport backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Starting the advertisement scan failed
    #[error("scan failed: {0}")]
    ScanFailed(String),

    /// Connection establishment failed
    #[error("connect failed for {address}: {reason}")]
    ConnectFailed {
        /// Address the connection was attempted to
        address: String,
        /// Backend-specific reason
        reason: String,
    },

    /// Characteristic read failed
    #[error("read of {characteristic} failed: {reason}")]
    ReadFailed {
        /// Characteristic UUID the read targeted
        characteristic: String,
        /// Backend-specific reason
        reason: String,
    },

    /// Characteristic write failed
    #[error("write to {characteristic} failed: {reason}")]
    WriteFailed {
        /// Characteristic UUID the write targeted
        characteristic: String,
        /// Backend-specific reason
        reason: String,
    },

    /// Operation against a handle whose link has gone away
    #[error("device is not connected")]
    NotConnected,
}

/// An active advertisement scan
///
/// Wraps the stream of advertisement events. Dropping the subscription (or
/// the receiver extracted from it) ends the scan; the backend stops
/// listening once the consumer goes away.
#[derive(Debug)]
pub struct ScanSubscription {
    events: mpsc::Receiver<Advertisement>,
}

impl ScanSubscription {
    /// Wrap an advertisement event receiver
    pub fn new(events: mpsc::Receiver<Advertisement>) -> Self {
        Self { events }
    }

    /// Extract the advertisement event stream
    pub fn into_events(self) -> mpsc::Receiver<Advertisement> {
        self.events
    }
}

/// Capability contract for a wireless transport backend
///
/// Connection handles are owned values: the engine holds them for the
/// session lifetime and gives each one back to [`Transport::disconnect`]
/// exactly once. Every I/O call has single-attempt semantics; retry policy
/// belongs to neither the backend nor the engine.
pub trait Transport: Send + Sync + 'static {
    /// Open connection to one device
    type Handle: Send + 'static;

    /// Start an advertisement scan
    fn scan(&self) -> Result<ScanSubscription, TransportError>;

    /// Open a connection to the device at `address`
    fn connect(
        &self,
        address: &DeviceAddress,
    ) -> impl Future<Output = Result<Self::Handle, TransportError>> + Send;

    /// Read the current value of a characteristic
    fn read(
        &self,
        handle: &mut Self::Handle,
        characteristic: &str,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    /// Write a frame to a characteristic
    fn write(
        &self,
        handle: &mut Self::Handle,
        characteristic: &str,
        data: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Release a connection; infallible, best effort
    fn disconnect(&self, handle: Self::Handle) -> impl Future<Output = ()> + Send;
}
