//! Haptlink Session Engine
//!
//! This crate provides the core orchestration for an interactive haptic
//! session: one controller device streams an intensity signal, vibration
//! actuators receive protocol-encoded drive commands, and a stimulator
//! receives a discrete trigger on every high-to-zero transition.
//!
//! # Architecture
//!
//! The engine is a state machine
//! (`Idle → Discovering → Connecting → Running → Draining → Stopped`)
//! running as an async actor over an abstract [`Transport`] capability:
//!
//! - Discovery consumes the transport's advertisement stream through
//!   `hap-discover` and unblocks once the minimum device set is seen.
//! - The connection manager opens one link per device concurrently and
//!   guarantees every opened handle is released exactly once.
//! - The running tick reads the controller signal, modulates it with a
//!   pulse oscillator, and writes protocol frames from `hap-protocol` to
//!   actuator slot 0, firing the stimulator on release transitions.
//!
//! Every fault transitions toward `Stopped` with resources released; the
//! engine never retries, so devices are never left powered in an undefined
//! state.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hap_session::{spawn_session, SessionCommand, SessionConfig};
//!
//! let handle = spawn_session(Arc::new(transport), SessionConfig::default());
//! // ... read handle.events / handle.display, then:
//! handle.commands.send(SessionCommand::Stop).await?;
//! handle.task.await??;
//! ```

pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod events;
pub mod state;
pub mod transport;

pub use config::SessionConfig;
pub use connection::{connect_all, Connection, ConnectionSet};
pub use engine::{run_session, spawn_session, SessionHandle};
pub use error::SessionError;
pub use events::{SessionCommand, SessionEvent};
pub use state::{output_level, DisplayState, PulseOscillator, SessionPhase};
pub use transport::{ScanSubscription, Transport, TransportError};
