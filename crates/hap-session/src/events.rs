//! Session command and event types
//!
//! The engine runs as an async actor: commands in, events out. Observers
//! (the console runner, tests) receive all session activity through a
//! single event channel.

use hap_discover::{DeviceAddress, Role};

use crate::state::SessionPhase;

/// Commands accepted by a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Request an orderly shutdown
    Stop,
}

/// Events emitted by the session engine
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The state machine moved to a new phase
    PhaseChanged {
        /// Phase left
        from: SessionPhase,
        /// Phase entered
        to: SessionPhase,
    },

    /// Discovery finished
    DevicesDiscovered {
        /// Controllers observed
        controllers: usize,
        /// Stimulators observed
        stimulators: usize,
        /// Actuators observed
        actuators: usize,
    },

    /// A device connection was established
    DeviceConnected {
        /// Role of the connected device
        role: Role,
        /// Address of the connected device
        address: DeviceAddress,
    },

    /// The driven intensity changed
    LevelChanged {
        /// New output level
        level: u8,
    },

    /// A stimulation trigger was fired
    StimulusTriggered,

    /// A fatal error occurred; the session is shutting down
    Error {
        /// Human-readable description
        message: String,
    },
}
