//! Haptlink Simulation Library
//!
//! This crate provides a simulated wireless transport for exercising the
//! session engine without physical hardware. It includes:
//!
//! - **Virtual controller**: replays a scripted sequence of signal frames
//! - **Virtual actuator**: records every frame written to its control
//!   characteristic and rejects writes on the wrong characteristic
//! - **Virtual stimulator**: counts trigger commands
//!
//! Faults (connect refusal, read/write failure after N operations) can be
//! injected per device, and connect/disconnect counters make handle leaks
//! visible to tests.
//!
//! # Example
//!
//! ```rust
//! use hap_protocol::ProtocolVariant;
//! use hap_sim::SimTransport;
//!
//! let sim = SimTransport::new();
//! sim.add_controller("aa:01", "Simon Game", &["LVL:2", "LVL:0"]);
//! sim.add_actuator("aa:02", "MB Controller", ProtocolVariant::Motorbunny);
//! sim.add_stimulator("aa:03", "Shocker v2");
//! ```

pub mod device;
pub mod transport;

pub use device::DeviceStats;
pub use transport::{SimHandle, SimTransport};
