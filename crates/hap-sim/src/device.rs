//! Virtual device state
//!
//! Each simulated peripheral tracks its own script or recording plus the
//! operation counters tests use to prove handles are balanced.

use hap_discover::DeviceAddress;
use hap_protocol::ProtocolVariant;

/// What kind of peripheral a virtual device simulates
#[derive(Debug)]
pub(crate) enum DeviceKind {
    /// Replays scripted signal frames; the last frame repeats forever
    Controller {
        script: Vec<Vec<u8>>,
        cursor: usize,
    },
    /// Records frames written to its control characteristic
    Actuator {
        variant: ProtocolVariant,
        writes: Vec<Vec<u8>>,
    },
    /// Records trigger frames
    Stimulator { triggers: Vec<Vec<u8>> },
}

/// Injected faults for one device
#[derive(Debug, Default)]
pub(crate) struct FaultPlan {
    /// Refuse connection attempts
    pub fail_connect: bool,
    /// Fail reads after this many have succeeded
    pub fail_read_after: Option<usize>,
    /// Fail writes after this many have succeeded
    pub fail_write_after: Option<usize>,
}

/// Operation counters for one device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Successful connects
    pub connects: usize,
    /// Disconnects (handle releases)
    pub disconnects: usize,
    /// Successful reads
    pub reads: usize,
    /// Successful writes
    pub writes: usize,
}

#[derive(Debug)]
pub(crate) struct VirtualDevice {
    pub address: DeviceAddress,
    pub name: String,
    pub kind: DeviceKind,
    pub faults: FaultPlan,
    pub stats: DeviceStats,
}

impl VirtualDevice {
    /// Next scripted controller frame; the script never runs dry
    pub fn next_signal_frame(&mut self) -> Option<Vec<u8>> {
        let DeviceKind::Controller { script, cursor } = &mut self.kind else {
            return None;
        };
        if script.is_empty() {
            return Some(Vec::new());
        }
        let frame = script[*cursor].clone();
        if *cursor + 1 < script.len() {
            *cursor += 1;
        }
        Some(frame)
    }
}
