//! Haptic Protocol Library
//!
//! This crate provides command encoding for the wireless haptic peripherals
//! driven by the Haptlink session engine:
//!
//! - **Lovense ASCII**: human-readable `Vibrate:<n>` text commands
//!   (Hush/Lush/Dolce, each on its own control characteristic)
//! - **Motorbunny framed**: checksummed binary frames with a fixed header
//!   and terminator byte
//! - **Stimulator trigger**: a fixed two-byte pulse command
//!
//! It also decodes the controller's intensity signal (a colon-delimited text
//! field) into a drive level.
//!
//! # Architecture
//!
//! Every encoder is a pure function from an intensity level to wire bytes;
//! all I/O lives in `hap-session`. The [`registry`] module ties each
//! [`ProtocolVariant`] to its control characteristic UUID, encoder function
//! and maximum frame length, so adding a device family is a table entry
//! rather than new branching.
//!
//! # Example
//!
//! ```rust
//! use hap_protocol::{registry, ProtocolVariant};
//!
//! let frame = registry::vibrate_frame(ProtocolVariant::LovenseDolce, 7);
//! assert_eq!(frame, b"Vibrate:7");
//!
//! let stop = registry::vibrate_frame(ProtocolVariant::Motorbunny, 0);
//! assert_eq!(stop, [0xF0, 0x00, 0x00, 0x00, 0x00, 0xEC]);
//! ```

pub mod error;
pub mod lovense;
pub mod motorbunny;
pub mod registry;
pub mod signal;
pub mod trigger;

pub use error::SignalError;
pub use registry::{ProtocolEntry, CONTROLLER_SIGNAL_UUID, STIMULATOR_CTRL_UUID};
pub use signal::decode_signal;

/// Wire format family shared by one or more device variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolFamily {
    /// ASCII `Vibrate:<n>` commands, no framing or checksum
    LovenseAscii,
    /// Binary frames with header, repeated payload pairs, checksum, terminator
    MotorbunnyFramed,
}

/// Identifies which protocol variant an actuator speaks
///
/// Variants in the same family share an encoder but may use different
/// control characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolVariant {
    /// Lovense Hush (ASCII commands)
    LovenseHush,
    /// Lovense Lush (ASCII commands)
    LovenseLush,
    /// Lovense Dolce (ASCII commands)
    LovenseDolce,
    /// Motorbunny controller (framed binary commands)
    Motorbunny,
}

impl ProtocolVariant {
    /// Returns a human-readable name for the variant
    pub fn name(&self) -> &'static str {
        match self {
            ProtocolVariant::LovenseHush => "Lovense Hush",
            ProtocolVariant::LovenseLush => "Lovense Lush",
            ProtocolVariant::LovenseDolce => "Lovense Dolce",
            ProtocolVariant::Motorbunny => "Motorbunny",
        }
    }

    /// The wire format family this variant encodes with
    pub fn family(&self) -> ProtocolFamily {
        match self {
            ProtocolVariant::LovenseHush
            | ProtocolVariant::LovenseLush
            | ProtocolVariant::LovenseDolce => ProtocolFamily::LovenseAscii,
            ProtocolVariant::Motorbunny => ProtocolFamily::MotorbunnyFramed,
        }
    }

    /// The control characteristic UUID commands are written to
    pub fn control_uuid(&self) -> &'static str {
        registry::entry(*self).control_uuid
    }
}
