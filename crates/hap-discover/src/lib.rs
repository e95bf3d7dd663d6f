//! Haptic Device Discovery Library
//!
//! This crate classifies nearby wireless peripherals by advertised name and
//! accumulates them into per-role device lists during a scan window.
//!
//! Classification is a fixed prefix table ([`classifier`]); the scanner
//! ([`scanner`]) consumes advertisement events from whatever transport is in
//! use and unblocks its caller as soon as the minimum device set for a
//! session has been observed.
//!
//! # Example
//!
//! ```rust
//! use hap_discover::{classify, Classification};
//! use hap_protocol::ProtocolVariant;
//!
//! assert_eq!(classify("Simon Says 3000"), Some(Classification::Controller));
//! assert_eq!(
//!     classify("LVS-J44"),
//!     Some(Classification::Actuator(ProtocolVariant::LovenseDolce))
//! );
//! assert_eq!(classify("Fitness Tracker"), None);
//! ```

pub mod classifier;
pub mod device;
pub mod scanner;

pub use classifier::classify;
pub use device::{Advertisement, Classification, Device, DeviceAddress, DeviceLists, Role};
pub use scanner::run_discovery;
