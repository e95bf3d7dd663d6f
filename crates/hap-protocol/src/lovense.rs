//! Lovense ASCII Protocol Implementation
//!
//! Lovense devices accept human-readable ASCII commands written to the
//! vendor control characteristic. There is no framing, length prefix or
//! checksum.
//!
//! # Format
//! ```text
//! Vibrate:<level>
//! ```
//!
//! - `<level>` is the decimal intensity, 0-255
//! - `Vibrate:0` stops the motor

/// Encode a vibration command for the given intensity level
///
/// Level 0 encodes the stop command. The caller is responsible for clamping
/// the level to the device's accepted range before encoding.
pub fn vibrate_frame(level: u8) -> Vec<u8> {
    format!("Vibrate:{level}").into_bytes()
}
