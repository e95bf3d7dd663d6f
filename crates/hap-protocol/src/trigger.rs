//! Stimulator Trigger Command
//!
//! The stimulator accepts a single fixed command; there are no parameters
//! and no response. The session engine fires it once on every high-to-zero
//! intensity transition.
//!
//! # Format
//! ```text
//! [0x01] [0x05]
//! ```

/// The fixed trigger command frame
pub const TRIGGER_FRAME: [u8; 2] = [0x01, 0x05];

/// Encode the trigger command
pub fn trigger_frame() -> Vec<u8> {
    TRIGGER_FRAME.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_is_the_fixed_two_byte_frame() {
        assert_eq!(trigger_frame(), [0x01, 0x05]);
    }
}
