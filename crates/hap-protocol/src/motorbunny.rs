//! Motorbunny Framed Protocol Implementation
//!
//! The Motorbunny controller takes checksummed binary frames on its control
//! characteristic. A run command carries the intensity/pulse-width pair
//! repeated seven times; stop is a distinct fixed frame.
//!
//! # Run Frame (17 bytes)
//! ```text
//! [0xFF] [v 0x14] x7 [CRC] [0xEC]
//! ```
//!
//! - Byte 0: header `0xFF`
//! - Bytes 1-14: the pair `{v, 0x14}` repeated seven times
//! - Byte 15: checksum, sum of the 14 payload bytes mod 256
//! - Byte 16: terminator `0xEC`
//!
//! # Stop Frame (6 bytes)
//! ```text
//! [0xF0] [0x00] [0x00] [0x00] [0x00] [0xEC]
//! ```

/// Frame header byte for run commands
pub const FRAME_HEADER: u8 = 0xFF;

/// Frame terminator byte
pub const FRAME_TERMINATOR: u8 = 0xEC;

/// Fixed stop frame, sent for intensity 0
pub const STOP_FRAME: [u8; 6] = [0xF0, 0x00, 0x00, 0x00, 0x00, FRAME_TERMINATOR];

/// Pulse width byte paired with each intensity byte in the payload
const PULSE_WIDTH: u8 = 0x14;

/// Number of `{v, pulse}` pairs in a run frame payload
const PAYLOAD_REPEATS: usize = 7;

/// Total length of an encoded run frame
pub const RUN_FRAME_LEN: usize = 1 + PAYLOAD_REPEATS * 2 + 2;

/// Encode a vibration command for the given intensity level
///
/// Level 0 encodes the stop frame; any other level encodes a full run frame
/// with the payload checksum. The caller is responsible for clamping the
/// level before encoding.
pub fn vibrate_frame(level: u8) -> Vec<u8> {
    if level == 0 {
        return STOP_FRAME.to_vec();
    }

    let mut frame = Vec::with_capacity(RUN_FRAME_LEN);
    frame.push(FRAME_HEADER);
    for _ in 0..PAYLOAD_REPEATS {
        frame.push(level);
        frame.push(PULSE_WIDTH);
    }
    let checksum = frame[1..].iter().map(|&b| u32::from(b)).sum::<u32>() % 256;
    frame.push(checksum as u8);
    frame.push(FRAME_TERMINATOR);
    frame
}
