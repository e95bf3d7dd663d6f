//! Controller Signal Decoding
//!
//! The controller reports its intensity as a colon-delimited ASCII field,
//! e.g. `LVL:12`. The second token is the raw game level; it is scaled by
//! ten and clamped to the actuator range before driving.
//!
//! # Format
//! ```text
//! <label>:<value>
//! ```
//!
//! Frames without exactly two tokens decode to level 0 rather than an error,
//! matching the controller firmware's idle frames.

use crate::error::SignalError;

/// Scale factor from controller units to actuator intensity
const LEVEL_SCALE: u64 = 10;

/// Maximum intensity accepted by actuators
const LEVEL_MAX: u64 = 255;

/// Decode a controller signal frame to a drive level
///
/// Returns the scaled, clamped intensity in 0-255. A frame that is valid
/// text but lacks the `label:value` shape decodes to 0; malformed text or a
/// non-numeric value field is an error.
pub fn decode_signal(data: &[u8]) -> Result<u8, SignalError> {
    let text = std::str::from_utf8(data).map_err(|_| SignalError::NotUtf8)?;

    let tokens: Vec<&str> = text.split(':').collect();
    if tokens.len() != 2 {
        return Ok(0);
    }

    let value = tokens[1].trim();
    let raw: u64 = value
        .parse()
        .map_err(|_| SignalError::InvalidValue(value.to_string()))?;

    Ok(raw.saturating_mul(LEVEL_SCALE).min(LEVEL_MAX) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scales_the_value_field_by_ten() {
        assert_eq!(decode_signal(b"LVL:12"), Ok(120));
        assert_eq!(decode_signal(b"LVL:0"), Ok(0));
    }

    #[test]
    fn clamps_to_255() {
        assert_eq!(decode_signal(b"LVL:26"), Ok(255));
        assert_eq!(decode_signal(b"LVL:999999999"), Ok(255));
    }

    #[test]
    fn tolerates_trailing_whitespace() {
        assert_eq!(decode_signal(b"LVL:3\n"), Ok(30));
    }

    #[test]
    fn wrong_token_count_decodes_to_zero() {
        assert_eq!(decode_signal(b""), Ok(0));
        assert_eq!(decode_signal(b"idle"), Ok(0));
        assert_eq!(decode_signal(b"a:b:c"), Ok(0));
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert_eq!(
            decode_signal(b"LVL:high"),
            Err(SignalError::InvalidValue("high".to_string()))
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(decode_signal(&[0xFF, 0xFE, b':', b'1']), Err(SignalError::NotUtf8));
    }

    proptest! {
        #[test]
        fn decoded_level_never_exceeds_255(raw in 0u64..1_000_000) {
            let frame = format!("LVL:{raw}");
            let level = decode_signal(frame.as_bytes()).unwrap();
            prop_assert!(u64::from(level) <= 255);
            prop_assert_eq!(u64::from(level), (raw * 10).min(255));
        }
    }
}
