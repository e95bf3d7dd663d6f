//! Protocol Registry
//!
//! One immutable table tying each [`ProtocolVariant`] to its control
//! characteristic UUID, encoder function and maximum frame length. The rest
//! of the system refers to devices by variant tag and looks everything else
//! up here.

use crate::{lovense, motorbunny, ProtocolFamily, ProtocolVariant};

/// Notify characteristic the controller's signal is read from
pub const CONTROLLER_SIGNAL_UUID: &str = "beb5483e-36e1-4688-b7f5-ea07361b26a8";

/// Control characteristic the stimulator trigger is written to
///
/// Shares the UUID value with the controller signal characteristic; both
/// devices run the same firmware base.
pub const STIMULATOR_CTRL_UUID: &str = "beb5483e-36e1-4688-b7f5-ea07361b26a8";

/// Lovense Hush control characteristic
pub const LOVENSE_HUSH_CTRL_UUID: &str = "5a300002-0023-4bd4-bbd5-a6920e4c5653";

/// Lovense Lush control characteristic
pub const LOVENSE_LUSH_CTRL_UUID: &str = "53300002-0023-4bd4-bbd5-a6920e4c5653";

/// Lovense Dolce control characteristic
pub const LOVENSE_DOLCE_CTRL_UUID: &str = "4a300002-0023-4bd4-bbd5-a6920e4c5653";

/// Motorbunny control characteristic
pub const MOTORBUNNY_CTRL_UUID: &str = "0000fff6-0000-1000-8000-00805f9b34fb";

/// Everything the session engine needs to drive one actuator variant
#[derive(Debug, Clone, Copy)]
pub struct ProtocolEntry {
    /// Variant tag this entry describes
    pub variant: ProtocolVariant,
    /// Wire format family
    pub family: ProtocolFamily,
    /// Control characteristic commands are written to
    pub control_uuid: &'static str,
    /// Pure encoder from intensity level to wire bytes
    pub encode: fn(u8) -> Vec<u8>,
    /// Largest frame the encoder can produce
    pub max_frame_len: usize,
}

/// Longest ASCII frame: `Vibrate:255`
const LOVENSE_MAX_FRAME_LEN: usize = 11;

static REGISTRY: [ProtocolEntry; 4] = [
    ProtocolEntry {
        variant: ProtocolVariant::LovenseHush,
        family: ProtocolFamily::LovenseAscii,
        control_uuid: LOVENSE_HUSH_CTRL_UUID,
        encode: lovense::vibrate_frame,
        max_frame_len: LOVENSE_MAX_FRAME_LEN,
    },
    ProtocolEntry {
        variant: ProtocolVariant::LovenseLush,
        family: ProtocolFamily::LovenseAscii,
        control_uuid: LOVENSE_LUSH_CTRL_UUID,
        encode: lovense::vibrate_frame,
        max_frame_len: LOVENSE_MAX_FRAME_LEN,
    },
    ProtocolEntry {
        variant: ProtocolVariant::LovenseDolce,
        family: ProtocolFamily::LovenseAscii,
        control_uuid: LOVENSE_DOLCE_CTRL_UUID,
        encode: lovense::vibrate_frame,
        max_frame_len: LOVENSE_MAX_FRAME_LEN,
    },
    ProtocolEntry {
        variant: ProtocolVariant::Motorbunny,
        family: ProtocolFamily::MotorbunnyFramed,
        control_uuid: MOTORBUNNY_CTRL_UUID,
        encode: motorbunny::vibrate_frame,
        max_frame_len: motorbunny::RUN_FRAME_LEN,
    },
];

/// Look up the registry entry for a variant
pub fn entry(variant: ProtocolVariant) -> &'static ProtocolEntry {
    REGISTRY
        .iter()
        .find(|e| e.variant == variant)
        .expect("every variant has a registry entry")
}

/// Encode a vibration command for the given variant and level
pub fn vibrate_frame(variant: ProtocolVariant, level: u8) -> Vec<u8> {
    (entry(variant).encode)(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_an_entry() {
        for variant in [
            ProtocolVariant::LovenseHush,
            ProtocolVariant::LovenseLush,
            ProtocolVariant::LovenseDolce,
            ProtocolVariant::Motorbunny,
        ] {
            let e = entry(variant);
            assert_eq!(e.variant, variant);
            assert_eq!(e.family, variant.family());
        }
    }

    #[test]
    fn entries_route_to_the_family_encoder() {
        assert_eq!(vibrate_frame(ProtocolVariant::LovenseLush, 9), b"Vibrate:9");
        assert_eq!(
            vibrate_frame(ProtocolVariant::Motorbunny, 0),
            motorbunny::STOP_FRAME
        );
    }

    #[test]
    fn max_frame_len_bounds_the_encoder_output() {
        for e in &REGISTRY {
            for level in [0u8, 1, 20, 255] {
                assert!((e.encode)(level).len() <= e.max_frame_len);
            }
        }
    }

    #[test]
    fn lovense_variants_use_distinct_characteristics() {
        let hush = entry(ProtocolVariant::LovenseHush).control_uuid;
        let lush = entry(ProtocolVariant::LovenseLush).control_uuid;
        let dolce = entry(ProtocolVariant::LovenseDolce).control_uuid;
        assert_ne!(hush, lush);
        assert_ne!(lush, dolce);
        assert_ne!(hush, dolce);
    }
}
