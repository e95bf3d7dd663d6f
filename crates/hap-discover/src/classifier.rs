//! Name-prefix classifier
//!
//! Devices advertise a vendor-assigned name; the first matching prefix in
//! the table below decides the role and, for actuators, the protocol
//! variant. Supporting a new device family is one more table row.

use hap_protocol::ProtocolVariant;

use crate::device::Classification;

/// Known advertised-name prefixes, checked in order
const PREFIX_TABLE: &[(&str, Classification)] = &[
    ("Simon", Classification::Controller),
    ("Shocker", Classification::Stimulator),
    (
        "MB Controller",
        Classification::Actuator(ProtocolVariant::Motorbunny),
    ),
    (
        "LVS-J",
        Classification::Actuator(ProtocolVariant::LovenseDolce),
    ),
    (
        "LVS-Z",
        Classification::Actuator(ProtocolVariant::LovenseHush),
    ),
    (
        "LVS-S",
        Classification::Actuator(ProtocolVariant::LovenseLush),
    ),
];

/// Classify an advertised name
///
/// Pure prefix match against the fixed table; returns None for names no
/// known device family advertises.
pub fn classify(name: &str) -> Option<Classification> {
    PREFIX_TABLE
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix))
        .map(|&(_, classification)| classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn classifies_every_known_prefix() {
        assert_eq!(classify("Simon Game v2"), Some(Classification::Controller));
        assert_eq!(classify("Shocker-01"), Some(Classification::Stimulator));
        assert_eq!(
            classify("MB Controller"),
            Some(Classification::Actuator(ProtocolVariant::Motorbunny))
        );
        assert_eq!(
            classify("LVS-J44"),
            Some(Classification::Actuator(ProtocolVariant::LovenseDolce))
        );
        assert_eq!(
            classify("LVS-Z36"),
            Some(Classification::Actuator(ProtocolVariant::LovenseHush))
        );
        assert_eq!(
            classify("LVS-S39"),
            Some(Classification::Actuator(ProtocolVariant::LovenseLush))
        );
    }

    #[test]
    fn prefix_must_match_from_the_start() {
        assert_eq!(classify("My Simon"), None);
        assert_eq!(classify("LVS"), None);
        assert_eq!(classify(""), None);
    }

    proptest! {
        #[test]
        fn names_without_a_known_prefix_never_classify(name in "[a-z0-9 ]{0,24}") {
            // Lowercase names cannot start with any table prefix
            prop_assert_eq!(classify(&name), None);
        }

        #[test]
        fn classification_is_deterministic(name in ".{0,32}") {
            prop_assert_eq!(classify(&name), classify(&name));
        }
    }
}
