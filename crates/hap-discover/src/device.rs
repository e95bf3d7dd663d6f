//! Device identity and per-role accumulation
//!
//! A [`Device`] is created the first time a matching advertisement is seen
//! and is immutable once classified. [`DeviceLists`] holds one deduplicated,
//! first-seen-ordered list per role.

use std::fmt;

use hap_protocol::ProtocolVariant;
use tracing::info;

use crate::classifier::classify;

/// Transport-level address of a peripheral
///
/// Equality on the address is device identity; two advertisements with the
/// same address are the same device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Create an address from its transport string form
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The raw address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One advertisement event as delivered by the transport
#[derive(Debug, Clone)]
pub struct Advertisement {
    /// Address of the advertising device
    pub address: DeviceAddress,
    /// Advertised device name
    pub name: String,
}

/// Role a classified device plays in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Streams the driving intensity signal
    Controller,
    /// Receives a discrete trigger command on high-to-zero transitions
    Stimulator,
    /// Receives vibration-intensity commands
    Actuator,
}

impl Role {
    /// Returns a human-readable name for the role
    pub fn name(&self) -> &'static str {
        match self {
            Role::Controller => "controller",
            Role::Stimulator => "stimulator",
            Role::Actuator => "actuator",
        }
    }
}

/// Result of classifying an advertised name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The session controller
    Controller,
    /// A trigger-on-release stimulator
    Stimulator,
    /// A vibration actuator speaking the given protocol variant
    Actuator(ProtocolVariant),
}

impl Classification {
    /// The role this classification assigns
    pub fn role(&self) -> Role {
        match self {
            Classification::Controller => Role::Controller,
            Classification::Stimulator => Role::Stimulator,
            Classification::Actuator(_) => Role::Actuator,
        }
    }
}

/// A classified peripheral, immutable once created
#[derive(Debug, Clone)]
pub struct Device {
    /// Transport address (identity)
    pub address: DeviceAddress,
    /// Advertised name the classification matched on
    pub name: String,
    /// Assigned role and, for actuators, protocol variant
    pub classification: Classification,
}

impl Device {
    /// The role this device plays
    pub fn role(&self) -> Role {
        self.classification.role()
    }

    /// The protocol variant, for actuators
    pub fn variant(&self) -> Option<ProtocolVariant> {
        match self.classification {
            Classification::Actuator(variant) => Some(variant),
            _ => None,
        }
    }
}

/// Per-role device lists accumulated during discovery
///
/// Each list is deduplicated by address and ordered by first sighting.
#[derive(Debug, Clone, Default)]
pub struct DeviceLists {
    /// Controllers, first-seen order
    pub controllers: Vec<Device>,
    /// Stimulators, first-seen order
    pub stimulators: Vec<Device>,
    /// Actuators, first-seen order
    pub actuators: Vec<Device>,
}

impl DeviceLists {
    /// Classify an advertisement and record the device if it is new
    ///
    /// Returns true if a device was added. Unrecognized names and repeat
    /// sightings are ignored.
    pub fn observe(&mut self, adv: &Advertisement) -> bool {
        let Some(classification) = classify(&adv.name) else {
            return false;
        };

        let list = self.list_mut(classification.role());
        if list.iter().any(|d| d.address == adv.address) {
            return false;
        }

        info!(
            "Found {} \"{}\" at {}",
            classification.role().name(),
            adv.name,
            adv.address
        );
        list.push(Device {
            address: adv.address.clone(),
            name: adv.name.clone(),
            classification,
        });
        true
    }

    /// Minimum device set for a session: one controller and one actuator
    pub fn is_ready(&self) -> bool {
        !self.controllers.is_empty() && !self.actuators.is_empty()
    }

    /// Total number of classified devices across all roles
    pub fn len(&self) -> usize {
        self.controllers.len() + self.stimulators.len() + self.actuators.len()
    }

    /// True if no device has been classified yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list_mut(&mut self, role: Role) -> &mut Vec<Device> {
        match role {
            Role::Controller => &mut self.controllers,
            Role::Stimulator => &mut self.stimulators,
            Role::Actuator => &mut self.actuators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adv(address: &str, name: &str) -> Advertisement {
        Advertisement {
            address: DeviceAddress::new(address),
            name: name.to_string(),
        }
    }

    #[test]
    fn observe_records_classified_devices_once() {
        let mut lists = DeviceLists::default();

        assert!(lists.observe(&adv("aa:01", "Simon Game")));
        assert!(!lists.observe(&adv("aa:01", "Simon Game")));
        assert!(lists.observe(&adv("aa:02", "MB Controller")));

        assert_eq!(lists.controllers.len(), 1);
        assert_eq!(lists.actuators.len(), 1);
        assert_eq!(lists.len(), 2);
    }

    #[test]
    fn observe_ignores_unknown_names() {
        let mut lists = DeviceLists::default();
        assert!(!lists.observe(&adv("aa:01", "Kitchen Scale")));
        assert!(lists.is_empty());
    }

    #[test]
    fn readiness_needs_a_controller_and_an_actuator() {
        let mut lists = DeviceLists::default();
        assert!(!lists.is_ready());

        lists.observe(&adv("aa:01", "Simon Game"));
        assert!(!lists.is_ready());

        lists.observe(&adv("aa:02", "Shocker v2"));
        assert!(!lists.is_ready());

        lists.observe(&adv("aa:03", "LVS-J77"));
        assert!(lists.is_ready());
    }

    #[test]
    fn lists_preserve_first_seen_order() {
        let mut lists = DeviceLists::default();
        lists.observe(&adv("aa:02", "MB Controller"));
        lists.observe(&adv("aa:03", "LVS-J77"));
        lists.observe(&adv("aa:01", "LVS-Z12"));

        let addresses: Vec<_> = lists.actuators.iter().map(|d| d.address.as_str()).collect();
        assert_eq!(addresses, ["aa:02", "aa:03", "aa:01"]);
    }
}
