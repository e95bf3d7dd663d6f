//! Session configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session engine configuration
///
/// Defaults reproduce the reference behavior: a 10 second scan window and a
/// 0-29 pulse ramp advancing by 5 every 250ms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Discovery scan window (ms)
    pub discovery_timeout_ms: u64,
    /// Time between pulse oscillator advances (ms)
    pub pulse_interval_ms: u64,
    /// Pulse oscillator increment per advance
    pub pulse_step: u8,
    /// Pulse oscillator wraps modulo this value
    pub pulse_modulo: u8,
    /// Pause between control loop iterations (ms); 0 = yield only
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            discovery_timeout_ms: 10_000,
            pulse_interval_ms: 250,
            pulse_step: 5,
            pulse_modulo: 30,
            tick_interval_ms: 0,
        }
    }
}

impl SessionConfig {
    /// Discovery scan window as a [`Duration`]
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    /// Pulse advance interval as a [`Duration`]
    pub fn pulse_interval(&self) -> Duration {
        Duration::from_millis(self.pulse_interval_ms)
    }

    /// Control loop pause as a [`Duration`]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_behavior() {
        let config = SessionConfig::default();
        assert_eq!(config.discovery_timeout(), Duration::from_secs(10));
        assert_eq!(config.pulse_interval(), Duration::from_millis(250));
        assert_eq!(config.pulse_step, 5);
        assert_eq!(config.pulse_modulo, 30);
    }

    #[test]
    fn round_trips_through_json() {
        let config = SessionConfig {
            discovery_timeout_ms: 2_000,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.discovery_timeout_ms, 2_000);
        assert_eq!(back.pulse_interval_ms, 250);
    }
}
