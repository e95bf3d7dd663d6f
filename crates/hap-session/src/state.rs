//! Session state primitives
//!
//! The phase enum, the pulse oscillator that modulates nonzero intensity,
//! and the output computation. These are pure pieces of the control loop,
//! kept free of I/O so they can be tested without a transport.

use tokio::time::{Duration, Instant};

/// Phase of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Created, not started
    Idle,
    /// Scanning for devices
    Discovering,
    /// Opening connections to classified devices
    Connecting,
    /// Control loop active
    Running,
    /// Sending stop commands and releasing connections
    Draining,
    /// Terminal
    Stopped,
}

impl SessionPhase {
    /// Returns a human-readable name for the phase
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Discovering => "discovering",
            SessionPhase::Connecting => "connecting",
            SessionPhase::Running => "running",
            SessionPhase::Draining => "draining",
            SessionPhase::Stopped => "stopped",
        }
    }
}

/// Cyclic modulation added to a nonzero raw intensity
///
/// The phase holds its value until the deadline passes, then steps and
/// re-arms. With the default configuration the observed sequence is
/// 0, 5, 10, 15, 20, 25, 0, ... with one step per 250ms.
#[derive(Debug, Clone)]
pub struct PulseOscillator {
    phase: u8,
    deadline: Instant,
    step: u8,
    modulo: u8,
    interval: Duration,
}

impl PulseOscillator {
    /// Create an oscillator at phase 0, first advance due after one interval
    pub fn new(step: u8, modulo: u8, interval: Duration, now: Instant) -> Self {
        Self {
            phase: 0,
            deadline: now + interval,
            step,
            modulo,
            interval,
        }
    }

    /// Current phase without advancing
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Advance if the deadline has passed, returning the current phase
    pub fn advance(&mut self, now: Instant) -> u8 {
        if now >= self.deadline {
            self.phase = (self.phase + self.step) % self.modulo;
            self.deadline = now + self.interval;
        }
        self.phase
    }
}

/// Compute the output intensity from the raw signal and pulse phase
///
/// Zero raw signal means "session inactive" and stays exactly zero so the
/// high-to-zero trigger transition can be observed; a nonzero signal is
/// modulated by the phase and clamped to the actuator range.
pub fn output_level(raw: u8, phase: u8) -> u8 {
    if raw == 0 {
        0
    } else {
        (u16::from(raw) + u16::from(phase)).min(255) as u8
    }
}

/// The two display strings published for the render loop
///
/// `heading` is non-empty only during discovery; `level` only while a
/// nonzero intensity is being driven. Both are cleared on any terminal
/// transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Transient status heading
    pub heading: String,
    /// Current drive level text
    pub level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oscillator(now: Instant) -> PulseOscillator {
        PulseOscillator::new(5, 30, Duration::from_millis(250), now)
    }

    #[test]
    fn phase_holds_until_the_deadline() {
        let t0 = Instant::now();
        let mut pulse = oscillator(t0);

        assert_eq!(pulse.advance(t0), 0);
        assert_eq!(pulse.advance(t0 + Duration::from_millis(249)), 0);
        assert_eq!(pulse.advance(t0 + Duration::from_millis(250)), 5);
    }

    #[test]
    fn phase_cycles_through_the_expected_sequence() {
        let t0 = Instant::now();
        let mut pulse = oscillator(t0);

        let mut seen = vec![pulse.phase()];
        let mut now = t0;
        for _ in 0..7 {
            now += Duration::from_millis(250);
            seen.push(pulse.advance(now));
        }
        assert_eq!(seen, [0, 5, 10, 15, 20, 25, 0, 5]);
    }

    #[test]
    fn phase_never_reaches_the_modulo() {
        let t0 = Instant::now();
        let mut pulse = oscillator(t0);
        let mut now = t0;
        for _ in 0..100 {
            now += Duration::from_millis(250);
            assert!(pulse.advance(now) < 30);
        }
    }

    #[test]
    fn a_slow_tick_advances_one_step_per_call() {
        // Two intervals pass between calls; the phase still steps once
        let t0 = Instant::now();
        let mut pulse = oscillator(t0);
        assert_eq!(pulse.advance(t0 + Duration::from_millis(600)), 5);
        assert_eq!(pulse.advance(t0 + Duration::from_millis(900)), 10);
    }

    #[test]
    fn zero_raw_is_always_zero_out() {
        for phase in [0u8, 5, 10, 25] {
            assert_eq!(output_level(0, phase), 0);
        }
    }

    #[test]
    fn nonzero_raw_is_modulated_by_the_phase() {
        assert_eq!(output_level(30, 25), 55);
        assert_eq!(output_level(30, 0), 30);
    }

    #[test]
    fn output_clamps_at_255() {
        assert_eq!(output_level(250, 25), 255);
        assert_eq!(output_level(255, 25), 255);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn output_is_the_clamped_sum_unless_raw_is_zero(raw in 0u8..=255, phase in 0u8..30) {
            let out = output_level(raw, phase);
            if raw == 0 {
                prop_assert_eq!(out, 0);
            } else {
                let expected = (u16::from(raw) + u16::from(phase)).min(255) as u8;
                prop_assert_eq!(out, expected);
            }
        }
    }
}
