// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Gate Signal
// ─────────────────────────────────────────────────────────────────────
//! Phase class of the gating oscillator from its value and the change
//! since the previous tick:
//!
//!   PEAK     v > +level
//!   TROUGH   v < -level
//!   RISING   otherwise, v ≥ v_prev
//!   FALLING  otherwise, v < v_prev
//!
//! One gating cycle is counted at every upward zero crossing.

use serde::{Deserialize, Serialize};

use phin_types::Fixed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatePhase {
    Peak,
    Trough,
    Rising,
    Falling,
}

/// Classification of one gating sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSample {
    pub value: Fixed,
    pub phase: GatePhase,
    pub upward_crossing: bool,
}

/// Holds only the previous sample.
#[derive(Debug, Clone)]
pub struct GateTracker {
    level: Fixed,
    previous: Fixed,
}

impl GateTracker {
    pub fn new(level: Fixed) -> Self {
        Self {
            level,
            previous: Fixed::ZERO,
        }
    }

    pub fn level(&self) -> Fixed {
        self.level
    }

    pub fn observe(&mut self, value: Fixed) -> GateSample {
        let phase = if value > self.level {
            GatePhase::Peak
        } else if value < -self.level {
            GatePhase::Trough
        } else if value >= self.previous {
            GatePhase::Rising
        } else {
            GatePhase::Falling
        };
        let upward_crossing = self.previous.is_negative() && !value.is_negative();
        self.previous = value;
        GateSample {
            value,
            phase,
            upward_crossing,
        }
    }

    pub fn reset(&mut self) {
        self.previous = Fixed::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(v: f64) -> Fixed {
        Fixed::from_f64(v)
    }

    #[test]
    fn test_phase_classes() {
        let mut g = GateTracker::new(f(0.75));
        assert_eq!(g.observe(f(0.2)).phase, GatePhase::Rising);
        assert_eq!(g.observe(f(0.8)).phase, GatePhase::Peak);
        assert_eq!(g.observe(f(0.4)).phase, GatePhase::Falling);
        assert_eq!(g.observe(f(-0.9)).phase, GatePhase::Trough);
        assert_eq!(g.observe(f(-0.7)).phase, GatePhase::Rising);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut g = GateTracker::new(f(0.75));
        assert_eq!(g.observe(f(0.75)).phase, GatePhase::Rising);
        assert_eq!(g.observe(f(-0.75)).phase, GatePhase::Falling);
    }

    #[test]
    fn test_upward_crossings_once_per_cycle() {
        let mut g = GateTracker::new(f(0.75));
        let crossings = (0..4000)
            .map(|t| (std::f64::consts::TAU * 5.0 * t as f64 / 4000.0).sin())
            .filter(|&v| g.observe(f(v)).upward_crossing)
            .count();
        // the very first sample (0.0 after a 0.0 reset) is not a crossing
        assert_eq!(crossings, 4);
    }
}
