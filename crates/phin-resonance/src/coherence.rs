// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Phase Coherence
// ─────────────────────────────────────────────────────────────────────
//! Instantaneous coherence of two phase-plane states:
//!
//!   C = |(x_a·x_b + y_a·y_b) >> 14|, clamped to [0, 1]
//!
//! For unit-amplitude oscillators this is |cos Δφ|. The raw value swings
//! at twice the beat frequency, so each pair also keeps a first-order
//! low-pass `c += (C - c) >> shift`.

use serde::{Deserialize, Serialize};

use phin_types::{Fixed, Wide};

/// Coherence of two oscillators from their (x, y) coordinates.
/// Symmetric in its two arguments.
pub fn coherence(ax: Fixed, ay: Fixed, bx: Fixed, by: Fixed) -> Fixed {
    let dot = Wide::product(ax, bx) + Wide::product(ay, by);
    dot.narrow().abs().clamp(Fixed::ZERO, Fixed::ONE)
}

/// Piecewise-linear ramp from coherence to coupling factor:
/// 0 below `low`, 1 at or above `high`, linear between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoherenceRamp {
    pub low: Fixed,
    pub high: Fixed,
}

impl CoherenceRamp {
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low: Fixed::from_f64(low),
            high: Fixed::from_f64(high),
        }
    }

    pub fn factor(&self, c: Fixed) -> Fixed {
        if c <= self.low {
            Fixed::ZERO
        } else if c >= self.high {
            Fixed::ONE
        } else {
            ((c - self.low) / (self.high - self.low)).clamp(Fixed::ZERO, Fixed::ONE)
        }
    }
}

impl Default for CoherenceRamp {
    fn default() -> Self {
        Self::new(0.5, 1.0)
    }
}

/// Low-passed coherence of one pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningCoherence {
    value: Fixed,
}

impl RunningCoherence {
    pub fn value(&self) -> Fixed {
        self.value
    }

    /// Fold one instantaneous sample in; shift 0 tracks it exactly.
    pub fn update(&mut self, sample: Fixed, shift: u32) -> Fixed {
        self.value += (sample - self.value).shr(shift);
        self.value
    }

    pub fn reset(&mut self) {
        self.value = Fixed::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(v: f64) -> Fixed {
        Fixed::from_f64(v)
    }

    #[test]
    fn test_aligned_states_are_fully_coherent() {
        assert_eq!(coherence(f(1.0), f(0.0), f(1.0), f(0.0)), Fixed::ONE);
        let c = coherence(f(0.6), f(0.8), f(0.6), f(0.8));
        assert!(c.to_f64() > 0.999, "c={c}");
    }

    #[test]
    fn test_antiphase_counts_as_coherent() {
        assert_eq!(coherence(f(1.0), f(0.0), f(-1.0), f(0.0)), Fixed::ONE);
    }

    #[test]
    fn test_quadrature_is_incoherent() {
        assert_eq!(coherence(f(1.0), f(0.0), f(0.0), f(1.0)), Fixed::ZERO);
    }

    #[test]
    fn test_coherence_is_symmetric() {
        let (ax, ay, bx, by) = (f(0.31), f(-0.77), f(0.9), f(0.12));
        assert_eq!(coherence(ax, ay, bx, by), coherence(bx, by, ax, ay));
    }

    #[test]
    fn test_coherence_clamped_to_unit() {
        assert_eq!(coherence(f(2.0), f(0.0), f(2.0), f(0.0)), Fixed::ONE);
    }

    #[test]
    fn test_ramp_reference_points() {
        let ramp = CoherenceRamp::default();
        assert_eq!(ramp.factor(f(0.4)), Fixed::ZERO);
        assert_eq!(ramp.factor(f(0.5)), Fixed::ZERO);
        assert_eq!(ramp.factor(f(0.75)), Fixed::HALF);
        assert_eq!(ramp.factor(f(1.0)), Fixed::ONE);
    }

    #[test]
    fn test_ramp_is_monotone() {
        let ramp = CoherenceRamp::default();
        let mut prev = Fixed::ZERO;
        for raw in (0..=Fixed::SCALE).step_by(64) {
            let g = ramp.factor(Fixed::from_raw(raw));
            assert!(g >= prev, "raw={raw}");
            prev = g;
        }
    }

    #[test]
    fn test_running_coherence_converges() {
        let mut rc = RunningCoherence::default();
        for _ in 0..1000 {
            rc.update(f(0.8), 5);
        }
        assert!((rc.value().to_f64() - 0.8).abs() < 0.005, "c={}", rc.value());
    }

    #[test]
    fn test_running_coherence_shift_zero_tracks_sample() {
        let mut rc = RunningCoherence::default();
        assert_eq!(rc.update(f(0.3), 0), f(0.3));
        rc.reset();
        assert_eq!(rc.value(), Fixed::ZERO);
    }
}
