// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Coupling Gain
// ─────────────────────────────────────────────────────────────────────
//! Quiet gate and aggregate gain.
//!
//!   gate  = 1                         A ≤ floor
//!         = (thr - A) / (thr - floor)  floor < A < thr
//!         = 0                         A ≥ thr
//!   total = clamp(1 + w·Σ gainᵢ, 1, max)

use serde::{Deserialize, Serialize};

use phin_types::Fixed;

/// Suppresses coupling while the monitored oscillator is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietGate {
    pub floor: Fixed,
    pub threshold: Fixed,
}

impl QuietGate {
    pub fn new(floor: f64, threshold: f64) -> Self {
        Self {
            floor: Fixed::from_f64(floor),
            threshold: Fixed::from_f64(threshold),
        }
    }

    pub fn factor(&self, amplitude: Fixed) -> Fixed {
        if amplitude <= self.floor {
            Fixed::ONE
        } else if amplitude >= self.threshold {
            Fixed::ZERO
        } else {
            ((self.threshold - amplitude) / (self.threshold - self.floor))
                .clamp(Fixed::ZERO, Fixed::ONE)
        }
    }
}

/// `clamp(1 + weight·Σ gains, 1, max_gain)`.
pub fn aggregate_gain<I>(gains: I, weight: Fixed, max_gain: Fixed) -> Fixed
where
    I: IntoIterator<Item = Fixed>,
{
    let total: Fixed = gains.into_iter().sum();
    (Fixed::ONE + total * weight).clamp(Fixed::ONE, max_gain.max(Fixed::ONE))
}
