// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Landscape Force
// ─────────────────────────────────────────────────────────────────────
//! Fixed-point force F(n) = -dE/dn as three table-driven terms:
//!
//!   attractor  2πA·sin(2πn)         256-entry sine table over one period
//!   zone       ±zone_force           away from log_φ{2,3,4} within ±w
//!   rational   -d/dn Σ (B/q²)/(…)    table over n ∈ [-2, 5], step 1/128,
//!                                    clamped to ±rational_force_cap
//!
//! The sum is clamped to ±force_limit. Tables are filled from
//! [`EnergyModel`] once at construction.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use phin_types::{Fixed, LandscapeConfig};

use crate::energy::{EnergyModel, N_MAX, N_MIN};
use crate::position::catastrophe_centres;

pub const SINE_TABLE_BITS: u32 = 8;
pub const SINE_TABLE_SIZE: usize = 1 << SINE_TABLE_BITS;

/// Rational-gradient grid resolution (entries per unit of n).
pub const RATIONAL_STEPS_PER_UNIT: i32 = 128;

/// Per-term breakdown of one force evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceComponents {
    pub attractor: Fixed,
    pub zone: Fixed,
    pub rational: Fixed,
    pub total: Fixed,
}

#[derive(Debug, Clone)]
pub struct ForceModel {
    sine: Vec<Fixed>,
    attractor_gain: Fixed,
    zone_centres: [Fixed; 3],
    zone_half_width: Fixed,
    zone_force: Fixed,
    rational: Vec<Fixed>,
    force_limit: Fixed,
}

impl ForceModel {
    pub fn new(cfg: &LandscapeConfig) -> Self {
        let sine = (0..=SINE_TABLE_SIZE)
            .map(|i| Fixed::from_f64((TAU * i as f64 / SINE_TABLE_SIZE as f64).sin()))
            .collect();

        let energy = EnergyModel::new(cfg);
        let cap = cfg.rational_force_cap;
        let steps = ((N_MAX - N_MIN) as i32) * RATIONAL_STEPS_PER_UNIT;
        let rational = (0..=steps)
            .map(|i| {
                let n = N_MIN + i as f64 / RATIONAL_STEPS_PER_UNIT as f64;
                Fixed::from_f64(energy.rational_force(n).clamp(-cap, cap))
            })
            .collect();

        Self {
            sine,
            attractor_gain: Fixed::from_f64(TAU * cfg.attractor_depth),
            zone_centres: catastrophe_centres().map(Fixed::from_f64),
            zone_half_width: Fixed::from_f64(cfg.zone_half_width),
            zone_force: Fixed::from_f64(cfg.zone_force),
            rational,
            force_limit: Fixed::from_f64(cfg.force_limit),
        }
    }

    /// sin(2πn) from the table, interpolated on the low 6 bits of frac(n).
    pub fn sin_2pi(&self, n: Fixed) -> Fixed {
        let phase = n.raw() & (Fixed::SCALE - 1);
        let shift = Fixed::FRAC_BITS - SINE_TABLE_BITS;
        let idx = (phase >> shift) as usize;
        let weight = Fixed::from_raw((phase & ((1 << shift) - 1)) << SINE_TABLE_BITS);
        self.sine[idx].lerp(self.sine[idx + 1], weight)
    }

    /// Index of the catastrophe zone containing n, if any.
    pub fn zone_of(&self, n: Fixed) -> Option<usize> {
        self.zone_centres
            .iter()
            .position(|&c| (n - c).abs() < self.zone_half_width)
    }

    /// Distance from the containing zone's centre as a fraction of the
    /// half-width: 0 at the centre, approaching 1 at the edge. `None`
    /// outside every zone.
    pub fn zone_depth(&self, n: Fixed) -> Option<Fixed> {
        self.zone_of(n)
            .map(|z| ((n - self.zone_centres[z]).abs() / self.zone_half_width).min(Fixed::ONE))
    }

    pub fn zone_centres(&self) -> &[Fixed; 3] {
        &self.zone_centres
    }

    fn zone_term(&self, n: Fixed) -> Fixed {
        match self.zone_of(n) {
            Some(z) if n < self.zone_centres[z] => -self.zone_force,
            Some(_) => self.zone_force,
            None => Fixed::ZERO,
        }
    }

    fn rational_term(&self, n: Fixed) -> Fixed {
        // grid coordinate in 1/128 steps with 7 fractional bits
        let offset = n.raw() as i64 - Fixed::from_int(N_MIN as i32).raw() as i64;
        let shift = Fixed::FRAC_BITS - RATIONAL_STEPS_PER_UNIT.trailing_zeros();
        let last = self.rational.len() - 1;
        if offset <= 0 {
            return self.rational[0];
        }
        let idx = (offset >> shift) as usize;
        if idx >= last {
            return self.rational[last];
        }
        let rem = (offset & ((1 << shift) - 1)) as i32;
        let weight = Fixed::from_raw(rem << (Fixed::FRAC_BITS - shift));
        self.rational[idx].lerp(self.rational[idx + 1], weight)
    }

    pub fn components(&self, n: Fixed) -> ForceComponents {
        let attractor = self.attractor_gain * self.sin_2pi(n);
        let zone = self.zone_term(n);
        let rational = self.rational_term(n);
        let total = (attractor + zone + rational).clamp(-self.force_limit, self.force_limit);
        ForceComponents {
            attractor,
            zone,
            rational,
            total,
        }
    }

    pub fn force(&self, n: Fixed) -> Fixed {
        self.components(n).total
    }
}

impl Default for ForceModel {
    fn default() -> Self {
        Self::new(&LandscapeConfig::default())
    }
}
