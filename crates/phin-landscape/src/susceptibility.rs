// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Coupling Susceptibility
// ─────────────────────────────────────────────────────────────────────
//! χ(r) over frequency ratios r ∈ [0.5, 8], step 1/128:
//!
//!   χ(r) ∝ Σ_{p/q, q ≤ 5} (1/q²)·γ²/((r - p/q)² + γ²)
//!        + w_φ · Σ_k γ²/((r - φᵏ)² + γ²)
//!
//! normalised so the table maximum is 1. Low χ (ratio between
//! resonances) is an attractor regime; high χ (near a low-order
//! fraction or a φ power) is a boundary regime.

use serde::{Deserialize, Serialize};

use phin_physics::params::PHI;
use phin_types::{Fixed, LandscapeConfig};

use crate::energy::rationals;

pub const CHI_R_MIN: f64 = 0.5;
pub const CHI_R_MAX: f64 = 8.0;
pub const CHI_STEPS_PER_UNIT: i32 = 128;
pub const CHI_MAX_Q: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouplingRegime {
    Attractor,
    Transition,
    Boundary,
}

#[derive(Debug, Clone)]
pub struct ChiTable {
    entries: Vec<Fixed>,
    attractor_max: Fixed,
    boundary_min: Fixed,
}

impl ChiTable {
    pub fn new(cfg: &LandscapeConfig) -> Self {
        let g2 = cfg.chi_gamma * cfg.chi_gamma;
        let lorentz = |r: f64, centre: f64| g2 / ((r - centre).powi(2) + g2);
        let fractions = rationals(CHI_MAX_Q, CHI_R_MIN / 2.0, CHI_R_MAX + 0.5);
        let phi_powers: Vec<f64> = (-2..=5).map(|k| PHI.powi(k)).collect();

        let steps = ((CHI_R_MAX - CHI_R_MIN) * CHI_STEPS_PER_UNIT as f64) as usize;
        let raw: Vec<f64> = (0..=steps)
            .map(|i| {
                let r = CHI_R_MIN + i as f64 / CHI_STEPS_PER_UNIT as f64;
                let rational: f64 = fractions
                    .iter()
                    .map(|f| lorentz(r, f.value()) / (f.q * f.q) as f64)
                    .sum();
                let golden: f64 = phi_powers.iter().map(|&c| lorentz(r, c)).sum();
                rational + cfg.chi_phi_weight * golden
            })
            .collect();
        let peak = raw.iter().copied().fold(f64::MIN_POSITIVE, f64::max);

        Self {
            entries: raw.iter().map(|v| Fixed::from_f64(v / peak)).collect(),
            attractor_max: Fixed::from_f64(cfg.chi_attractor_max),
            boundary_min: Fixed::from_f64(cfg.chi_boundary_min),
        }
    }

    /// χ at ratio r, clamped to the table edges.
    pub fn chi(&self, r: Fixed) -> Fixed {
        let offset = r.raw() - Fixed::from_f64(CHI_R_MIN).raw();
        let last = self.entries.len() - 1;
        if offset <= 0 {
            return self.entries[0];
        }
        let shift = Fixed::FRAC_BITS - CHI_STEPS_PER_UNIT.trailing_zeros();
        let idx = (offset >> shift) as usize;
        if idx >= last {
            return self.entries[last];
        }
        let weight = Fixed::from_raw((offset & ((1 << shift) - 1)) << (Fixed::FRAC_BITS - shift));
        self.entries[idx].lerp(self.entries[idx + 1], weight)
    }

    pub fn regime(&self, chi: Fixed) -> CouplingRegime {
        if chi < self.attractor_max {
            CouplingRegime::Attractor
        } else if chi > self.boundary_min {
            CouplingRegime::Boundary
        } else {
            CouplingRegime::Transition
        }
    }

    /// Phase-amplitude coupling strength χ(f_fast/f_slow)·A_slow·A_fast.
    pub fn pac_strength(&self, ratio: Fixed, amp_slow: Fixed, amp_fast: Fixed) -> Fixed {
        self.chi(ratio) * amp_slow * amp_fast
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChiTable {
    fn default() -> Self {
        Self::new(&LandscapeConfig::default())
    }
}
