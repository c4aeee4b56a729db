// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Landscape Position
// ─────────────────────────────────────────────────────────────────────
//! n = log_φ(f / f_ref) without a general logarithm at tick time:
//!
//!   1. divide (or multiply) the ratio by φ until it lies in [1, φ),
//!      counting the steps k;
//!   2. look the mantissa up in a 256-entry table of log_φ over [1, φ)
//!      with linear interpolation.
//!
//! Classification by the distance d = |frac(n) - ½| from the nearest
//! half-integer well, with catastrophe zones taking precedence.

use serde::{Deserialize, Serialize};

use phin_physics::params::{LN_PHI, PHI};
use phin_types::{Fixed, Wide};

pub const LOG_TABLE_BITS: u32 = 8;
pub const LOG_TABLE_SIZE: usize = 1 << LOG_TABLE_BITS;

/// Bounds the normalisation loop; ratios beyond φ^±16 saturate.
const MAX_OCTAVES: i32 = 16;

/// log_φ of the integer ratios whose neighbourhoods are unstable.
pub fn catastrophe_centres() -> [f64; 3] {
    [2.0, 3.0, 4.0].map(|r: f64| r.ln() / LN_PHI)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionClass {
    IntegerBoundary,
    HalfInteger,
    QuarterInteger,
    NearCatastrophe,
}

/// Fractional part of n in [0, 1).
pub fn frac(n: Fixed) -> Fixed {
    Fixed::from_raw(n.raw() & (Fixed::SCALE - 1))
}

/// |frac(n) - ½|, in [0, ½].
pub fn well_distance(n: Fixed) -> Fixed {
    (frac(n) - Fixed::HALF).abs()
}

/// `clamp(1 - 2d, 0, 1)`: 1 at a half-integer, 0 at an integer.
pub fn stability_score(n: Fixed) -> Fixed {
    (Fixed::ONE - well_distance(n).mul_int(2)).clamp(Fixed::ZERO, Fixed::ONE)
}

/// Class for a position outside every catastrophe zone.
pub fn classify(n: Fixed) -> PositionClass {
    let d = well_distance(n);
    if d < Fixed::from_raw(Fixed::SCALE / 8) {
        PositionClass::HalfInteger
    } else if d < Fixed::from_raw(3 * Fixed::SCALE / 8) {
        PositionClass::QuarterInteger
    } else {
        PositionClass::IntegerBoundary
    }
}

/// Table-driven log_φ over Q28 ratios.
#[derive(Debug, Clone)]
pub struct LogPhiTable {
    /// log_φ(1 + i·(φ-1)/256) for i in 0..=256.
    entries: Vec<Fixed>,
    phi: Wide,
    phi_minus_one: Wide,
}

impl LogPhiTable {
    pub fn new() -> Self {
        let entries = (0..=LOG_TABLE_SIZE)
            .map(|i| {
                let m = 1.0 + (PHI - 1.0) * i as f64 / LOG_TABLE_SIZE as f64;
                Fixed::from_f64(m.ln() / LN_PHI)
            })
            .collect();
        Self {
            entries,
            phi: Wide::from_f64(PHI),
            phi_minus_one: Wide::from_f64(PHI - 1.0),
        }
    }

    /// log_φ of a positive Q28 ratio. Non-positive ratios give `Fixed::MIN`.
    pub fn log_phi(&self, ratio: Wide) -> Fixed {
        if ratio <= Wide::ZERO {
            return Fixed::MIN;
        }
        let mut m = ratio;
        let mut k: i32 = 0;
        while m >= self.phi && k < MAX_OCTAVES {
            m = m.div_wide(self.phi);
            k += 1;
        }
        while m < Wide::ONE && k > -MAX_OCTAVES {
            m = m.mul_wide(self.phi);
            k -= 1;
        }

        // position in [0, 256) with 14 fractional bits
        let t = (m - Wide::ONE).div_wide(self.phi_minus_one);
        let scaled = t.raw().clamp(0, Wide::ONE.raw() - 1) << LOG_TABLE_BITS;
        let shift = Wide::FRAC_BITS - Fixed::FRAC_BITS;
        let idx = (scaled >> Wide::FRAC_BITS) as usize;
        let weight = Fixed::from_raw(((scaled & (Wide::ONE.raw() - 1)) >> shift) as i32);
        let lo = self.entries[idx.min(LOG_TABLE_SIZE)];
        let hi = self.entries[(idx + 1).min(LOG_TABLE_SIZE)];
        Fixed::from_int(k) + lo.lerp(hi, weight)
    }
}

impl Default for LogPhiTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Fixed {
        Fixed::from_f64(v)
    }

    #[test]
    fn test_log_phi_of_phi_powers() {
        let table = LogPhiTable::new();
        for k in -2..=4 {
            let got = table.log_phi(Wide::from_f64(PHI.powi(k)));
            assert!((got.to_f64() - k as f64).abs() < 1e-3, "k={k} got={got}");
        }
    }

    #[test]
    fn test_log_phi_matches_ln() {
        let table = LogPhiTable::new();
        for &r in &[0.786, 1.272, 2.0, 3.0, 4.236, 5.389, 6.85] {
            let got = table.log_phi(Wide::from_f64(r)).to_f64();
            let want = r.ln() / LN_PHI;
            assert!((got - want).abs() < 2e-3, "r={r} got={got} want={want}");
        }
    }

    #[test]
    fn test_log_phi_non_positive() {
        let table = LogPhiTable::new();
        assert_eq!(table.log_phi(Wide::ZERO), Fixed::MIN);
        assert_eq!(table.log_phi(Wide::from_f64(-1.0)), Fixed::MIN);
    }

    #[test]
    fn test_frac_of_negative_position() {
        assert_eq!(frac(n(-0.25)), n(0.75));
        assert_eq!(frac(n(2.5)), Fixed::HALF);
    }

    #[test]
    fn test_classification_bands() {
        assert_eq!(classify(n(0.5)), PositionClass::HalfInteger);
        assert_eq!(classify(n(1.45)), PositionClass::HalfInteger);
        assert_eq!(classify(n(2.25)), PositionClass::QuarterInteger);
        assert_eq!(classify(n(3.0)), PositionClass::IntegerBoundary);
        assert_eq!(classify(n(2.95)), PositionClass::IntegerBoundary);
        assert_eq!(classify(n(-0.5)), PositionClass::HalfInteger);
    }

    #[test]
    fn test_stability_score_is_highest_at_wells() {
        assert_eq!(stability_score(n(1.5)), Fixed::ONE);
        assert_eq!(stability_score(n(2.0)), Fixed::ZERO);
        let quarter = stability_score(n(0.25));
        assert!((quarter.to_f64() - 0.5).abs() < 1e-3);
        assert!(stability_score(n(0.45)) > stability_score(n(0.3)));
    }

    #[test]
    fn test_catastrophe_centres() {
        let c = catastrophe_centres();
        assert!((c[0] - 1.4404).abs() < 1e-3);
        assert!((c[1] - 2.2830).abs() < 1e-3);
        assert!((c[2] - 2.8808).abs() < 1e-3);
    }
}
