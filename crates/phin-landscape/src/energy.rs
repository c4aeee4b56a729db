// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Energy Landscape (f64 reference)
// ─────────────────────────────────────────────────────────────────────
//! Two-term potential over the position n = log_φ(f / f_ref):
//!
//!   E(n) = A·cos(2πn) + Σ_{p/q, q ≤ Q} (B/q²) / ((φⁿ - p/q)² + ε)
//!
//! The cosine term has its wells at half-integer n. The rational sum
//! raises a barrier wherever the frequency ratio φⁿ sits on a low-order
//! fraction. Force is F = -dE/dn.
//!
//! Evaluated in f64 only when the fixed-point tables are built, and by
//! tests as the reference the tables are checked against.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use phin_physics::params::{LN_PHI, PHI};
use phin_types::LandscapeConfig;

/// Position range covered by the precomputed tables.
pub const N_MIN: f64 = -2.0;
pub const N_MAX: f64 = 5.0;

/// Reduced fraction p/q.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rational {
    pub p: u32,
    pub q: u32,
}

impl Rational {
    pub fn value(self) -> f64 {
        self.p as f64 / self.q as f64
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Reduced fractions with `q ≤ max_q` and value in `[lo, hi]`, sorted
/// by value (a Farey-style enumeration, unbounded above 1).
pub fn rationals(max_q: u32, lo: f64, hi: f64) -> Vec<Rational> {
    let mut out = Vec::new();
    for q in 1..=max_q {
        let p_lo = (lo * q as f64).ceil().max(1.0) as u32;
        let p_hi = (hi * q as f64).floor().max(0.0) as u32;
        for p in p_lo..=p_hi {
            if gcd(p, q) == 1 {
                out.push(Rational { p, q });
            }
        }
    }
    out.sort_by(|a, b| a.value().total_cmp(&b.value()));
    out
}

/// Continuous f64 model of the landscape.
#[derive(Debug, Clone)]
pub struct EnergyModel {
    attractor_depth: f64,
    rational_weight: f64,
    eps: f64,
    rationals: Vec<Rational>,
}

impl EnergyModel {
    pub fn new(cfg: &LandscapeConfig) -> Self {
        Self {
            attractor_depth: cfg.attractor_depth,
            rational_weight: cfg.rational_weight,
            eps: cfg.eps,
            rationals: rationals(cfg.rational_max_q, PHI.powf(N_MIN), PHI.powf(N_MAX) + 1.0),
        }
    }

    pub fn rationals(&self) -> &[Rational] {
        &self.rationals
    }

    pub fn energy(&self, n: f64) -> f64 {
        let x = PHI.powf(n);
        let barrier: f64 = self
            .rationals
            .iter()
            .map(|r| {
                let q2 = (r.q * r.q) as f64;
                let d = x - r.value();
                (self.rational_weight / q2) / (d * d + self.eps)
            })
            .sum();
        self.attractor_depth * (TAU * n).cos() + barrier
    }

    /// -d/dn of the cosine term: 2πA·sin(2πn).
    pub fn attractor_force(&self, n: f64) -> f64 {
        TAU * self.attractor_depth * (TAU * n).sin()
    }

    /// -d/dn of the rational sum. Each term pushes φⁿ away from its p/q.
    pub fn rational_force(&self, n: f64) -> f64 {
        let x = PHI.powf(n);
        self.rationals
            .iter()
            .map(|r| {
                let q2 = (r.q * r.q) as f64;
                let d = x - r.value();
                let den = d * d + self.eps;
                (self.rational_weight / q2) * 2.0 * d * x * LN_PHI / (den * den)
            })
            .sum()
    }

    pub fn force(&self, n: f64) -> f64 {
        self.attractor_force(n) + self.rational_force(n)
    }
}
