// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Canonical Parameters
// ─────────────────────────────────────────────────────────────────────
//! Oscillator roster, golden-ratio constants, and Hz ↔ per-tick
//! angular-frequency conversion.
//!
//! Internal oscillators sit at `f_ref · φⁿ` with `f_ref = 7.49 Hz`:
//! thalamic theta at n = -0.5 and five cortical layers per column at
//! n = 0.5, 1.5, 2.5, 3.0, 3.5. The five external oscillators track
//! the Schumann resonance harmonics and are driven by field samples.

use serde::{Deserialize, Serialize};

use phin_types::Wide;

/// Golden ratio φ.
pub const PHI: f64 = 1.618_033_988_749_895;

/// ln φ, the scale between log_φ and the natural logarithm.
pub const LN_PHI: f64 = 0.481_211_825_059_603_4;

/// Synchronous tick rate of the reference design (Hz).
pub const TICK_RATE_HZ: f64 = 4000.0;

pub const N_OSCILLATORS: usize = 21;
pub const N_SR_HARMONICS: usize = 5;
pub const N_COLUMNS: usize = 3;
pub const N_LAYERS: usize = 5;

pub const THETA: usize = 0;
pub const SR_F0: usize = 1;

/// Index of the i-th Schumann harmonic oscillator.
pub const fn sr(harmonic: usize) -> usize {
    SR_F0 + harmonic
}

/// Whether an oscillator belongs to the modelled network or follows
/// the external field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Internal,
    External,
}

/// Cortical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Sensory,
    Assoc,
    Motor,
}

impl Column {
    pub const ALL: [Column; N_COLUMNS] = [Column::Sensory, Column::Assoc, Column::Motor];
}

/// Cortical layer, each pinned to a φ-exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    L6,
    L5a,
    L5b,
    L4,
    L23,
}

impl Layer {
    pub const ALL: [Layer; N_LAYERS] = [Layer::L6, Layer::L5a, Layer::L5b, Layer::L4, Layer::L23];

    /// Position n on the φ landscape.
    pub fn phi_exponent(self) -> f64 {
        match self {
            Layer::L6 => 0.5,
            Layer::L5a => 1.5,
            Layer::L5b => 2.5,
            Layer::L4 => 3.0,
            Layer::L23 => 3.5,
        }
    }
}

/// Roster index of a cortical oscillator.
pub const fn cortical(column: Column, layer: Layer) -> usize {
    SR_F0 + N_SR_HARMONICS + (column as usize) * N_LAYERS + layer as usize
}

/// Static description of one oscillator instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OscillatorSpec {
    pub name: &'static str,
    pub role: Role,
    /// Natural frequency before any offset (Hz).
    pub base_hz: f64,
}

const fn internal(name: &'static str, base_hz: f64) -> OscillatorSpec {
    OscillatorSpec {
        name,
        role: Role::Internal,
        base_hz,
    }
}

const fn external(name: &'static str, base_hz: f64) -> OscillatorSpec {
    OscillatorSpec {
        name,
        role: Role::External,
        base_hz,
    }
}

/// Canonical roster, indexed as documented by `THETA`, `sr()`, `cortical()`.
pub const ROSTER: [OscillatorSpec; N_OSCILLATORS] = [
    internal("theta", 5.89), // φ^-0.5
    external("sr_f0", 7.6),
    external("sr_f1", 13.75),
    external("sr_f2", 20.0), // bridging mode, no φ attractor
    external("sr_f3", 25.0),
    external("sr_f4", 32.0),
    internal("sensory_l6", 9.53),   // φ^0.5
    internal("sensory_l5a", 15.42), // φ^1.5
    internal("sensory_l5b", 24.94), // φ^2.5
    internal("sensory_l4", 31.73),  // φ^3
    internal("sensory_l23", 40.36), // φ^3.5
    internal("assoc_l6", 9.53),
    internal("assoc_l5a", 15.42),
    internal("assoc_l5b", 24.94),
    internal("assoc_l4", 31.73),
    internal("assoc_l23", 40.36),
    internal("motor_l6", 9.53),
    internal("motor_l5a", 15.42),
    internal("motor_l5b", 24.94),
    internal("motor_l4", 31.73),
    internal("motor_l23", 40.36),
];

/// Look up a roster index by name.
pub fn index_of(name: &str) -> Option<usize> {
    ROSTER.iter().position(|s| s.name == name)
}

/// Per-tick angular increment ω·dt for a frequency in Hz.
pub fn hz_to_omega(hz: f64, tick_rate_hz: f64) -> Wide {
    Wide::from_f64(std::f64::consts::TAU * hz / tick_rate_hz)
}

/// Inverse of [`hz_to_omega`].
pub fn omega_to_hz(omega: Wide, tick_rate_hz: f64) -> f64 {
    omega.to_f64() * tick_rate_hz / std::f64::consts::TAU
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_length() {
        assert_eq!(ROSTER.len(), N_OSCILLATORS);
    }

    #[test]
    fn test_indices() {
        assert_eq!(ROSTER[THETA].name, "theta");
        assert_eq!(ROSTER[sr(4)].name, "sr_f4");
        assert_eq!(ROSTER[cortical(Column::Sensory, Layer::L6)].name, "sensory_l6");
        assert_eq!(ROSTER[cortical(Column::Motor, Layer::L23)].name, "motor_l23");
        assert_eq!(cortical(Column::Motor, Layer::L23), N_OSCILLATORS - 1);
    }

    #[test]
    fn test_internal_frequencies_follow_phi_powers() {
        let f_ref = 7.49;
        for column in Column::ALL {
            for layer in Layer::ALL {
                let spec = ROSTER[cortical(column, layer)];
                let expected = f_ref * PHI.powf(layer.phi_exponent());
                assert!(
                    (spec.base_hz - expected).abs() / expected < 0.01,
                    "{}: {} vs {expected}",
                    spec.name,
                    spec.base_hz
                );
            }
        }
        let theta = f_ref * PHI.powf(-0.5);
        assert!((ROSTER[THETA].base_hz - theta).abs() / theta < 0.01);
    }

    #[test]
    fn test_external_roles() {
        for h in 0..N_SR_HARMONICS {
            assert_eq!(ROSTER[sr(h)].role, Role::External);
        }
        assert_eq!(ROSTER.iter().filter(|s| s.role == Role::External).count(), 5);
    }

    #[test]
    fn test_ln_phi() {
        assert!((PHI.ln() - LN_PHI).abs() < 1e-15);
    }

    #[test]
    fn test_hz_omega_roundtrip() {
        let w = hz_to_omega(40.36, TICK_RATE_HZ);
        assert!((omega_to_hz(w, TICK_RATE_HZ) - 40.36).abs() < 1e-6);
        assert!((w.to_f64() - 0.063397).abs() < 1e-5);
    }

    #[test]
    fn test_index_of() {
        assert_eq!(index_of("assoc_l5b"), Some(13));
        assert_eq!(index_of("nope"), None);
    }
}
