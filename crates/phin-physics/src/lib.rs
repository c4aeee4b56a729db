// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Oscillator Physics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Hopf oscillator primitive (explicit Euler with amplitude correction)
//! and the canonical 21-oscillator roster of the φⁿ architecture.

pub mod oscillator;
pub mod params;

pub use oscillator::{Advance, Drive, HopfIntegrator, OscillatorParams, OscillatorState};
pub use params::{
    hz_to_omega, omega_to_hz, Column, Layer, OscillatorSpec, Role, N_OSCILLATORS, PHI, ROSTER,
    THETA,
};
