// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Resonance Coupling
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Phase coherence between internal and field-driven oscillators, and
//! the gated aggregate gain derived from it.

pub mod coherence;
pub mod engine;
pub mod gain;

pub use coherence::{coherence, CoherenceRamp, RunningCoherence};
pub use engine::{PairReport, PairSpec, ResonanceEngine, ResonanceOutput};
pub use gain::{aggregate_gain, QuietGate};
