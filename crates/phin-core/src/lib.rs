// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Simulation Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! The resettable simulation aggregate that owns every oscillator, the
//! resonance engine, the landscape and the phase memory, and advances
//! them on one synchronous tick.
//!
//! # Tick invariants
//!
//! 1. **Double buffering**: every oscillator is advanced from the
//!    previous tick's snapshot into a second buffer; the buffers swap
//!    once all 21 are done. No oscillator ever sees a neighbour's
//!    current-tick value.
//!
//! 2. **Fixed order**: oscillators → coherence and landscape → offset
//!    integration → memory gate. Memory feedback lands on the next tick.
//!
//! 3. **Determinism**: identical configuration and inputs after a reset
//!    reproduce identical reports, with or without the `parallel`
//!    feature.

pub mod simulation;
pub mod tick;
pub mod topology;

pub use simulation::Simulation;
pub use tick::{OscillatorReport, PacReport, TickInputs, TickReport};
pub use topology::{PacPair, TopologyConfig};
