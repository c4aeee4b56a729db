// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Associative Phase Memory
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Small symmetric Hebbian memory written at theta peaks, read at
//! theta troughs and decayed during idle troughs.

pub mod fsm;
pub mod gate;
pub mod weights;

pub use fsm::{MemoryState, MemoryStatus, PhaseMemory};
pub use gate::{GatePhase, GateSample, GateTracker};
pub use weights::{pattern_mask, PhaseWeightMatrix};
