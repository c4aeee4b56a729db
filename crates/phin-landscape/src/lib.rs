// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Potential Landscape
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Position of each oscillator on the φⁿ frequency landscape, the
//! restoring/repulsive force toward half-integer attractors, and the
//! coupling susceptibility χ used for regime classification and PAC.

pub mod energy;
pub mod force;
pub mod landscape;
pub mod position;
pub mod susceptibility;

pub use energy::{rationals, EnergyModel, Rational};
pub use force::{ForceComponents, ForceModel};
pub use landscape::{Landscape, LandscapePosition};
pub use position::{catastrophe_centres, classify, stability_score, LogPhiTable, PositionClass};
pub use susceptibility::{ChiTable, CouplingRegime};
