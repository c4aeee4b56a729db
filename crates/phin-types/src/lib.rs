// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Fixed-point numerics, configuration, and error hierarchy shared by
//! every crate of the φⁿ oscillator kernel.

pub mod config;
pub mod error;
pub mod fixed;

pub use config::{LandscapeConfig, MemoryConfig, OscillatorConfig, PhinConfig, ResonanceConfig};
pub use error::{PhinError, PhinResult};
pub use fixed::{Fixed, Wide};
