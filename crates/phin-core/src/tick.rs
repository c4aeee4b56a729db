// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Tick Inputs and Reports
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use phin_landscape::LandscapePosition;
use phin_memory::MemoryStatus;
use phin_resonance::PairReport;
use phin_types::{Fixed, PhinError, PhinResult, Wide};

/// Everything the outside world supplies for one tick.
///
/// Empty vectors mean "none this tick": silence on the field, no drift,
/// no noise. Non-empty vectors must have their full length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInputs {
    /// One sample per resonance pair.
    pub field: Vec<Fixed>,
    /// Per-oscillator frequency-offset increment (per-tick angular units).
    pub drift: Vec<Wide>,
    /// Per-oscillator noise, added to dx only.
    pub noise: Vec<Fixed>,
    /// Memory input pattern, bit i = unit i.
    pub pattern: u16,
    /// Reinitialise all state before this tick runs.
    pub reset: bool,
}

impl TickInputs {
    pub fn with_field(field: Vec<Fixed>) -> Self {
        Self {
            field,
            ..Self::default()
        }
    }

    pub fn with_pattern(pattern: u16) -> Self {
        Self {
            pattern,
            ..Self::default()
        }
    }

    /// Length checks against `n_pairs` field samples and `n_oscillators`
    /// drift/noise entries.
    pub fn validate(&self, n_pairs: usize, n_oscillators: usize) -> PhinResult<()> {
        if !self.field.is_empty() {
            PhinError::check_len("field samples", n_pairs, self.field.len())?;
        }
        if !self.drift.is_empty() {
            PhinError::check_len("drift increments", n_oscillators, self.drift.len())?;
        }
        if !self.noise.is_empty() {
            PhinError::check_len("noise samples", n_oscillators, self.noise.len())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorReport {
    pub x: Fixed,
    pub y: Fixed,
    pub amplitude: Fixed,
    /// Base frequency plus the current offset.
    pub frequency_hz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacReport {
    pub slow: usize,
    pub fast: usize,
    pub strength: Fixed,
}

/// Observable outputs of one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Ticks since the last reset, starting at 0.
    pub tick: u64,
    pub oscillators: Vec<OscillatorReport>,
    pub pairs: Vec<PairReport>,
    pub gate_factor: Fixed,
    pub aggregate_gain: Fixed,
    pub landscape: Vec<LandscapePosition>,
    pub pac: Vec<PacReport>,
    pub memory: MemoryStatus,
    /// Oscillators whose amplitude correction fired this tick.
    pub corrections: usize,
}

impl TickReport {
    pub fn to_json(&self) -> PhinResult<String> {
        serde_json::to_string(self)
            .map_err(|e| PhinError::Config(format!("report encode error: {e}")))
    }

    pub fn max_amplitude(&self) -> Fixed {
        self.oscillators
            .iter()
            .map(|o| o.amplitude)
            .max()
            .unwrap_or(Fixed::ZERO)
    }
}
