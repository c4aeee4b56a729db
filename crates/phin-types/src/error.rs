// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for structural kernel failures.
///
/// Numeric edge conditions (amplitude overflow, ratio singularities,
/// out-of-range per-tick inputs) are never errors: they are corrected
/// or saturated in place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhinError {
    /// Configuration rejected at construction time.
    #[error("config error: {0}")]
    Config(String),

    /// A per-tick input vector has the wrong length.
    #[error("dimension mismatch for {what}: expected {expected}, got {got}")]
    Dimension {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// An oscillator index outside the roster.
    #[error("unknown oscillator index {index} (roster has {len})")]
    UnknownOscillator { index: usize, len: usize },
}

pub type PhinResult<T> = Result<T, PhinError>;

impl PhinError {
    /// Shorthand for a length check on per-tick inputs.
    pub fn check_len(what: &'static str, expected: usize, got: usize) -> PhinResult<()> {
        if expected != got {
            return Err(PhinError::Dimension {
                what,
                expected,
                got,
            });
        }
        Ok(())
    }
}
