// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────
//! Numeric parameters for the oscillator and coupling engine.
//!
//! Values are stored in human units (Hz, amplitudes, thresholds as
//! fractions of full scale) and converted once to fixed point when the
//! components are built. Per-tick inputs (growth rates, field samples,
//! drift) are not validated here; the kernel only saturates them.

use serde::{Deserialize, Serialize};

use crate::error::{PhinError, PhinResult};

/// Oscillator primitive and frequency-offset integrator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorConfig {
    /// Target limit-cycle amplitude. Default: 1.0.
    pub target_amplitude: f64,
    /// Correction fires when r² exceeds `margin × target²`. Default: 1.0625.
    pub correction_margin: f64,
    /// Growth rate (raw Q4.14, per tick) used until the state table
    /// supplies one. Raw 4 gives the unit limit cycle. Default: 4.
    pub nominal_growth_raw: i32,
    /// Frequency-offset excursion limit. Default: 1.5 Hz.
    pub max_offset_hz: f64,
    /// Offset change per tick per unit of landscape force. Default: 0.0005 Hz.
    pub force_gain_hz: f64,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            target_amplitude: 1.0,
            correction_margin: 1.0625,
            nominal_growth_raw: 4,
            max_offset_hz: 1.5,
            force_gain_hz: 0.0005,
        }
    }
}

/// Resonance coupling engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResonanceConfig {
    /// Coherence below this gives factor 0. Default: 0.5.
    pub coherence_low: f64,
    /// Coherence at or above this gives factor 1. Default: 1.0.
    pub coherence_high: f64,
    /// Busy-oscillator amplitude at or below which the gate is fully open.
    /// Default: 0.75.
    pub quiet_floor: f64,
    /// Busy-oscillator amplitude at which the gate closes. Default: 1.25.
    pub quiet_threshold: f64,
    /// Weight applied to the summed pair gains. Default: 0.2.
    pub pair_weight: f64,
    /// Aggregate gain ceiling. Default: 2.0.
    pub max_gain: f64,
    /// Low-pass shift for the running coherence (0 = instantaneous).
    /// Default: 5.
    pub smoothing_shift: u32,
    /// Scale applied to field samples before they drive the external
    /// oscillators. Default: 1.0.
    pub field_gain: f64,
}

impl Default for ResonanceConfig {
    fn default() -> Self {
        Self {
            coherence_low: 0.5,
            coherence_high: 1.0,
            quiet_floor: 0.75,
            quiet_threshold: 1.25,
            pair_weight: 0.2,
            max_gain: 2.0,
            smoothing_shift: 5,
            field_gain: 1.0,
        }
    }
}

/// Potential landscape and coupling-susceptibility parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeConfig {
    /// Reference frequency for n = log_φ(f / f_ref). Default: 7.49 Hz.
    pub reference_hz: f64,
    /// Cosine well depth A. Default: 0.1.
    pub attractor_depth: f64,
    /// Rational repulsion base weight B (divided by q²). Default: 0.0005.
    pub rational_weight: f64,
    /// Highest denominator in the energy's rational sum. Default: 3.
    pub rational_max_q: u32,
    /// Regulariser in every Lorentzian denominator. Default: 0.01.
    pub eps: f64,
    /// Constant repulsion magnitude inside a catastrophe zone. Default: 1.0.
    pub zone_force: f64,
    /// Half-width (in n) of each catastrophe zone. Default: 0.04.
    pub zone_half_width: f64,
    /// Clamp on the per-rational gradient term. Default: 0.5.
    pub rational_force_cap: f64,
    /// Clamp on the total force. Default: 2.0.
    pub force_limit: f64,
    /// Lorentzian half-width of the chi table. Default: 0.02.
    pub chi_gamma: f64,
    /// Weight of golden-ratio-power peaks in chi. Default: 0.5.
    pub chi_phi_weight: f64,
    /// chi below this is an attractor regime. Default: 0.15.
    pub chi_attractor_max: f64,
    /// chi above this is a boundary regime. Default: 0.3.
    pub chi_boundary_min: f64,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            reference_hz: 7.49,
            attractor_depth: 0.1,
            rational_weight: 0.0005,
            rational_max_q: 3,
            eps: 0.01,
            zone_force: 1.0,
            zone_half_width: 0.04,
            rational_force_cap: 0.5,
            force_limit: 2.0,
            chi_gamma: 0.02,
            chi_phi_weight: 0.5,
            chi_attractor_max: 0.15,
            chi_boundary_min: 0.3,
        }
    }
}

/// Associative phase memory parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Number of memory units N (1..=16). Default: 6.
    pub units: usize,
    /// Weight increment per LEARN. Default: 1.
    pub learn_rate: i16,
    /// Weight saturation magnitude. Default: 15.
    pub weight_max: i16,
    /// Recall fires a unit when its accumulator exceeds this. Default: 2.
    pub recall_threshold: i32,
    /// Weight decrement per DECAY. Default: 1.
    pub decay_rate: i16,
    /// Gating cycles between decays. Default: 8.
    pub decay_period: u32,
    /// Gate enters LEARN above +level and RECALL/DECAY below -level.
    /// Default: 0.75.
    pub gate_level: f64,
    /// DONE states return to IDLE once |gate| drops below this. Default: 0.5.
    pub rearm_level: f64,
    /// Additive bias per recalled bit into its target oscillator. Default: 0.25.
    pub feedback_bias: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            units: 6,
            learn_rate: 1,
            weight_max: 15,
            recall_threshold: 2,
            decay_rate: 1,
            decay_period: 8,
            gate_level: 0.75,
            rearm_level: 0.5,
            feedback_bias: 0.25,
        }
    }
}

/// Top-level kernel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhinConfig {
    /// Tick rate of the synchronous clock. Default: 4000 Hz.
    pub tick_rate_hz: f64,
    pub oscillator: OscillatorConfig,
    pub resonance: ResonanceConfig,
    pub landscape: LandscapeConfig,
    pub memory: MemoryConfig,
}

impl Default for PhinConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 4000.0,
            oscillator: OscillatorConfig::default(),
            resonance: ResonanceConfig::default(),
            landscape: LandscapeConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

fn require(cond: bool, msg: impl FnOnce() -> String) -> PhinResult<()> {
    if cond {
        Ok(())
    } else {
        Err(PhinError::Config(msg()))
    }
}

fn finite(name: &str, v: f64) -> PhinResult<()> {
    require(v.is_finite(), || format!("{name} must be finite, got {v}"))
}

impl OscillatorConfig {
    pub fn validate(&self) -> PhinResult<()> {
        finite("target_amplitude", self.target_amplitude)?;
        require(
            self.target_amplitude > 0.0 && self.target_amplitude <= 2.0,
            || format!("target_amplitude must be in (0, 2], got {}", self.target_amplitude),
        )?;
        require(
            self.correction_margin > 1.0 && self.correction_margin <= 1.5,
            || format!("correction_margin must be in (1, 1.5], got {}", self.correction_margin),
        )?;
        require(self.nominal_growth_raw >= 0, || {
            format!("nominal_growth_raw must be >= 0, got {}", self.nominal_growth_raw)
        })?;
        finite("max_offset_hz", self.max_offset_hz)?;
        require(self.max_offset_hz >= 0.0, || {
            format!("max_offset_hz must be >= 0, got {}", self.max_offset_hz)
        })?;
        finite("force_gain_hz", self.force_gain_hz)?;
        require(self.force_gain_hz >= 0.0, || {
            format!("force_gain_hz must be >= 0, got {}", self.force_gain_hz)
        })
    }
}

impl ResonanceConfig {
    pub fn validate(&self) -> PhinResult<()> {
        require(
            (0.0..1.0).contains(&self.coherence_low)
                && self.coherence_high > self.coherence_low
                && self.coherence_high <= 1.0,
            || {
                format!(
                    "need 0 <= coherence_low < coherence_high <= 1, got {} / {}",
                    self.coherence_low, self.coherence_high
                )
            },
        )?;
        require(
            self.quiet_floor >= 0.0 && self.quiet_threshold > self.quiet_floor,
            || {
                format!(
                    "need 0 <= quiet_floor < quiet_threshold, got {} / {}",
                    self.quiet_floor, self.quiet_threshold
                )
            },
        )?;
        require(self.quiet_threshold < 8.0, || {
            format!("quiet_threshold must be < 8, got {}", self.quiet_threshold)
        })?;
        require(self.pair_weight >= 0.0 && self.pair_weight < 8.0, || {
            format!("pair_weight must be in [0, 8), got {}", self.pair_weight)
        })?;
        require(self.max_gain >= 1.0 && self.max_gain < 8.0, || {
            format!("max_gain must be in [1, 8), got {}", self.max_gain)
        })?;
        require(self.smoothing_shift <= 16, || {
            format!("smoothing_shift must be <= 16, got {}", self.smoothing_shift)
        })?;
        finite("field_gain", self.field_gain)
    }
}

impl LandscapeConfig {
    pub fn validate(&self) -> PhinResult<()> {
        finite("reference_hz", self.reference_hz)?;
        require(self.reference_hz > 0.0, || {
            format!("reference_hz must be > 0, got {}", self.reference_hz)
        })?;
        require(self.eps > 0.0, || format!("eps must be > 0, got {}", self.eps))?;
        require(self.chi_gamma > 0.0, || {
            format!("chi_gamma must be > 0, got {}", self.chi_gamma)
        })?;
        require((1..=5).contains(&self.rational_max_q), || {
            format!("rational_max_q must be in 1..=5, got {}", self.rational_max_q)
        })?;
        require(
            self.zone_half_width > 0.0 && self.zone_half_width < 0.25,
            || format!("zone_half_width must be in (0, 0.25), got {}", self.zone_half_width),
        )?;
        require(
            self.attractor_depth >= 0.0 && self.rational_weight >= 0.0 && self.zone_force >= 0.0,
            || "landscape weights must be non-negative".to_string(),
        )?;
        require(
            self.force_limit > 0.0 && self.force_limit < 8.0 && self.rational_force_cap >= 0.0,
            || {
                format!(
                    "force_limit must be in (0, 8) and rational_force_cap >= 0, got {} / {}",
                    self.force_limit, self.rational_force_cap
                )
            },
        )?;
        require(
            self.chi_attractor_max < self.chi_boundary_min
                && (0.0..=1.0).contains(&self.chi_attractor_max)
                && (0.0..=1.0).contains(&self.chi_boundary_min),
            || {
                format!(
                    "need 0 <= chi_attractor_max < chi_boundary_min <= 1, got {} / {}",
                    self.chi_attractor_max, self.chi_boundary_min
                )
            },
        )
    }
}

impl MemoryConfig {
    /// Largest supported memory (pattern bits fit a `u16`).
    pub const MAX_UNITS: usize = 16;

    pub fn validate(&self) -> PhinResult<()> {
        require((1..=Self::MAX_UNITS).contains(&self.units), || {
            format!("units must be in 1..={}, got {}", Self::MAX_UNITS, self.units)
        })?;
        require(self.learn_rate > 0 && self.weight_max > 0, || {
            format!(
                "learn_rate and weight_max must be > 0, got {} / {}",
                self.learn_rate, self.weight_max
            )
        })?;
        require(self.decay_rate >= 0, || {
            format!("decay_rate must be >= 0, got {}", self.decay_rate)
        })?;
        require(self.decay_period >= 1, || {
            format!("decay_period must be >= 1, got {}", self.decay_period)
        })?;
        require(
            self.gate_level > 0.0 && self.gate_level < 1.0 && self.rearm_level < self.gate_level,
            || {
                format!(
                    "need 0 < rearm_level < gate_level < 1, got {} / {}",
                    self.rearm_level, self.gate_level
                )
            },
        )?;
        require(self.rearm_level > 0.0, || {
            format!("rearm_level must be > 0, got {}", self.rearm_level)
        })?;
        finite("feedback_bias", self.feedback_bias)
    }
}

impl PhinConfig {
    /// Validate every section.
    pub fn validate(&self) -> PhinResult<()> {
        finite("tick_rate_hz", self.tick_rate_hz)?;
        require(self.tick_rate_hz > 0.0, || {
            format!("tick_rate_hz must be > 0, got {}", self.tick_rate_hz)
        })?;
        self.oscillator.validate()?;
        self.resonance.validate()?;
        self.landscape.validate()?;
        self.memory.validate()
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> PhinResult<Self> {
        serde_json::from_str(json).map_err(|e| PhinError::Config(format!("JSON parse error: {e}")))
    }

    pub fn to_json(&self) -> PhinResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PhinError::Config(format!("JSON encode error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(PhinConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let cfg = PhinConfig::from_json(r#"{"resonance": {"max_gain": 1.5}}"#).unwrap();
        assert_eq!(cfg.resonance.max_gain, 1.5);
        assert_eq!(cfg.resonance.coherence_low, 0.5);
        assert_eq!(cfg.memory.units, 6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = PhinConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, PhinError::Config(_)));
    }

    #[test]
    fn test_inverted_coherence_thresholds_rejected() {
        let mut cfg = PhinConfig::default();
        cfg.resonance.coherence_low = 0.9;
        cfg.resonance.coherence_high = 0.6;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_memory_size_limit() {
        let mut cfg = PhinConfig::default();
        cfg.memory.units = 17;
        assert!(cfg.validate().is_err());
        cfg.memory.units = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rearm_must_sit_below_gate() {
        let mut cfg = PhinConfig::default();
        cfg.memory.rearm_level = 0.8;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_non_finite_tick_rate_rejected() {
        let cfg = PhinConfig {
            tick_rate_hz: f64::NAN,
            ..PhinConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let cfg = PhinConfig::default();
        let json = cfg.to_json().unwrap();
        assert_eq!(PhinConfig::from_json(&json).unwrap(), cfg);
    }
}
