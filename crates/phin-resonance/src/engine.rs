// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Resonance Engine
// ─────────────────────────────────────────────────────────────────────
//! Per tick, for every (external → internal) pair:
//!   1. C  = coherence(internal, external), low-passed per pair
//!   2. cf = ramp(C)
//!   3. g  = cf · gate(amplitude of the monitored oscillator)
//!
//! and then the aggregate gain over all pairs. The engine also scales
//! field samples into drive inputs for the external oscillators.

use serde::{Deserialize, Serialize};

use phin_physics::OscillatorState;
use phin_types::{Fixed, PhinError, PhinResult, ResonanceConfig};

use crate::coherence::{coherence, CoherenceRamp, RunningCoherence};
use crate::gain::{aggregate_gain, QuietGate};

/// One field-driven oscillator paired with the internal oscillator it
/// is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSpec {
    pub external: usize,
    pub internal: usize,
}

/// Per-pair values from the most recent update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReport {
    pub external: usize,
    pub internal: usize,
    /// Instantaneous coherence this tick.
    pub instantaneous: Fixed,
    /// Low-passed coherence, the value the ramp sees.
    pub coherence: Fixed,
    pub factor: Fixed,
    pub gain: Fixed,
}

/// Engine-wide result of one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResonanceOutput {
    pub gate: Fixed,
    pub aggregate: Fixed,
}

impl Default for ResonanceOutput {
    fn default() -> Self {
        Self {
            gate: Fixed::ONE,
            aggregate: Fixed::ONE,
        }
    }
}

pub struct ResonanceEngine {
    pairs: Vec<PairSpec>,
    running: Vec<RunningCoherence>,
    reports: Vec<PairReport>,
    ramp: CoherenceRamp,
    gate: QuietGate,
    gate_oscillator: usize,
    pair_weight: Fixed,
    max_gain: Fixed,
    smoothing_shift: u32,
    field_gain: Fixed,
}

impl ResonanceEngine {
    /// Build an engine over `n_oscillators` states. Every index in
    /// `pairs` and `gate_oscillator` must be below `n_oscillators`.
    pub fn new(
        cfg: &ResonanceConfig,
        pairs: Vec<PairSpec>,
        gate_oscillator: usize,
        n_oscillators: usize,
    ) -> PhinResult<Self> {
        cfg.validate()?;
        let check = |index: usize| {
            if index < n_oscillators {
                Ok(())
            } else {
                Err(PhinError::UnknownOscillator {
                    index,
                    len: n_oscillators,
                })
            }
        };
        check(gate_oscillator)?;
        for p in &pairs {
            check(p.external)?;
            check(p.internal)?;
            if p.external == p.internal {
                return Err(PhinError::Config(format!(
                    "resonance pair pairs oscillator {} with itself",
                    p.external
                )));
            }
        }
        log::debug!(
            "resonance engine: {} pairs, gate oscillator {gate_oscillator}",
            pairs.len()
        );

        let reports = pairs
            .iter()
            .map(|p| PairReport {
                external: p.external,
                internal: p.internal,
                ..PairReport::default()
            })
            .collect();
        Ok(Self {
            running: vec![RunningCoherence::default(); pairs.len()],
            reports,
            pairs,
            ramp: CoherenceRamp::new(cfg.coherence_low, cfg.coherence_high),
            gate: QuietGate::new(cfg.quiet_floor, cfg.quiet_threshold),
            gate_oscillator,
            pair_weight: Fixed::from_f64(cfg.pair_weight),
            max_gain: Fixed::from_f64(cfg.max_gain),
            smoothing_shift: cfg.smoothing_shift,
            field_gain: Fixed::from_f64(cfg.field_gain),
        })
    }

    pub fn n_pairs(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[PairSpec] {
        &self.pairs
    }

    pub fn gate_oscillator(&self) -> usize {
        self.gate_oscillator
    }

    /// Drive inputs `(external index, field · field_gain)`, one per pair.
    pub fn field_inputs(&self, field: &[Fixed]) -> PhinResult<Vec<(usize, Fixed)>> {
        PhinError::check_len("field samples", self.pairs.len(), field.len())?;
        Ok(self
            .pairs
            .iter()
            .zip(field)
            .map(|(p, &s)| (p.external, s * self.field_gain))
            .collect())
    }

    /// Recompute every pair from the committed oscillator snapshot.
    pub fn update(&mut self, states: &[OscillatorState]) -> ResonanceOutput {
        let gate = states
            .get(self.gate_oscillator)
            .map_or(Fixed::ONE, |s| self.gate.factor(s.amplitude));

        for ((pair, running), report) in self
            .pairs
            .iter()
            .zip(self.running.iter_mut())
            .zip(self.reports.iter_mut())
        {
            let (Some(a), Some(b)) = (states.get(pair.internal), states.get(pair.external)) else {
                continue;
            };
            let inst = coherence(a.x, a.y, b.x, b.y);
            let smoothed = running.update(inst, self.smoothing_shift);
            let factor = self.ramp.factor(smoothed);
            *report = PairReport {
                external: pair.external,
                internal: pair.internal,
                instantaneous: inst,
                coherence: smoothed,
                factor,
                gain: factor * gate,
            };
        }

        let aggregate = aggregate_gain(
            self.reports.iter().map(|r| r.gain),
            self.pair_weight,
            self.max_gain,
        );
        ResonanceOutput { gate, aggregate }
    }

    pub fn reports(&self) -> &[PairReport] {
        &self.reports
    }

    pub fn reset(&mut self) {
        self.running.iter_mut().for_each(RunningCoherence::reset);
        for r in &mut self.reports {
            *r = PairReport {
                external: r.external,
                internal: r.internal,
                ..PairReport::default()
            };
        }
    }
}
