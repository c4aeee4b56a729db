// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Simulation Aggregate
// ─────────────────────────────────────────────────────────────────────
//! One tick:
//!
//!   1. drives     memory feedback + scaled field (externals) + noise
//!   2. advance    every oscillator, snapshot → back buffer, then swap
//!   3. resonance  per-pair coherence, gate, aggregate gain
//!   4. landscape  position/force of every oscillator at ω + Δω
//!   5. offsets    Δω += F·k + drift (internal), Δω += drift (external),
//!                 clamped to ±max_offset
//!   6. PAC        χ(ratio)·A_slow·A_fast for each configured pair
//!   7. memory     gate on the gating oscillator's x, pattern in
//!   8. feedback   bias per recalled bit, applied on the next tick
//!
//! Reset restores the documented vector: x = 0.5·target, y = 0,
//! offsets 0, weights 0, coherence 0. Growth rates are inputs, not
//! state, and survive a reset.

use phin_landscape::{Landscape, LandscapePosition};
use phin_memory::{PhaseMemory, PhaseWeightMatrix};
use phin_physics::params::{hz_to_omega, omega_to_hz, Role, N_OSCILLATORS, ROSTER};
use phin_physics::{Drive, HopfIntegrator, OscillatorParams, OscillatorState};
use phin_resonance::ResonanceEngine;
use phin_types::{Fixed, PhinConfig, PhinError, PhinResult, Wide};

use crate::tick::{OscillatorReport, PacReport, TickInputs, TickReport};
use crate::topology::TopologyConfig;

pub struct Simulation {
    config: PhinConfig,
    topology: TopologyConfig,
    integrator: HopfIntegrator,
    params: Vec<OscillatorParams>,
    current: Vec<OscillatorState>,
    next: Vec<OscillatorState>,
    drives: Vec<Drive>,
    feedback: Vec<Fixed>,
    resonance: ResonanceEngine,
    landscape: Landscape,
    memory: PhaseMemory,
    force_gain: Wide,
    max_offset: Wide,
    feedback_bias: Fixed,
    tick: u64,
}

impl Simulation {
    pub fn new(config: PhinConfig, topology: TopologyConfig) -> PhinResult<Self> {
        config.validate()?;
        topology.validate(config.memory.units)?;

        let integrator = HopfIntegrator::from_config(&config.oscillator);
        let growth = Fixed::from_raw(config.oscillator.nominal_growth_raw);
        let params = ROSTER
            .iter()
            .map(|spec| OscillatorParams {
                base_omega: hz_to_omega(spec.base_hz, config.tick_rate_hz),
                growth,
            })
            .collect();
        let resonance = ResonanceEngine::new(
            &config.resonance,
            topology.pairs.clone(),
            topology.gate_oscillator,
            N_OSCILLATORS,
        )?;
        let landscape = Landscape::new(&config.landscape, config.tick_rate_hz)?;
        let memory = PhaseMemory::new(&config.memory)?;
        let seed = integrator.seed();

        log::debug!(
            "simulation: {N_OSCILLATORS} oscillators at {} Hz, {} pairs, {} memory units",
            config.tick_rate_hz,
            topology.pairs.len(),
            config.memory.units
        );
        Ok(Self {
            force_gain: hz_to_omega(config.oscillator.force_gain_hz, config.tick_rate_hz),
            max_offset: hz_to_omega(config.oscillator.max_offset_hz, config.tick_rate_hz),
            feedback_bias: Fixed::from_f64(config.memory.feedback_bias),
            integrator,
            params,
            current: vec![seed; N_OSCILLATORS],
            next: vec![seed; N_OSCILLATORS],
            drives: vec![Drive::default(); N_OSCILLATORS],
            feedback: vec![Fixed::ZERO; N_OSCILLATORS],
            resonance,
            landscape,
            memory,
            config,
            topology,
            tick: 0,
        })
    }

    /// Default configuration and wiring.
    pub fn with_defaults() -> PhinResult<Self> {
        Self::new(PhinConfig::default(), TopologyConfig::default())
    }

    pub fn config(&self) -> &PhinConfig {
        &self.config
    }

    pub fn topology(&self) -> &TopologyConfig {
        &self.topology
    }

    /// Ticks since the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Committed oscillator states.
    pub fn states(&self) -> &[OscillatorState] {
        &self.current
    }

    pub fn weights(&self) -> &PhaseWeightMatrix {
        self.memory.weights()
    }

    pub fn memory(&self) -> &PhaseMemory {
        &self.memory
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    pub fn resonance(&self) -> &ResonanceEngine {
        &self.resonance
    }

    /// External input bias each oscillator receives on the next tick.
    pub fn feedback(&self) -> &[Fixed] {
        &self.feedback
    }

    /// Replace all growth rates (μ·dt, per tick), e.g. from a state table.
    pub fn set_growth_rates(&mut self, rates: &[Fixed]) -> PhinResult<()> {
        PhinError::check_len("growth rates", N_OSCILLATORS, rates.len())?;
        for (p, &g) in self.params.iter_mut().zip(rates) {
            p.growth = g;
        }
        Ok(())
    }

    pub fn set_growth_rate(&mut self, index: usize, rate: Fixed) -> PhinResult<()> {
        let p = self
            .params
            .get_mut(index)
            .ok_or(PhinError::UnknownOscillator {
                index,
                len: N_OSCILLATORS,
            })?;
        p.growth = rate;
        Ok(())
    }

    /// Reinitialise every piece of owned state to the reset vector.
    pub fn reset(&mut self) {
        let seed = self.integrator.seed();
        self.current.iter_mut().for_each(|s| *s = seed);
        self.next.iter_mut().for_each(|s| *s = seed);
        self.feedback.iter_mut().for_each(|f| *f = Fixed::ZERO);
        self.resonance.reset();
        self.memory.reset();
        self.tick = 0;
        log::debug!("simulation reset");
    }

    /// Advance one synchronous tick. Inputs are length-checked before
    /// any state changes.
    pub fn tick(&mut self, inputs: &TickInputs) -> PhinResult<TickReport> {
        inputs.validate(self.resonance.n_pairs(), N_OSCILLATORS)?;
        if inputs.reset {
            self.reset();
        }

        // 1. drives
        for (i, d) in self.drives.iter_mut().enumerate() {
            *d = Drive {
                input: self.feedback[i],
                noise: inputs.noise.get(i).copied().unwrap_or(Fixed::ZERO),
            };
        }
        if !inputs.field.is_empty() {
            for (external, u) in self.resonance.field_inputs(&inputs.field)? {
                self.drives[external].input += u;
            }
        }

        // 2. advance and swap
        let corrections = advance_all(
            &self.integrator,
            &self.current,
            &self.params,
            &self.drives,
            &mut self.next,
        );
        std::mem::swap(&mut self.current, &mut self.next);

        // 3. resonance
        let resonance = self.resonance.update(&self.current);

        // 4. landscape
        let omegas: Vec<Wide> = self
            .params
            .iter()
            .zip(&self.current)
            .map(|(p, s)| p.base_omega + s.frequency_offset)
            .collect();
        let landscape: Vec<LandscapePosition> =
            omegas.iter().map(|&w| self.landscape.evaluate(w)).collect();

        // 5. offsets
        for (i, s) in self.current.iter_mut().enumerate() {
            let mut delta = inputs.drift.get(i).copied().unwrap_or(Wide::ZERO);
            if ROSTER[i].role == Role::Internal {
                delta += self.force_gain.mul_fixed(landscape[i].force);
            }
            s.frequency_offset =
                (s.frequency_offset + delta).clamp(-self.max_offset, self.max_offset);
        }

        // 6. PAC
        let pac = self
            .topology
            .pac_pairs
            .iter()
            .map(|p| PacReport {
                slow: p.slow,
                fast: p.fast,
                strength: self.landscape.pac(
                    omegas[p.slow],
                    omegas[p.fast],
                    self.current[p.slow].amplitude,
                    self.current[p.fast].amplitude,
                ),
            })
            .collect();

        // 7. memory
        let gate_value = self.current[self.topology.gating_oscillator].x;
        let memory = self.memory.step(gate_value, inputs.pattern);

        // 8. feedback
        self.feedback.iter_mut().for_each(|f| *f = Fixed::ZERO);
        for (bit, &target) in self.topology.memory_targets.iter().enumerate() {
            if (memory.recalled_pattern >> bit) & 1 == 1 {
                self.feedback[target] += self.feedback_bias;
            }
        }

        let tick_rate = self.config.tick_rate_hz;
        let oscillators = self
            .current
            .iter()
            .zip(&omegas)
            .map(|(s, &w)| OscillatorReport {
                x: s.x,
                y: s.y,
                amplitude: s.amplitude,
                frequency_hz: omega_to_hz(w, tick_rate),
            })
            .collect();

        let report = TickReport {
            tick: self.tick,
            oscillators,
            pairs: self.resonance.reports().to_vec(),
            gate_factor: resonance.gate,
            aggregate_gain: resonance.aggregate,
            landscape,
            pac,
            memory,
            corrections,
        };
        self.tick += 1;
        Ok(report)
    }

    /// Run `n` ticks with silent inputs and the same pattern.
    pub fn run(&mut self, n: usize, pattern: u16) -> PhinResult<Vec<TickReport>> {
        let inputs = TickInputs::with_pattern(pattern);
        (0..n).map(|_| self.tick(&inputs)).collect()
    }
}

/// Step every oscillator from `current` into `next`; returns how many
/// corrections fired.
#[cfg(not(feature = "parallel"))]
fn advance_all(
    integrator: &HopfIntegrator,
    current: &[OscillatorState],
    params: &[OscillatorParams],
    drives: &[Drive],
    next: &mut [OscillatorState],
) -> usize {
    let mut corrections = 0;
    for (((out, s), p), d) in next.iter_mut().zip(current).zip(params).zip(drives) {
        let a = integrator.step(s, p, *d);
        *out = a.state;
        corrections += usize::from(a.corrected);
    }
    corrections
}

#[cfg(feature = "parallel")]
fn advance_all(
    integrator: &HopfIntegrator,
    current: &[OscillatorState],
    params: &[OscillatorParams],
    drives: &[Drive],
    next: &mut [OscillatorState],
) -> usize {
    use rayon::prelude::*;

    next.par_iter_mut()
        .zip(current.par_iter())
        .zip(params.par_iter())
        .zip(drives.par_iter())
        .map(|(((out, s), p), d)| {
            let a = integrator.step(s, p, *d);
            *out = a.state;
            usize::from(a.corrected)
        })
        .sum()
}
