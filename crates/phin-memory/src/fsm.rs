// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Phase Memory State Machine
// ─────────────────────────────────────────────────────────────────────
//! IDLE → LEARN → LEARN_DONE → IDLE     gate PEAK, pattern present
//! IDLE → RECALL → RECALL_DONE → IDLE   gate TROUGH, pattern present
//! IDLE → DECAY → DECAY_DONE → IDLE     gate TROUGH, no pattern, and
//!                                      ≥ decay_period cycles since the
//!                                      last decay
//!
//! The action runs on the tick the FSM enters LEARN/RECALL/DECAY; the
//! next tick moves to the DONE state, which holds until |gate| drops
//! below the re-arm level. So each peak yields at most one LEARN and
//! each trough at most one RECALL or DECAY.
//!
//! The recalled pattern is held until the next RECALL or reset.

use serde::{Deserialize, Serialize};

use phin_types::{Fixed, MemoryConfig, PhinResult};

use crate::gate::{GatePhase, GateSample, GateTracker};
use crate::weights::{pattern_mask, PhaseWeightMatrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemoryState {
    Idle,
    Learn,
    LearnDone,
    Recall,
    RecallDone,
    Decay,
    DecayDone,
}

/// Memory outputs after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStatus {
    pub state: MemoryState,
    pub gate: GateSample,
    pub recalled_pattern: u16,
    pub is_learning: bool,
    pub is_recalling: bool,
    /// Gating cycles (upward zero crossings) since reset.
    pub cycles: u64,
    pub learn_count: u64,
    pub recall_count: u64,
    pub decay_count: u64,
}

pub struct PhaseMemory {
    weights: PhaseWeightMatrix,
    gate: GateTracker,
    state: MemoryState,
    rearm: Fixed,
    learn_rate: i16,
    weight_max: i16,
    recall_threshold: i32,
    decay_rate: i16,
    decay_period: u32,
    mask: u16,
    recalled: u16,
    cycles: u64,
    cycles_since_decay: u32,
    learn_count: u64,
    recall_count: u64,
    decay_count: u64,
}

impl PhaseMemory {
    pub fn new(cfg: &MemoryConfig) -> PhinResult<Self> {
        cfg.validate()?;
        log::debug!(
            "phase memory: {} units, learn +{} (max {}), recall > {}, decay -{} every {} cycles",
            cfg.units,
            cfg.learn_rate,
            cfg.weight_max,
            cfg.recall_threshold,
            cfg.decay_rate,
            cfg.decay_period
        );
        Ok(Self {
            weights: PhaseWeightMatrix::new(cfg.units),
            gate: GateTracker::new(Fixed::from_f64(cfg.gate_level)),
            state: MemoryState::Idle,
            rearm: Fixed::from_f64(cfg.rearm_level),
            learn_rate: cfg.learn_rate,
            weight_max: cfg.weight_max,
            recall_threshold: cfg.recall_threshold,
            decay_rate: cfg.decay_rate,
            decay_period: cfg.decay_period,
            mask: pattern_mask(cfg.units),
            recalled: 0,
            cycles: 0,
            cycles_since_decay: 0,
            learn_count: 0,
            recall_count: 0,
            decay_count: 0,
        })
    }

    pub fn default_params() -> PhinResult<Self> {
        Self::new(&MemoryConfig::default())
    }

    pub fn units(&self) -> usize {
        self.weights.units()
    }

    pub fn weights(&self) -> &PhaseWeightMatrix {
        &self.weights
    }

    pub fn state(&self) -> MemoryState {
        self.state
    }

    pub fn recalled_pattern(&self) -> u16 {
        self.recalled
    }

    /// Advance one tick with the gating oscillator's value and the
    /// current input pattern.
    pub fn step(&mut self, gate_value: Fixed, pattern: u16) -> MemoryStatus {
        let sample = self.gate.observe(gate_value);
        if sample.upward_crossing {
            self.cycles += 1;
            self.cycles_since_decay = self.cycles_since_decay.saturating_add(1);
        }
        let pattern = pattern & self.mask;

        let next = match self.state {
            MemoryState::Idle => self.idle(sample.phase, pattern),
            MemoryState::Learn => MemoryState::LearnDone,
            MemoryState::Recall => MemoryState::RecallDone,
            MemoryState::Decay => MemoryState::DecayDone,
            done => {
                if gate_value.abs() < self.rearm {
                    MemoryState::Idle
                } else {
                    done
                }
            }
        };
        if next != self.state {
            log::trace!("phase memory {:?} -> {:?} (gate {gate_value})", self.state, next);
            self.state = next;
        }

        MemoryStatus {
            state: self.state,
            gate: sample,
            recalled_pattern: self.recalled,
            is_learning: self.state == MemoryState::Learn,
            is_recalling: self.state == MemoryState::Recall,
            cycles: self.cycles,
            learn_count: self.learn_count,
            recall_count: self.recall_count,
            decay_count: self.decay_count,
        }
    }

    fn idle(&mut self, phase: GatePhase, pattern: u16) -> MemoryState {
        match phase {
            GatePhase::Peak if pattern != 0 => {
                self.weights.learn(pattern, self.learn_rate, self.weight_max);
                self.learn_count += 1;
                MemoryState::Learn
            }
            GatePhase::Trough if pattern != 0 => {
                self.recalled = self.weights.recall(pattern, self.recall_threshold);
                self.recall_count += 1;
                MemoryState::Recall
            }
            GatePhase::Trough if self.cycles_since_decay >= self.decay_period => {
                self.weights.decay(self.decay_rate);
                self.cycles_since_decay = 0;
                self.decay_count += 1;
                MemoryState::Decay
            }
            _ => MemoryState::Idle,
        }
    }

    /// Clear weights, recalled pattern, counters and gate history.
    pub fn reset(&mut self) {
        self.weights.clear();
        self.gate.reset();
        self.state = MemoryState::Idle;
        self.recalled = 0;
        self.cycles = 0;
        self.cycles_since_decay = 0;
        self.learn_count = 0;
        self.recall_count = 0;
        self.decay_count = 0;
    }
}
