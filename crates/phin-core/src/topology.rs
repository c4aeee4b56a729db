// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Network Topology
// ─────────────────────────────────────────────────────────────────────
//! Which oscillators are wired to what: resonance pairs, the coupling
//! gate's monitored oscillator, the memory's gating oscillator and
//! feedback targets, and the PAC pairs reported each tick.

use serde::{Deserialize, Serialize};

use phin_physics::params::{cortical, sr, Column, Layer, Role, ROSTER, THETA};
use phin_resonance::PairSpec;
use phin_types::{PhinError, PhinResult};

/// A (slow, fast) pair whose phase-amplitude coupling is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacPair {
    pub slow: usize,
    pub fast: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// External → internal resonance pairs, in field-sample order.
    pub pairs: Vec<PairSpec>,
    /// Oscillator whose amplitude drives the quiet gate.
    pub gate_oscillator: usize,
    /// Oscillator whose x value gates the phase memory.
    pub gating_oscillator: usize,
    /// Feedback target of each memory unit, in bit order.
    pub memory_targets: Vec<usize>,
    pub pac_pairs: Vec<PacPair>,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        let pair = |external, internal| PairSpec { external, internal };
        Self {
            pairs: vec![
                pair(sr(0), THETA),
                pair(sr(1), cortical(Column::Sensory, Layer::L5a)),
                // bridging mode: sr_f2 has no φ attractor of its own
                pair(sr(2), cortical(Column::Assoc, Layer::L5b)),
                pair(sr(3), cortical(Column::Sensory, Layer::L5b)),
                pair(sr(4), cortical(Column::Sensory, Layer::L4)),
            ],
            gate_oscillator: cortical(Column::Sensory, Layer::L5b),
            gating_oscillator: THETA,
            memory_targets: Column::ALL
                .iter()
                .map(|&c| cortical(c, Layer::L23))
                .chain(Column::ALL.iter().map(|&c| cortical(c, Layer::L6)))
                .collect(),
            pac_pairs: Column::ALL
                .iter()
                .map(|&c| PacPair {
                    slow: THETA,
                    fast: cortical(c, Layer::L23),
                })
                .collect(),
        }
    }
}

fn known(index: usize) -> PhinResult<Role> {
    ROSTER
        .get(index)
        .map(|s| s.role)
        .ok_or(PhinError::UnknownOscillator {
            index,
            len: ROSTER.len(),
        })
}

impl TopologyConfig {
    /// Check every index against the roster and the pair roles against
    /// the oscillator roles. `memory_units` is the configured memory size.
    pub fn validate(&self, memory_units: usize) -> PhinResult<()> {
        for p in &self.pairs {
            if known(p.external)? != Role::External {
                return Err(PhinError::Config(format!(
                    "pair source {} ({}) is not a field-driven oscillator",
                    p.external, ROSTER[p.external].name
                )));
            }
            if known(p.internal)? != Role::Internal {
                return Err(PhinError::Config(format!(
                    "pair target {} ({}) is not an internal oscillator",
                    p.internal, ROSTER[p.internal].name
                )));
            }
        }
        known(self.gate_oscillator)?;
        known(self.gating_oscillator)?;
        for &t in &self.memory_targets {
            known(t)?;
        }
        if self.memory_targets.len() > memory_units {
            return Err(PhinError::Config(format!(
                "{} memory targets for {memory_units} memory units",
                self.memory_targets.len()
            )));
        }
        if self.memory_targets.len() < memory_units {
            log::warn!(
                "{} of {memory_units} memory units have no feedback target",
                memory_units - self.memory_targets.len()
            );
        }
        for p in &self.pac_pairs {
            known(p.slow)?;
            known(p.fast)?;
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> PhinResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| PhinError::Config(format!("topology JSON parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phin_physics::params::index_of;

    fn idx(name: &str) -> usize {
        index_of(name).unwrap()
    }

    #[test]
    fn test_default_wiring() {
        let t = TopologyConfig::default();
        assert_eq!(t.pairs.len(), 5);
        assert_eq!(t.pairs[0], PairSpec { external: idx("sr_f0"), internal: idx("theta") });
        assert_eq!(t.pairs[2].internal, idx("assoc_l5b"));
        assert_eq!(t.gate_oscillator, idx("sensory_l5b"));
        assert_eq!(
            t.memory_targets,
            ["sensory_l23", "assoc_l23", "motor_l23", "sensory_l6", "assoc_l6", "motor_l6"]
                .map(idx)
                .to_vec()
        );
        assert_eq!(t.pac_pairs[2].fast, idx("motor_l23"));
    }

    #[test]
    fn test_default_validates() {
        assert!(TopologyConfig::default().validate(6).is_ok());
    }

    #[test]
    fn test_reversed_pair_rejected() {
        let mut t = TopologyConfig::default();
        t.pairs[1] = PairSpec { external: idx("sensory_l5a"), internal: idx("sr_f1") };
        assert!(matches!(t.validate(6), Err(PhinError::Config(_))));
    }

    #[test]
    fn test_unknown_index_rejected() {
        let t = TopologyConfig {
            gating_oscillator: 21,
            ..TopologyConfig::default()
        };
        assert_eq!(
            t.validate(6),
            Err(PhinError::UnknownOscillator { index: 21, len: 21 })
        );
    }

    #[test]
    fn test_too_many_targets_rejected() {
        assert!(TopologyConfig::default().validate(4).is_err());
        assert!(TopologyConfig::default().validate(8).is_ok());
    }

    #[test]
    fn test_partial_json() {
        let t = TopologyConfig::from_json(r#"{"gate_oscillator": 13}"#).unwrap();
        assert_eq!(t.gate_oscillator, 13);
        assert_eq!(t.pairs, TopologyConfig::default().pairs);
    }
}
