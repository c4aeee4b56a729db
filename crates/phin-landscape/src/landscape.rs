// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Landscape Subsystem
// ─────────────────────────────────────────────────────────────────────
//! Per-oscillator evaluation: position n, class, stability score,
//! coupling regime and force. Advisory only; frequency offsets are
//! integrated by the caller.
//!
//! Inside a catastrophe zone the well score is scaled by the zone depth,
//! falling to 0 at the zone centre.

use serde::{Deserialize, Serialize};

use phin_physics::hz_to_omega;
use phin_types::{Fixed, LandscapeConfig, PhinResult, Wide};

use crate::force::ForceModel;
use crate::position::{classify, stability_score, LogPhiTable, PositionClass};
use crate::susceptibility::{ChiTable, CouplingRegime};

/// Landscape values for one oscillator on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandscapePosition {
    pub n: Fixed,
    pub stability: Fixed,
    pub class: PositionClass,
    pub chi: Fixed,
    pub regime: CouplingRegime,
    pub force: Fixed,
}

pub struct Landscape {
    log_table: LogPhiTable,
    force: ForceModel,
    chi: ChiTable,
    reference_omega: Wide,
}

impl Landscape {
    pub fn new(cfg: &LandscapeConfig, tick_rate_hz: f64) -> PhinResult<Self> {
        cfg.validate()?;
        log::debug!(
            "landscape: f_ref={} Hz, A={}, B={}, q<={}",
            cfg.reference_hz,
            cfg.attractor_depth,
            cfg.rational_weight,
            cfg.rational_max_q
        );
        Ok(Self {
            log_table: LogPhiTable::new(),
            force: ForceModel::new(cfg),
            chi: ChiTable::new(cfg),
            reference_omega: hz_to_omega(cfg.reference_hz, tick_rate_hz),
        })
    }

    /// n = log_φ(ω / ω_ref) for a per-tick angular frequency.
    pub fn position(&self, omega: Wide) -> Fixed {
        self.log_table.log_phi(omega.div_wide(self.reference_omega))
    }

    /// Full evaluation at angular frequency ω.
    pub fn evaluate(&self, omega: Wide) -> LandscapePosition {
        let ratio = omega.div_wide(self.reference_omega);
        let n = self.log_table.log_phi(ratio);
        let chi = self.chi.chi(ratio.narrow());
        let (class, stability) = match self.force.zone_depth(n) {
            Some(depth) => (PositionClass::NearCatastrophe, stability_score(n) * depth),
            None => (classify(n), stability_score(n)),
        };
        LandscapePosition {
            n,
            stability,
            class,
            chi,
            regime: self.chi.regime(chi),
            force: self.force.force(n),
        }
    }

    /// PAC strength between a slow and a fast oscillator.
    pub fn pac(
        &self,
        slow_omega: Wide,
        fast_omega: Wide,
        amp_slow: Fixed,
        amp_fast: Fixed,
    ) -> Fixed {
        let ratio = fast_omega.div_wide(slow_omega).narrow();
        self.chi.pac_strength(ratio, amp_slow, amp_fast)
    }

    pub fn force_model(&self) -> &ForceModel {
        &self.force
    }

    pub fn chi_table(&self) -> &ChiTable {
        &self.chi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phin_physics::params::{PHI, TICK_RATE_HZ};

    fn landscape() -> Landscape {
        Landscape::new(&LandscapeConfig::default(), TICK_RATE_HZ).unwrap()
    }

    fn omega(hz: f64) -> Wide {
        hz_to_omega(hz, TICK_RATE_HZ)
    }

    #[test]
    fn test_roster_positions() {
        let l = landscape();
        for (hz, n) in [(5.89, -0.5), (9.53, 0.5), (15.42, 1.5), (31.73, 3.0), (40.36, 3.5)] {
            let got = l.position(omega(hz)).to_f64();
            assert!((got - n).abs() < 0.01, "{hz} Hz: n={got}, want {n}");
        }
    }

    #[test]
    fn test_half_integer_layer_is_stable_attractor() {
        let l = landscape();
        let p = l.evaluate(omega(15.42));
        assert_eq!(p.class, PositionClass::HalfInteger);
        assert!(p.stability.to_f64() > 0.95);
        assert_eq!(p.regime, CouplingRegime::Attractor);
    }

    #[test]
    fn test_octave_of_reference_is_catastrophe() {
        let l = landscape();
        let p = l.evaluate(omega(2.0 * 7.49));
        assert_eq!(p.class, PositionClass::NearCatastrophe);
        assert_eq!(p.regime, CouplingRegime::Boundary);
        assert!(p.stability.to_f64() < 0.05, "stability={}", p.stability);
    }

    #[test]
    fn test_catastrophe_scores_below_quarter_integer() {
        let l = landscape();
        let octave = l.evaluate(omega(2.0 * 7.49));
        let quarter = l.evaluate(omega(7.49 * PHI.powf(1.2)));
        assert_eq!(quarter.class, PositionClass::QuarterInteger);
        assert!(
            octave.stability < quarter.stability,
            "octave={} quarter={}",
            octave.stability,
            quarter.stability
        );
    }

    #[test]
    fn test_stability_rises_leaving_catastrophe() {
        let l = landscape();
        let c = 2f64.ln() / PHI.ln();
        let inner = l.evaluate(omega(7.49 * PHI.powf(c + 0.01)));
        let outer = l.evaluate(omega(7.49 * PHI.powf(c + 0.03)));
        let outside = l.evaluate(omega(7.49 * PHI.powf(c + 0.06)));
        assert_eq!(inner.class, PositionClass::NearCatastrophe);
        assert_eq!(outer.class, PositionClass::NearCatastrophe);
        assert_ne!(outside.class, PositionClass::NearCatastrophe);
        assert!(inner.stability < outer.stability);
        assert!(outer.stability < outside.stability);
    }

    #[test]
    fn test_integer_layer_is_boundary() {
        let l = landscape();
        let p = l.evaluate(omega(7.49 * PHI.powi(3)));
        assert_eq!(p.class, PositionClass::IntegerBoundary);
        assert!(p.stability.to_f64() < 0.05);
    }

    #[test]
    fn test_force_points_back_to_well() {
        let l = landscape();
        let below = l.evaluate(omega(7.49 * PHI.powf(0.3)));
        let above = l.evaluate(omega(7.49 * PHI.powf(0.7)));
        assert!(below.force.is_positive(), "f={}", below.force);
        assert!(above.force.is_negative(), "f={}", above.force);
    }

    #[test]
    fn test_pac_theta_gamma() {
        let l = landscape();
        let pac = l.pac(omega(5.89), omega(40.36), Fixed::ONE, Fixed::ONE);
        let chi = l.chi_table().chi(Fixed::from_f64(40.36 / 5.89));
        assert!((pac.to_f64() - chi.to_f64()).abs() < 2e-3);
        assert!(pac.is_positive());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = LandscapeConfig {
            eps: 0.0,
            ..LandscapeConfig::default()
        };
        assert!(Landscape::new(&cfg, TICK_RATE_HZ).is_err());
    }
}
