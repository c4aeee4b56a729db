// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Hopf Oscillator Primitive
// ─────────────────────────────────────────────────────────────────────
//! Explicit-Euler integrator for the Hopf normal form:
//!
//!   dx/dt = μx - (ω+Δω)y - r²x + u (+ ξ)
//!   dy/dt = μy + (ω+Δω)x - r²y
//!
//! μ and ω arrive pre-multiplied by dt (per-tick units); the cubic
//! damping and the drive use dt = 2⁻¹², so a growth of raw 4 gives the
//! unit-amplitude limit cycle. All terms are summed in Q28 and narrowed
//! once.
//!
//! Explicit Euler inflates the radius by √(1 + (ω·dt)²) per tick, which
//! for the faster oscillators outruns the cubic damping. When the new
//! r² exceeds `margin × target²` the state is scaled by
//! `clamp(2 - r²/target², 0.5, 1)` before it is committed.

use serde::{Deserialize, Serialize};

use phin_types::{Fixed, OscillatorConfig, Wide};

/// dt of the cubic damping and drive terms, as a right shift.
pub const DAMPING_SHIFT: u32 = 12;

/// Mutable state of one oscillator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OscillatorState {
    pub x: Fixed,
    pub y: Fixed,
    /// √(x² + y²) of the committed state.
    pub amplitude: Fixed,
    /// Per-tick angular offset Δω·dt added to the base frequency.
    pub frequency_offset: Wide,
}

impl OscillatorState {
    /// Squared radius in Q28.
    pub fn r2(&self) -> Wide {
        Wide::product(self.x, self.x) + Wide::product(self.y, self.y)
    }
}

/// Per-oscillator parameters supplied each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscillatorParams {
    /// Base angular increment ω·dt.
    pub base_omega: Wide,
    /// Growth rate μ·dt (raw 4 = unit limit cycle).
    pub growth: Fixed,
}

/// Additive forcing on the x channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Drive {
    /// Deterministic external input u.
    pub input: Fixed,
    /// Stochastic term ξ, added to dx only.
    pub noise: Fixed,
}

impl Drive {
    pub fn input(input: Fixed) -> Self {
        Self {
            input,
            noise: Fixed::ZERO,
        }
    }
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub state: OscillatorState,
    /// Whether the amplitude correction fired this tick.
    pub corrected: bool,
}

/// Stateless Euler stepper shared by every oscillator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopfIntegrator {
    target: Fixed,
    target_sq: Wide,
    threshold: Wide,
}

impl HopfIntegrator {
    pub fn new(target_amplitude: f64, correction_margin: f64) -> Self {
        let target = Fixed::from_f64(target_amplitude);
        let target_sq = Wide::product(target, target);
        let threshold = target_sq.mul_fixed(Fixed::from_f64(correction_margin));
        Self {
            target,
            target_sq,
            threshold,
        }
    }

    pub fn from_config(cfg: &OscillatorConfig) -> Self {
        Self::new(cfg.target_amplitude, cfg.correction_margin)
    }

    pub fn target(&self) -> Fixed {
        self.target
    }

    /// Reset state: (0.5·target, 0), away from the unstable origin.
    pub fn seed(&self) -> OscillatorState {
        let x = self.target * Fixed::HALF;
        OscillatorState {
            x,
            y: Fixed::ZERO,
            amplitude: x.abs(),
            frequency_offset: Wide::ZERO,
        }
    }

    /// Advance one tick. The frequency offset is carried over unchanged.
    pub fn step(
        &self,
        state: &OscillatorState,
        params: &OscillatorParams,
        drive: Drive,
    ) -> Advance {
        let (x, y) = (state.x, state.y);
        let r2 = state.r2();
        let omega = params.base_omega + state.frequency_offset;

        let growth_x = Wide::product(params.growth, x);
        let growth_y = Wide::product(params.growth, y);
        let rot_x = omega.mul_fixed(y);
        let rot_y = omega.mul_fixed(x);
        let damp_x = r2.mul_fixed(x).shr(DAMPING_SHIFT);
        let damp_y = r2.mul_fixed(y).shr(DAMPING_SHIFT);
        let forcing = Wide::from_fixed(drive.input + drive.noise).shr(DAMPING_SHIFT);

        let dx = growth_x - rot_x - damp_x + forcing;
        let dy = growth_y + rot_y - damp_y;

        let mut nx = (Wide::from_fixed(x) + dx).narrow();
        let mut ny = (Wide::from_fixed(y) + dy).narrow();

        let r2_next = Wide::product(nx, nx) + Wide::product(ny, ny);
        let corrected = r2_next > self.threshold;
        let r2_committed = if corrected {
            let factor = self.correction_factor(r2_next);
            log::trace!("amplitude correction: r2={r2_next} factor={factor}");
            nx = nx * factor;
            ny = ny * factor;
            Wide::product(nx, nx) + Wide::product(ny, ny)
        } else {
            r2_next
        };

        Advance {
            state: OscillatorState {
                x: nx,
                y: ny,
                amplitude: r2_committed.isqrt(),
                frequency_offset: state.frequency_offset,
            },
            corrected,
        }
    }

    /// `clamp(2·T - r², 0.5·T, T) / T` with T = target².
    fn correction_factor(&self, r2: Wide) -> Fixed {
        let excess = (self.target_sq + self.target_sq - r2).div_wide(self.target_sq);
        excess.clamp(Wide::ONE.shr(1), Wide::ONE).narrow()
    }
}

impl Default for HopfIntegrator {
    fn default() -> Self {
        Self::from_config(&OscillatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{hz_to_omega, TICK_RATE_HZ};

    const NOMINAL: Fixed = Fixed::from_raw(4);

    fn params(hz: f64) -> OscillatorParams {
        OscillatorParams {
            base_omega: hz_to_omega(hz, TICK_RATE_HZ),
            growth: NOMINAL,
        }
    }

    fn run(
        integ: &HopfIntegrator,
        mut s: OscillatorState,
        p: &OscillatorParams,
        n: usize,
    ) -> OscillatorState {
        for _ in 0..n {
            s = integ.step(&s, p, Drive::default()).state;
        }
        s
    }

    #[test]
    fn test_seed_is_half_target() {
        let integ = HopfIntegrator::default();
        let s = integ.seed();
        assert_eq!(s.x, Fixed::HALF);
        assert_eq!(s.y, Fixed::ZERO);
        assert_eq!(s.amplitude, Fixed::HALF);
    }

    #[test]
    fn test_origin_is_a_fixed_point() {
        let integ = HopfIntegrator::default();
        let s = run(&integ, OscillatorState::default(), &params(5.89), 1000);
        assert_eq!(s.x, Fixed::ZERO);
        assert_eq!(s.y, Fixed::ZERO);
    }

    #[test]
    fn test_seeded_oscillator_reaches_limit_cycle() {
        let integ = HopfIntegrator::default();
        let p = params(40.36);
        let s = run(&integ, integ.seed(), &p, 20_000);
        let amp = s.amplitude.to_f64();
        assert!(amp > 0.85 && amp <= 1.1, "amp={amp}");
    }

    #[test]
    fn test_slow_oscillator_grows_from_seed() {
        let integ = HopfIntegrator::default();
        let s = run(&integ, integ.seed(), &params(5.89), 20_000);
        assert!(s.amplitude.to_f64() > 0.8, "amp={}", s.amplitude);
    }

    #[test]
    fn test_correction_pulls_large_state_back() {
        let integ = HopfIntegrator::default();
        let s = OscillatorState {
            x: Fixed::from_f64(2.0),
            ..OscillatorState::default()
        };
        let adv = integ.step(&s, &params(9.53), Drive::default());
        assert!(adv.corrected);
        assert!(adv.state.amplitude.to_f64() <= 1.1, "amp={}", adv.state.amplitude);
        assert!(adv.state.amplitude.to_f64() >= 0.5);
    }

    #[test]
    fn test_correction_silent_inside_margin() {
        let integ = HopfIntegrator::default();
        let adv = integ.step(&integ.seed(), &params(9.53), Drive::default());
        assert!(!adv.corrected);
    }

    #[test]
    fn test_amplitude_bounded_over_long_run() {
        let integ = HopfIntegrator::default();
        let p = params(40.36);
        let mut s = integ.seed();
        for _ in 0..100_000 {
            s = integ.step(&s, &p, Drive::default()).state;
            assert!(s.amplitude.to_f64() <= 1.1);
        }
    }

    #[test]
    fn test_frequency_matches_base() {
        let integ = HopfIntegrator::default();
        let p = params(5.89);
        let mut s = run(&integ, integ.seed(), &p, 8000);
        let mut crossings = 0;
        for _ in 0..4000 {
            let next = integ.step(&s, &p, Drive::default()).state;
            if s.x.is_negative() && !next.x.is_negative() {
                crossings += 1;
            }
            s = next;
        }
        assert!((5..=7).contains(&crossings), "crossings={crossings}");
    }

    #[test]
    fn test_positive_offset_speeds_rotation() {
        let integ = HopfIntegrator::default();
        let p = params(9.53);
        let count = |offset_hz: f64| {
            let mut s = integ.seed();
            s.frequency_offset = hz_to_omega(offset_hz, TICK_RATE_HZ);
            let mut n = 0;
            for _ in 0..8000 {
                let next = integ.step(&s, &p, Drive::default()).state;
                if s.x.is_negative() && !next.x.is_negative() {
                    n += 1;
                }
                s = next;
            }
            n
        };
        assert!(count(3.0) > count(0.0));
    }

    #[test]
    fn test_noise_enters_x_only() {
        let integ = HopfIntegrator::default();
        let p = params(9.53);
        let s = integ.seed();
        let quiet = integ.step(&s, &p, Drive::default()).state;
        let noisy = integ
            .step(
                &s,
                &p,
                Drive {
                    input: Fixed::ZERO,
                    noise: Fixed::from_f64(2.0),
                },
            )
            .state;
        assert_ne!(quiet.x, noisy.x);
        assert_eq!(quiet.y, noisy.y);
    }

    #[test]
    fn test_offset_carried_over() {
        let integ = HopfIntegrator::default();
        let mut s = integ.seed();
        s.frequency_offset = Wide::from_f64(0.001);
        let next = integ.step(&s, &params(9.53), Drive::default()).state;
        assert_eq!(next.frequency_offset, s.frequency_offset);
    }
}
