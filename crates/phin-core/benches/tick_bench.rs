// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Tick Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the per-tick hot path.
//!
//! Covers:
//!   - Oscillator primitive (single step)
//!   - Resonance engine update (5 pairs)
//!   - Landscape evaluation (one oscillator, whole roster)
//!   - Memory learn/recall
//!   - Full simulation tick (silent, driven, with memory traffic)
//!
//! At 4000 Hz a full tick has a 250 µs budget.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use phin_core::{Simulation, TickInputs, TopologyConfig};
use phin_landscape::Landscape;
use phin_memory::PhaseWeightMatrix;
use phin_physics::params::{hz_to_omega, N_OSCILLATORS, ROSTER, TICK_RATE_HZ};
use phin_physics::{Drive, HopfIntegrator, OscillatorParams};
use phin_resonance::ResonanceEngine;
use phin_types::{Fixed, LandscapeConfig, ResonanceConfig, Wide};

const PATTERN: u16 = 0b01_1010;

// ── Helpers ───────────────────────────────────────────────────────────

fn make_sim() -> Simulation {
    let mut sim = Simulation::with_defaults().expect("default simulation");
    sim.run(4_000, 0).expect("warm-up");
    sim
}

fn make_omegas() -> Vec<Wide> {
    ROSTER
        .iter()
        .map(|s| hz_to_omega(s.base_hz, TICK_RATE_HZ))
        .collect()
}

fn make_field(t: usize) -> Vec<Fixed> {
    (0..5)
        .map(|i| Fixed::from_f64((t as f64 * 0.01 + i as f64).sin()))
        .collect()
}

// ── Component benchmarks ─────────────────────────────────────────────

fn bench_oscillator_step(c: &mut Criterion) {
    let integ = HopfIntegrator::default();
    let params = OscillatorParams {
        base_omega: hz_to_omega(40.36, TICK_RATE_HZ),
        growth: Fixed::from_raw(4),
    };
    let state = integ.seed();
    c.bench_function("oscillator_step_gamma", |b| {
        b.iter(|| integ.step(black_box(&state), &params, Drive::default()))
    });
}

fn bench_resonance_update(c: &mut Criterion) {
    let sim = make_sim();
    let states = sim.states().to_vec();
    let mut engine = ResonanceEngine::new(
        &ResonanceConfig::default(),
        TopologyConfig::default().pairs,
        8,
        N_OSCILLATORS,
    )
    .expect("engine");
    c.bench_function("resonance_update_5_pairs", |b| {
        b.iter(|| engine.update(black_box(&states)))
    });
}

fn bench_landscape_evaluate(c: &mut Criterion) {
    let landscape = Landscape::new(&LandscapeConfig::default(), TICK_RATE_HZ).expect("landscape");
    let omega = hz_to_omega(24.94, TICK_RATE_HZ);
    c.bench_function("landscape_evaluate_one", |b| {
        b.iter(|| landscape.evaluate(black_box(omega)))
    });
}

fn bench_landscape_roster(c: &mut Criterion) {
    let landscape = Landscape::new(&LandscapeConfig::default(), TICK_RATE_HZ).expect("landscape");
    let omegas = make_omegas();
    c.bench_function("landscape_evaluate_roster_21", |b| {
        b.iter(|| {
            black_box(&omegas)
                .iter()
                .map(|&w| landscape.evaluate(w))
                .collect::<Vec<_>>()
        })
    });
}

fn bench_landscape_build(c: &mut Criterion) {
    let cfg = LandscapeConfig::default();
    c.bench_function("landscape_build_tables", |b| {
        b.iter(|| Landscape::new(black_box(&cfg), TICK_RATE_HZ))
    });
}

fn bench_memory_learn(c: &mut Criterion) {
    let mut m = PhaseWeightMatrix::new(6);
    c.bench_function("memory_learn_6", |b| {
        b.iter(|| m.learn(black_box(PATTERN), 1, 15))
    });
}

fn bench_memory_recall(c: &mut Criterion) {
    let mut m = PhaseWeightMatrix::new(6);
    for _ in 0..5 {
        m.learn(PATTERN, 1, 15);
    }
    c.bench_function("memory_recall_6", |b| {
        b.iter(|| m.recall(black_box(0b00_0010), 2))
    });
}

// ── Full tick benchmarks ─────────────────────────────────────────────

fn bench_tick_silent(c: &mut Criterion) {
    let mut sim = make_sim();
    let inputs = TickInputs::default();
    c.bench_function("tick_silent", |b| b.iter(|| sim.tick(black_box(&inputs))));
}

fn bench_tick_driven(c: &mut Criterion) {
    let mut sim = make_sim();
    let inputs = TickInputs {
        field: make_field(0),
        drift: vec![Wide::ZERO; N_OSCILLATORS],
        noise: vec![Fixed::from_f64(0.01); N_OSCILLATORS],
        pattern: PATTERN,
        reset: false,
    };
    c.bench_function("tick_driven_with_pattern", |b| {
        b.iter(|| sim.tick(black_box(&inputs)))
    });
}

fn bench_one_theta_cycle(c: &mut Criterion) {
    let mut sim = make_sim();
    let inputs: Vec<TickInputs> = (0..680)
        .map(|t| TickInputs {
            field: make_field(t),
            pattern: PATTERN,
            ..TickInputs::default()
        })
        .collect();
    c.bench_function("ticks_one_theta_cycle_680", |b| {
        b.iter(|| {
            for i in &inputs {
                let _ = sim.tick(black_box(i));
            }
        })
    });
}

criterion_group!(
    components,
    bench_oscillator_step,
    bench_resonance_update,
    bench_landscape_evaluate,
    bench_landscape_roster,
    bench_landscape_build,
    bench_memory_learn,
    bench_memory_recall,
);

criterion_group!(ticks, bench_tick_silent, bench_tick_driven, bench_one_theta_cycle);

criterion_main!(components, ticks);
