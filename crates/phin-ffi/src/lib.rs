// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the φⁿ oscillator kernel.
//!
//! Exposes `Config`, `Simulation` and the standalone `coherence`,
//! `coherence_factor` and `log_phi` helpers. Values cross the boundary
//! as floats; fixed-point conversion happens on the Rust side.
//!
//! Install: `pip install -e crates/phin-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from phin_kernel import Simulation
//!
//! sim = Simulation()
//! for _ in range(4000):
//!     report = sim.tick(pattern=0b011010)
//! print(report["memory_state"], sim.weights())
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use serde::Serialize;

use phin_core::{Simulation, TickInputs, TickReport, TopologyConfig};
use phin_landscape::LogPhiTable;
use phin_physics::params::{hz_to_omega, N_OSCILLATORS, ROSTER};
use phin_resonance::CoherenceRamp;
use phin_types::{Fixed, PhinConfig, PhinError, Wide};

fn py_err(e: PhinError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn fixed_vec(values: &[f64]) -> Vec<Fixed> {
    values.iter().map(|&v| Fixed::from_f64(v)).collect()
}

/// Serde name of a unit enum, e.g. `HALF_INTEGER`.
fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

fn report_dict<'py>(py: Python<'py>, r: &TickReport) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("tick", r.tick)?;

    let osc = &r.oscillators;
    dict.set_item("x", osc.iter().map(|o| o.x.to_f64()).collect::<Vec<_>>())?;
    dict.set_item("y", osc.iter().map(|o| o.y.to_f64()).collect::<Vec<_>>())?;
    dict.set_item(
        "amplitude",
        osc.iter().map(|o| o.amplitude.to_f64()).collect::<Vec<_>>(),
    )?;
    dict.set_item(
        "frequency_hz",
        osc.iter().map(|o| o.frequency_hz).collect::<Vec<_>>(),
    )?;

    dict.set_item(
        "coherence",
        r.pairs.iter().map(|p| p.coherence.to_f64()).collect::<Vec<_>>(),
    )?;
    dict.set_item(
        "pair_gain",
        r.pairs.iter().map(|p| p.gain.to_f64()).collect::<Vec<_>>(),
    )?;
    dict.set_item("gate_factor", r.gate_factor.to_f64())?;
    dict.set_item("aggregate_gain", r.aggregate_gain.to_f64())?;

    let land = &r.landscape;
    dict.set_item("n", land.iter().map(|l| l.n.to_f64()).collect::<Vec<_>>())?;
    dict.set_item(
        "stability",
        land.iter().map(|l| l.stability.to_f64()).collect::<Vec<_>>(),
    )?;
    dict.set_item(
        "position_class",
        land.iter().map(|l| label(&l.class)).collect::<Vec<_>>(),
    )?;
    dict.set_item(
        "regime",
        land.iter().map(|l| label(&l.regime)).collect::<Vec<_>>(),
    )?;
    dict.set_item("force", land.iter().map(|l| l.force.to_f64()).collect::<Vec<_>>())?;
    dict.set_item("pac", r.pac.iter().map(|p| p.strength.to_f64()).collect::<Vec<_>>())?;

    dict.set_item("memory_state", label(&r.memory.state))?;
    dict.set_item("recalled_pattern", r.memory.recalled_pattern)?;
    dict.set_item("is_learning", r.memory.is_learning)?;
    dict.set_item("is_recalling", r.memory.is_recalling)?;
    dict.set_item("corrections", r.corrections)?;
    Ok(dict)
}

// ─── PyConfig ───────────────────────────────────────────────────────

/// Python-visible kernel configuration.
#[pyclass(name = "Config")]
#[derive(Clone)]
struct PyConfig {
    inner: PhinConfig,
}

#[pymethods]
impl PyConfig {
    #[new]
    #[pyo3(signature = (
        tick_rate_hz = 4000.0,
        coherence_low = 0.5,
        coherence_high = 1.0,
        max_gain = 2.0,
        memory_units = 6,
        decay_period = 8,
        feedback_bias = 0.25,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        tick_rate_hz: f64,
        coherence_low: f64,
        coherence_high: f64,
        max_gain: f64,
        memory_units: usize,
        decay_period: u32,
        feedback_bias: f64,
    ) -> PyResult<Self> {
        let mut config = PhinConfig {
            tick_rate_hz,
            ..PhinConfig::default()
        };
        config.resonance.coherence_low = coherence_low;
        config.resonance.coherence_high = coherence_high;
        config.resonance.max_gain = max_gain;
        config.memory.units = memory_units;
        config.memory.decay_period = decay_period;
        config.memory.feedback_bias = feedback_bias;
        config.validate().map_err(py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string. Missing fields take their defaults.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = PhinConfig::from_json(json).map_err(py_err)?;
        config.validate().map_err(py_err)?;
        Ok(Self { inner: config })
    }

    fn to_json(&self) -> PyResult<String> {
        self.inner.to_json().map_err(py_err)
    }

    #[getter]
    fn tick_rate_hz(&self) -> f64 {
        self.inner.tick_rate_hz
    }

    #[getter]
    fn memory_units(&self) -> usize {
        self.inner.memory.units
    }

    fn __repr__(&self) -> String {
        format!(
            "Config(tick_rate_hz={}, coherence=[{}, {}], memory_units={})",
            self.inner.tick_rate_hz,
            self.inner.resonance.coherence_low,
            self.inner.resonance.coherence_high,
            self.inner.memory.units
        )
    }
}

// ─── PySimulation ───────────────────────────────────────────────────

/// The whole oscillator network, ticked from Python.
#[pyclass(name = "Simulation")]
struct PySimulation {
    inner: Simulation,
}

#[pymethods]
impl PySimulation {
    #[new]
    #[pyo3(signature = (config = None, topology_json = None))]
    fn new(config: Option<PyConfig>, topology_json: Option<&str>) -> PyResult<Self> {
        let config = config.map(|c| c.inner).unwrap_or_default();
        let topology = match topology_json {
            Some(json) => TopologyConfig::from_json(json).map_err(py_err)?,
            None => TopologyConfig::default(),
        };
        let inner = Simulation::new(config, topology).map_err(py_err)?;
        Ok(Self { inner })
    }

    /// Advance one tick. `field` has one sample per resonance pair,
    /// `drift_hz` and `noise` one entry per oscillator; omitted means none.
    #[pyo3(signature = (field = None, pattern = 0, reset = false, drift_hz = None, noise = None))]
    fn tick<'py>(
        &mut self,
        py: Python<'py>,
        field: Option<Vec<f64>>,
        pattern: u16,
        reset: bool,
        drift_hz: Option<Vec<f64>>,
        noise: Option<Vec<f64>>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let tick_rate = self.inner.config().tick_rate_hz;
        let inputs = TickInputs {
            field: field.as_deref().map(fixed_vec).unwrap_or_default(),
            drift: drift_hz
                .unwrap_or_default()
                .iter()
                .map(|&hz| hz_to_omega(hz, tick_rate))
                .collect::<Vec<Wide>>(),
            noise: noise.as_deref().map(fixed_vec).unwrap_or_default(),
            pattern,
            reset,
        };
        let report = self.inner.tick(&inputs).map_err(py_err)?;
        report_dict(py, &report)
    }

    /// Run n silent ticks with a fixed pattern. Returns list of report dicts.
    #[pyo3(signature = (n, pattern = 0))]
    fn run(&mut self, py: Python<'_>, n: usize, pattern: u16) -> PyResult<PyObject> {
        let reports = self.inner.run(n, pattern).map_err(py_err)?;
        let list = PyList::empty(py);
        for r in &reports {
            list.append(report_dict(py, r)?)?;
        }
        Ok(list.into())
    }

    /// Advance one silent tick and return its report as JSON.
    fn tick_json(&mut self) -> PyResult<String> {
        let report = self.inner.tick(&TickInputs::default()).map_err(py_err)?;
        report.to_json().map_err(py_err)
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    /// Replace every oscillator's growth rate (μ·dt per tick).
    fn set_growth_rates(&mut self, rates: Vec<f64>) -> PyResult<()> {
        self.inner
            .set_growth_rates(&fixed_vec(&rates))
            .map_err(py_err)
    }

    fn weights(&self) -> Vec<Vec<i16>> {
        self.inner.weights().rows()
    }

    fn amplitudes(&self) -> Vec<f64> {
        self.inner
            .states()
            .iter()
            .map(|s| s.amplitude.to_f64())
            .collect()
    }

    #[getter]
    fn tick_count(&self) -> u64 {
        self.inner.tick_count()
    }

    #[getter]
    fn recalled_pattern(&self) -> u16 {
        self.inner.memory().recalled_pattern()
    }

    #[staticmethod]
    fn oscillator_names() -> Vec<&'static str> {
        ROSTER.iter().map(|s| s.name).collect()
    }

    fn __len__(&self) -> usize {
        N_OSCILLATORS
    }

    fn __repr__(&self) -> String {
        format!(
            "Simulation(tick={}, pairs={}, memory_units={})",
            self.inner.tick_count(),
            self.inner.resonance().n_pairs(),
            self.inner.memory().units()
        )
    }
}

// ─── Standalone helpers ─────────────────────────────────────────────

/// |cos Δφ| of two phase-plane points, in [0, 1].
#[pyfunction]
fn coherence(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    phin_resonance::coherence(
        Fixed::from_f64(ax),
        Fixed::from_f64(ay),
        Fixed::from_f64(bx),
        Fixed::from_f64(by),
    )
    .to_f64()
}

/// Coupling factor of a coherence value on the low/high ramp.
#[pyfunction]
#[pyo3(signature = (c, low = 0.5, high = 1.0))]
fn coherence_factor(c: f64, low: f64, high: f64) -> f64 {
    CoherenceRamp::new(low, high)
        .factor(Fixed::from_f64(c))
        .to_f64()
}

/// Fixed-point log_φ of a positive ratio.
#[pyfunction]
fn log_phi(ratio: f64) -> PyResult<f64> {
    if !(ratio > 0.0 && ratio.is_finite()) {
        return Err(PyValueError::new_err(format!(
            "ratio must be positive and finite, got {ratio}"
        )));
    }
    Ok(LogPhiTable::new().log_phi(Wide::from_f64(ratio)).to_f64())
}

// ─── Module ─────────────────────────────────────────────────────────

#[pymodule]
fn phin_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyConfig>()?;
    m.add_class::<PySimulation>()?;
    m.add_function(wrap_pyfunction!(coherence, m)?)?;
    m.add_function(wrap_pyfunction!(coherence_factor, m)?)?;
    m.add_function(wrap_pyfunction!(log_phi, m)?)?;
    Ok(())
}
