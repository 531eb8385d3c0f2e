use hummingbird_core::{SimConfig, Simulation};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Minimal PyO3 module exposing hummingbird-core to Python.
#[pyfunction]
fn version() -> &'static str {
    "0.1.0"
}

/// Run a headless simulation and return the run summary as JSON.
///
/// The agent holds zero actions every tick; this exercises episode setup,
/// placement and targeting as a smoke run for the training-side tooling.
#[pyfunction]
fn run(seed: u64, episodes: usize, steps: usize) -> PyResult<String> {
    let config = SimConfig {
        seed,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let obstacles = sim.obstacle_index();
    let summary = sim
        .run(episodes, steps, &obstacles, |_| [0.0; 5])
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    serde_json::to_string(&summary).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(run, m)?)?;
    Ok(())
}
