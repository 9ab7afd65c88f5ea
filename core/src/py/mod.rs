// Tynn PyO3-flate over JSON-API-et. Bygges bare med `--features python`.
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::api;
use crate::error::CoreError;

fn to_py_err(e: CoreError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[pyfunction]
#[pyo3(signature = (samples_json, meta_json=None, wind_json=None, cfg_json=None))]
fn analyze_run_json(
    samples_json: &str,
    meta_json: Option<&str>,
    wind_json: Option<&str>,
    cfg_json: Option<&str>,
) -> PyResult<String> {
    api::analyze_run_json(samples_json, meta_json, wind_json, cfg_json).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(signature = (readings_json, options_json=None))]
fn wind_rose_json(readings_json: &str, options_json: Option<&str>) -> PyResult<String> {
    api::wind_rose_json(readings_json, options_json).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(signature = (edges_json, order=None))]
fn chord_json(edges_json: &str, order: Option<&str>) -> PyResult<String> {
    api::chord_json(edges_json, order).map_err(to_py_err)
}

#[pymodule]
fn downwind_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_run_json, m)?)?;
    m.add_function(wrap_pyfunction!(wind_rose_json, m)?)?;
    m.add_function(wrap_pyfunction!(chord_json, m)?)?;
    Ok(())
}
