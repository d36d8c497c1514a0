//! Simulation runners and the serialized result record.

use crate::system::{to_js_error, WasmGoodwinModel};
use goodwin_core::equilibrium::EquilibriumKind;
use goodwin_core::model::{ModelParameters, State};
use goodwin_core::simulation::{simulate_with, SimulationSettings};
use goodwin_core::{SimResult, SimulationResult};
use js_sys::Float64Array;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

/// Flat record handed to the frontend.
#[derive(Debug, Serialize)]
pub(crate) struct SimulationPayload {
    time: Vec<f64>,
    employment: Vec<f64>,
    wage_share: Vec<f64>,
    profit: Vec<f64>,
    equilibrium_employment: f64,
    equilibrium_wage_share: f64,
    equilibrium_kind: Option<EquilibriumKind>,
    linear_period: Option<f64>,
    cycle_period: Option<f64>,
    invariant_drift: Option<f64>,
}

impl From<SimulationResult> for SimulationPayload {
    fn from(result: SimulationResult) -> Self {
        let (equilibrium_kind, linear_period) = match &result.linearization {
            Some(lin) => (Some(lin.kind), lin.linear_period),
            None => (None, None),
        };
        Self {
            time: result.time,
            employment: result.employment,
            wage_share: result.wage_share,
            profit: result.profit_share,
            equilibrium_employment: result.equilibrium.employment,
            equilibrium_wage_share: result.equilibrium.wage_share,
            equilibrium_kind,
            linear_period,
            cycle_period: result.cycle.period,
            invariant_drift: result.cycle.invariant_drift,
        }
    }
}

pub(crate) fn run_simulation(
    params: ModelParameters,
    settings: SimulationSettings,
    v0: f64,
    u0: f64,
    t_max: f64,
) -> SimResult<SimulationPayload> {
    simulate_with(params, State::new(v0, u0), t_max, settings).map(SimulationPayload::from)
}

/// Samples as consecutive `(t, v, u)` triples.
pub(crate) fn interleave_rows(payload: &SimulationPayload) -> Vec<f64> {
    let mut rows = Vec::with_capacity(payload.time.len() * 3);
    for i in 0..payload.time.len() {
        rows.push(payload.time[i]);
        rows.push(payload.employment[i]);
        rows.push(payload.wage_share[i]);
    }
    rows
}

#[wasm_bindgen]
impl WasmGoodwinModel {
    pub fn simulate(&self, v0: f64, u0: f64, t_max: f64) -> Result<JsValue, JsValue> {
        let payload =
            run_simulation(self.params, self.settings, v0, u0, t_max).map_err(to_js_error)?;
        to_value(&payload).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Raw trajectory as a flat `[t0, v0, u0, t1, v1, u1, ...]` array.
    pub fn trajectory(&self, v0: f64, u0: f64, t_max: f64) -> Result<Float64Array, JsValue> {
        let payload =
            run_simulation(self.params, self.settings, v0, u0, t_max).map_err(to_js_error)?;
        Ok(Float64Array::from(interleave_rows(&payload).as_slice()))
    }
}

/// One-shot simulation with the default step size: the eight scalar inputs
/// in, the serialized record out.
#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn simulate(
    sigma: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
    rho: f64,
    v0: f64,
    u0: f64,
    t_max: f64,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let params = ModelParameters::new(sigma, alpha, beta, gamma, rho);
    let payload = run_simulation(params, SimulationSettings::default(), v0, u0, t_max)
        .map_err(to_js_error)?;
    to_value(&payload).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
