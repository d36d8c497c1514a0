//! Core WASM model wrapper and low-level utilities.

use goodwin_core::model::{GoodwinModel, ModelParameters, State};
use goodwin_core::simulation::{validate_parameters, SimulationSettings};
use goodwin_core::SimulationError;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmGoodwinModel {
    pub(crate) params: ModelParameters,
    pub(crate) settings: SimulationSettings,
}

pub(crate) fn to_js_error(err: SimulationError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
impl WasmGoodwinModel {
    #[wasm_bindgen(constructor)]
    pub fn new(
        sigma: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
        rho: f64,
    ) -> Result<WasmGoodwinModel, JsValue> {
        console_error_panic_hook::set_once();

        let params = ModelParameters::new(sigma, alpha, beta, gamma, rho);
        validate_parameters(&params).map_err(to_js_error)?;

        Ok(WasmGoodwinModel {
            params,
            settings: SimulationSettings::default(),
        })
    }

    /// Parameters in the order (σ, α, β, γ, ρ).
    pub fn get_params(&self) -> Vec<f64> {
        let p = &self.params;
        vec![p.sigma, p.alpha, p.beta, p.gamma, p.rho]
    }

    pub fn set_step_size(&mut self, dt: f64) -> Result<(), JsValue> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(JsValue::from_str("dt must be finite and positive."));
        }
        self.settings.dt = dt;
        Ok(())
    }

    pub fn get_step_size(&self) -> f64 {
        self.settings.dt
    }

    pub fn set_max_steps(&mut self, max_steps: u32) {
        self.settings.max_steps = max_steps as usize;
    }

    pub fn get_max_steps(&self) -> u32 {
        u32::try_from(self.settings.max_steps).unwrap_or(u32::MAX)
    }

    /// (dv/dt, du/dt) at the given state.
    pub fn derivative(&self, employment: f64, wage_share: f64) -> Vec<f64> {
        GoodwinModel::new(self.params)
            .derivative(State::new(employment, wage_share))
            .to_array()
            .to_vec()
    }

    /// Row-major 2x2 Jacobian at the given state.
    pub fn compute_jacobian(&self, employment: f64, wage_share: f64) -> Vec<f64> {
        GoodwinModel::new(self.params)
            .jacobian(State::new(employment, wage_share))
            .to_vec()
    }
}
