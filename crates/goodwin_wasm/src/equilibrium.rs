//! Equilibrium and linearization accessors.

use crate::system::WasmGoodwinModel;
use goodwin_core::equilibrium::{equilibrium, linearize};
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
impl WasmGoodwinModel {
    /// `[v*, u*]`.
    pub fn equilibrium(&self) -> Vec<f64> {
        let point = equilibrium(&self.params);
        vec![point.employment, point.wage_share]
    }

    pub fn linearize(&self) -> Result<JsValue, JsValue> {
        let result = linearize(&self.params)
            .map_err(|e| JsValue::from_str(&format!("Linearization failed: {}", e)))?;

        to_value(&result).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
