//! WASM bridge exposing the Goodwin simulator to the browser frontend.

pub mod equilibrium;
pub mod simulation;
pub mod system;

pub use simulation::simulate;
pub use system::WasmGoodwinModel;
