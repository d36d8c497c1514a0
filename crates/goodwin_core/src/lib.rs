//! The `goodwin_core` crate is the numerical engine of the Goodwin growth-cycle
//! simulator. It integrates the two-variable model with fixed-step RK4 and
//! reports the trajectory together with the model's equilibrium.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem` (vector fields), `Steppable` (Solvers).
//! - **Model**: The Goodwin vector field, its Jacobian and first integral. State order is (employment, wage share).
//! - **Solvers / Trajectory**: The RK4 stepper and the fixed-grid integration loop.
//! - **Equilibrium**: Closed-form fixed point and its linearization.
//! - **Simulation**: `simulate`, the single entry point used by the boundary crate.
pub mod analysis;
pub mod equilibrium;
pub mod error;
pub mod model;
pub mod simulation;
pub mod solvers;
pub mod trajectory;
pub mod traits;

pub use error::{SimResult, SimulationError};
pub use model::{ModelParameters, State};
pub use simulation::{simulate, simulate_with, SimulationResult, SimulationSettings};
