//! Single entry point for callers: parameters in, bundled series out.

use crate::analysis::{analyze_cycle, CycleSummary};
use crate::equilibrium::{equilibrium, linearize, EquilibriumPoint, Linearization};
use crate::error::{SimResult, SimulationError};
use crate::model::{GoodwinModel, ModelParameters, State};
use crate::trajectory::{integrate, TimeSpan};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

/// Integration step used by [`simulate`]; short against the model's cycle
/// period of roughly 30 time units.
pub const DEFAULT_DT: f64 = 0.1;

/// Step ceiling used by [`simulate`].
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub dt: f64,
    /// Requests needing more steps are rejected before any work is done.
    pub max_steps: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Everything a caller gets back from one simulation. The four series share
/// one time index and have equal length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub time: Vec<f64>,
    pub employment: Vec<f64>,
    pub wage_share: Vec<f64>,
    /// `1 − wage_share`, elementwise.
    pub profit_share: Vec<f64>,
    pub equilibrium: EquilibriumPoint,
    pub linearization: Option<Linearization>,
    pub cycle: CycleSummary,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn sample(&self, index: usize) -> (f64, State) {
        (
            self.time[index],
            State::new(self.employment[index], self.wage_share[index]),
        )
    }
}

/// Rejects parameter sets the model cannot be evaluated with: non-finite
/// values, and zero σ or ρ (both are divisors). Ranges are not enforced.
pub fn validate_parameters(params: &ModelParameters) -> SimResult<()> {
    let named = [
        ("sigma", params.sigma),
        ("alpha", params.alpha),
        ("beta", params.beta),
        ("gamma", params.gamma),
        ("rho", params.rho),
    ];
    for (name, value) in named {
        if !value.is_finite() {
            return Err(SimulationError::invalid(name, value, "must be finite"));
        }
    }
    if params.sigma == 0.0 {
        return Err(SimulationError::invalid(
            "sigma",
            params.sigma,
            "capital-output ratio must be non-zero",
        ));
    }
    if params.rho == 0.0 {
        return Err(SimulationError::invalid(
            "rho",
            params.rho,
            "wage sensitivity must be non-zero",
        ));
    }
    Ok(())
}

/// Simulates the model from `(v0, u0)` over `[0, t_max]` with default
/// settings.
pub fn simulate(
    params: ModelParameters,
    v0: f64,
    u0: f64,
    t_max: f64,
) -> SimResult<SimulationResult> {
    simulate_with(
        params,
        State::new(v0, u0),
        t_max,
        SimulationSettings::default(),
    )
}

pub fn simulate_with(
    params: ModelParameters,
    initial: State,
    t_max: f64,
    settings: SimulationSettings,
) -> SimResult<SimulationResult> {
    let span = debug_span!("simulate", t_max, dt = settings.dt);
    let _guard = span.enter();

    validate_parameters(&params)?;
    if !initial.employment.is_finite() {
        return Err(SimulationError::invalid(
            "v0",
            initial.employment,
            "must be finite",
        ));
    }
    if !initial.wage_share.is_finite() {
        return Err(SimulationError::invalid(
            "u0",
            initial.wage_share,
            "must be finite",
        ));
    }
    if !t_max.is_finite() || t_max <= 0.0 {
        return Err(SimulationError::invalid(
            "t_max",
            t_max,
            "must be finite and positive",
        ));
    }

    let model = GoodwinModel::new(params);
    let trajectory = integrate(
        &model,
        &initial.to_array(),
        TimeSpan::from_origin(t_max),
        settings.dt,
        settings.max_steps,
    )?;

    let equilibrium = equilibrium(&params);
    let linearization = match linearize(&params) {
        Ok(lin) => Some(lin),
        Err(err) => {
            warn!(error = %err, "skipping linearization");
            None
        }
    };
    let cycle = analyze_cycle(&model, &trajectory, &equilibrium);

    let employment: Vec<f64> = trajectory.component(0).collect();
    let wage_share: Vec<f64> = trajectory.component(1).collect();
    let profit_share = wage_share.iter().map(|u| 1.0 - u).collect();

    debug!(
        samples = trajectory.len(),
        crossings = cycle.crossings,
        "simulation finished"
    );

    Ok(SimulationResult {
        time: trajectory.times().to_vec(),
        employment,
        wage_share,
        profit_share,
        equilibrium,
        linearization,
        cycle,
    })
}
