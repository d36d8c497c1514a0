//! The Goodwin growth-cycle vector field.
//!
//! State ordering is employment-first everywhere in the crate: index 0 holds
//! the employment rate `v`, index 1 the workers' wage share `u`. Jacobians are
//! row-major in the same ordering.

use crate::traits::{DynamicalSystem, Scalar};
use serde::{Deserialize, Serialize};

/// Number of state variables of the model.
pub const DIMENSION: usize = 2;

/// The five structural constants of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Capital-output ratio σ.
    pub sigma: f64,
    /// Productivity growth α.
    pub alpha: f64,
    /// Labor-force growth β.
    pub beta: f64,
    /// Wage-adjustment constant γ.
    pub gamma: f64,
    /// Wage sensitivity to employment ρ.
    pub rho: f64,
}

impl ModelParameters {
    pub fn new(sigma: f64, alpha: f64, beta: f64, gamma: f64, rho: f64) -> Self {
        Self {
            sigma,
            alpha,
            beta,
            gamma,
            rho,
        }
    }

    /// `1/σ − (α+β)`: growth rate of employment when the wage share is zero.
    pub fn intrinsic_growth(&self) -> f64 {
        1.0 / self.sigma - (self.alpha + self.beta)
    }

    /// `α+γ`: decay rate of the wage share when employment is zero.
    pub fn wage_decay(&self) -> f64 {
        self.alpha + self.gamma
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub employment: f64,
    pub wage_share: f64,
}

impl State {
    pub fn new(employment: f64, wage_share: f64) -> Self {
        Self {
            employment,
            wage_share,
        }
    }

    pub fn to_array(self) -> [f64; DIMENSION] {
        [self.employment, self.wage_share]
    }

    /// Reads a state from a buffer in canonical ordering.
    /// Panics if `values` holds fewer than two entries.
    pub fn from_slice(values: &[f64]) -> Self {
        Self::new(values[0], values[1])
    }

    pub fn is_finite(&self) -> bool {
        self.employment.is_finite() && self.wage_share.is_finite()
    }
}

/// Converts an `f64` constant into the working scalar type.
pub(crate) fn lit<T: Scalar>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// The Goodwin model as an autonomous two-dimensional flow:
///
/// ```text
/// dv/dt = v * ((1/σ − (α+β)) − u/σ)
/// du/dt = u * (ρ v − (α+γ))
/// ```
///
/// A zero σ is not trapped; it yields non-finite derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoodwinModel {
    pub params: ModelParameters,
}

impl GoodwinModel {
    pub fn new(params: ModelParameters) -> Self {
        Self { params }
    }

    /// Value-returning evaluation of the field at `state`.
    pub fn derivative(&self, state: State) -> State {
        let mut out = [0.0; DIMENSION];
        DynamicalSystem::<f64>::apply(self, 0.0, &state.to_array(), &mut out);
        State::from_slice(&out)
    }

    /// Row-major Jacobian of the field at `state`.
    pub fn jacobian(&self, state: State) -> [f64; DIMENSION * DIMENSION] {
        let p = &self.params;
        let State {
            employment: v,
            wage_share: u,
        } = state;
        [
            p.intrinsic_growth() - u / p.sigma,
            -v / p.sigma,
            p.rho * u,
            p.rho * v - p.wage_decay(),
        ]
    }

    /// First integral `H(v, u) = ρv − (α+γ) ln v + u/σ − (1/σ − (α+β)) ln u`.
    ///
    /// `H` is constant along exact trajectories, so its drift measures the
    /// integration error. Only defined in the open positive quadrant.
    pub fn first_integral(&self, state: State) -> Option<f64> {
        if state.employment <= 0.0 || state.wage_share <= 0.0 {
            return None;
        }
        let p = &self.params;
        Some(
            p.rho * state.employment - p.wage_decay() * state.employment.ln()
                + state.wage_share / p.sigma
                - p.intrinsic_growth() * state.wage_share.ln(),
        )
    }
}

impl<T: Scalar> DynamicalSystem<T> for GoodwinModel {
    fn dimension(&self) -> usize {
        DIMENSION
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let sigma: T = lit(self.params.sigma);
        let alpha: T = lit(self.params.alpha);
        let beta: T = lit(self.params.beta);
        let gamma: T = lit(self.params.gamma);
        let rho: T = lit(self.params.rho);

        let v = x[0];
        let u = x[1];
        let growth = T::one() / sigma - (alpha + beta);

        out[0] = v * (growth - u / sigma);
        out[1] = u * (rho * v - (alpha + gamma));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_params() -> ModelParameters {
        ModelParameters::new(0.9, 0.02, 0.02, 0.02, 0.04)
    }

    #[test]
    fn derivative_matches_closed_form() {
        let model = GoodwinModel::new(reference_params());
        let d = model.derivative(State::new(0.9, 0.7));

        let expected_v = 0.9 * ((1.0 / 0.9 - 0.04) - 0.7 / 0.9);
        let expected_u = 0.7 * (0.04 * 0.9 - 0.04);
        assert!((d.employment - expected_v).abs() < 1e-14);
        assert!((d.wage_share - expected_u).abs() < 1e-14);
    }

    #[test]
    fn field_is_time_invariant() {
        let model = GoodwinModel::new(reference_params());
        let x = [0.8f64, 0.6];
        let mut at_zero = [0.0f64; 2];
        let mut later = [0.0f64; 2];
        model.apply(0.0f64, &x[..], &mut at_zero[..]);
        model.apply(123.4f64, &x[..], &mut later[..]);
        assert_eq!(at_zero, later);
    }

    #[test]
    fn axes_are_invariant() {
        let model = GoodwinModel::new(reference_params());
        assert_eq!(model.derivative(State::new(0.0, 0.5)).employment, 0.0);
        assert_eq!(model.derivative(State::new(0.5, 0.0)).wage_share, 0.0);
    }

    #[test]
    fn zero_sigma_propagates_non_finite_values() {
        let model = GoodwinModel::new(ModelParameters::new(0.0, 0.02, 0.02, 0.02, 0.04));
        let d = model.derivative(State::new(0.9, 0.7));
        assert!(!d.employment.is_finite());
    }

    #[test]
    fn generic_evaluation_agrees_with_f64() {
        let model = GoodwinModel::new(reference_params());
        let mut out64 = [0.0f64; 2];
        let mut out32 = [0.0f32; 2];
        model.apply(0.0f64, &[0.9f64, 0.7][..], &mut out64[..]);
        model.apply(0.0f32, &[0.9f32, 0.7][..], &mut out32[..]);
        for i in 0..2 {
            assert!((out64[i] - out32[i] as f64).abs() < 1e-6);
        }
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let model = GoodwinModel::new(reference_params());
        let state = State::new(0.85, 0.75);
        let jac = model.jacobian(state);
        let h = 1e-6;

        for j in 0..2 {
            let mut plus = state.to_array();
            let mut minus = state.to_array();
            plus[j] += h;
            minus[j] -= h;
            let fp = model.derivative(State::from_slice(&plus)).to_array();
            let fm = model.derivative(State::from_slice(&minus)).to_array();
            for i in 0..2 {
                let fd = (fp[i] - fm[i]) / (2.0 * h);
                assert!((jac[i * 2 + j] - fd).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn first_integral_gradient_is_orthogonal_to_field() {
        let model = GoodwinModel::new(reference_params());
        let state = State::new(0.9, 0.7);
        let h = 1e-6;
        let dh_dv = (model
            .first_integral(State::new(state.employment + h, state.wage_share))
            .unwrap()
            - model
                .first_integral(State::new(state.employment - h, state.wage_share))
                .unwrap())
            / (2.0 * h);
        let dh_du = (model
            .first_integral(State::new(state.employment, state.wage_share + h))
            .unwrap()
            - model
                .first_integral(State::new(state.employment, state.wage_share - h))
                .unwrap())
            / (2.0 * h);
        let d = model.derivative(state);
        assert!((dh_dv * d.employment + dh_du * d.wage_share).abs() < 1e-9);
    }

    #[test]
    fn first_integral_undefined_outside_positive_quadrant() {
        let model = GoodwinModel::new(reference_params());
        assert!(model.first_integral(State::new(0.0, 0.5)).is_none());
        assert!(model.first_integral(State::new(0.5, -0.1)).is_none());
    }
}
