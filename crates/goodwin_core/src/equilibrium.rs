//! Closed-form equilibrium of the Goodwin model and its linearization.

use crate::model::{GoodwinModel, ModelParameters, State, DIMENSION};
use anyhow::{anyhow, bail, Context, Result};
use nalgebra::linalg::SVD;
use nalgebra::DMatrix;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// The interior fixed point of the Goodwin flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumPoint {
    pub employment: f64,
    pub wage_share: f64,
}

impl EquilibriumPoint {
    pub fn profit_share(&self) -> f64 {
        1.0 - self.wage_share
    }

    pub fn as_state(&self) -> State {
        State::new(self.employment, self.wage_share)
    }
}

/// Closed-form interior equilibrium:
///
/// ```text
/// v* = (α + γ) / ρ
/// u* = (1/σ − (α+β)) / (1/σ)
/// ```
///
/// No validation: ρ = 0 or σ = 0 yield non-finite values, and economically
/// meaningless parameter sets yield negative or greater-than-one shares.
pub fn equilibrium(params: &ModelParameters) -> EquilibriumPoint {
    let inverse_sigma = 1.0 / params.sigma;
    EquilibriumPoint {
        employment: params.wage_decay() / params.rho,
        wage_share: params.intrinsic_growth() / inverse_sigma,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquilibriumKind {
    Center,
    StableFocus,
    UnstableFocus,
    StableNode,
    UnstableNode,
    Saddle,
    /// At least one eigenvalue vanishes.
    Degenerate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EigenPair {
    pub value: Complex<f64>,
    pub vector: Vec<Complex<f64>>,
}

/// Local picture of the flow around the equilibrium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Linearization {
    pub point: EquilibriumPoint,
    /// Row-major Jacobian at `point`.
    pub jacobian: Vec<f64>,
    pub eigenpairs: Vec<EigenPair>,
    pub kind: EquilibriumKind,
    /// `2π / |Im λ|` for a complex eigenvalue pair, the period of small
    /// oscillations around the equilibrium.
    pub linear_period: Option<f64>,
}

/// Linearizes the model at its interior equilibrium.
///
/// For the Goodwin model the Jacobian there is `[[0, −v*/σ], [ρu*, 0]]`, whose
/// eigenvalues are `±i·sqrt(ρ u* v* / σ)`; the equilibrium is a centre.
pub fn linearize(params: &ModelParameters) -> Result<Linearization> {
    let point = equilibrium(params);
    if !point.employment.is_finite() || !point.wage_share.is_finite() {
        bail!(
            "Equilibrium is not finite (v* = {}, u* = {}).",
            point.employment,
            point.wage_share
        );
    }

    let model = GoodwinModel::new(*params);
    let jacobian = model.jacobian(point.as_state()).to_vec();
    let eigenpairs = compute_eigenpairs(DIMENSION, &jacobian)
        .context("Failed to compute eigenvalues/eigenvectors of Jacobian.")?;
    let values: Vec<Complex<f64>> = eigenpairs.iter().map(|pair| pair.value).collect();
    let kind = classify(&values);
    let linear_period = oscillation_frequency(&values).map(|omega| TAU / omega);

    Ok(Linearization {
        point,
        jacobian,
        eigenpairs,
        kind,
        linear_period,
    })
}

fn eigen_tolerance(values: &[Complex<f64>]) -> f64 {
    let scale = values.iter().map(|v| v.norm()).fold(0.0, f64::max);
    1e-9 * (1.0 + scale)
}

fn oscillation_frequency(values: &[Complex<f64>]) -> Option<f64> {
    let tol = eigen_tolerance(values);
    values
        .iter()
        .map(|v| v.im.abs())
        .filter(|im| *im > tol)
        .fold(None, |acc: Option<f64>, im| Some(acc.map_or(im, |a| a.max(im))))
}

fn classify(values: &[Complex<f64>]) -> EquilibriumKind {
    let tol = eigen_tolerance(values);
    if values.iter().any(|v| v.norm() <= tol) {
        return EquilibriumKind::Degenerate;
    }

    let complex = values.iter().any(|v| v.im.abs() > tol);
    if complex {
        let re = values[0].re;
        return if re.abs() <= tol {
            EquilibriumKind::Center
        } else if re < 0.0 {
            EquilibriumKind::StableFocus
        } else {
            EquilibriumKind::UnstableFocus
        };
    }

    let negative = values.iter().filter(|v| v.re < 0.0).count();
    match negative {
        n if n == values.len() => EquilibriumKind::StableNode,
        0 => EquilibriumKind::UnstableNode,
        _ => EquilibriumKind::Saddle,
    }
}

fn compute_eigenpairs(dim: usize, jacobian: &[f64]) -> Result<Vec<EigenPair>> {
    if jacobian.iter().any(|v| !v.is_finite()) {
        bail!("Jacobian contains non-finite entries.");
    }
    let matrix = DMatrix::from_row_slice(dim, dim, jacobian);
    let eigenvalues = matrix.complex_eigenvalues();
    let complex_matrix = matrix.map(|v| Complex::new(v, 0.0));

    let mut pairs = Vec::with_capacity(dim);
    for idx in 0..dim {
        let lambda = eigenvalues[idx];

        let mut shifted = complex_matrix.clone();
        for i in 0..dim {
            shifted[(i, i)] -= lambda;
        }

        // The right singular vector of the smallest singular value spans the
        // null space of (J - λI). Rows of V^H hold conjugated singular vectors.
        let svd = SVD::new(shifted, true, true);
        let row_index = svd
            .singular_values
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .ok_or_else(|| anyhow!("Empty singular value decomposition"))?;
        let v_t = svd
            .v_t
            .ok_or_else(|| anyhow!("Failed to compute eigenvector for eigenvalue index {}", idx))?;
        let mut vector: Vec<Complex<f64>> = v_t.row(row_index).iter().map(|c| c.conj()).collect();
        normalize_complex_vector(&mut vector);

        pairs.push(EigenPair {
            value: lambda,
            vector,
        });
    }
    Ok(pairs)
}

fn normalize_complex_vector(vec: &mut [Complex<f64>]) {
    let norm = vec.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    if norm > 0.0 {
        for entry in vec {
            *entry /= norm;
        }
    }
}
