//! Post-processing of a Goodwin trajectory: ranges, cycle period, and the
//! drift of the conserved quantity.

use crate::equilibrium::EquilibriumPoint;
use crate::model::{GoodwinModel, State};
use crate::trajectory::Trajectory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        values.fold(
            Range {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |acc, x| Range {
                min: acc.min.min(x),
                max: acc.max.max(x),
            },
        )
    }

    pub fn amplitude(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub employment_range: Range,
    pub wage_share_range: Range,
    /// Number of upward crossings of employment through its equilibrium value.
    pub crossings: usize,
    /// Mean spacing of those crossings; `None` with fewer than two.
    pub period: Option<f64>,
    /// `max |H(t) − H(0)|` of the first integral; `None` once the orbit
    /// leaves the positive quadrant.
    pub invariant_drift: Option<f64>,
}

/// Summarises the oscillation of `trajectory` around `equilibrium`.
pub fn analyze_cycle(
    model: &GoodwinModel,
    trajectory: &Trajectory,
    equilibrium: &EquilibriumPoint,
) -> CycleSummary {
    let employment: Vec<f64> = trajectory.component(0).collect();
    let crossing_times = upward_crossings(trajectory.times(), &employment, equilibrium.employment);

    CycleSummary {
        employment_range: Range::of(employment.iter().copied()),
        wage_share_range: Range::of(trajectory.component(1)),
        crossings: crossing_times.len(),
        period: mean_spacing(&crossing_times),
        invariant_drift: invariant_drift(model, trajectory),
    }
}

/// Times at which `values` rises through `level`, linearly interpolated
/// between samples.
pub fn upward_crossings(times: &[f64], values: &[f64], level: f64) -> Vec<f64> {
    times
        .windows(2)
        .zip(values.windows(2))
        .filter(|(_, v)| v[0] < level && v[1] >= level)
        .map(|(t, v)| t[0] + (level - v[0]) / (v[1] - v[0]) * (t[1] - t[0]))
        .collect()
}

fn mean_spacing(times: &[f64]) -> Option<f64> {
    match times {
        [first, .., last] => Some((last - first) / (times.len() - 1) as f64),
        _ => None,
    }
}

fn invariant_drift(model: &GoodwinModel, trajectory: &Trajectory) -> Option<f64> {
    let mut values = (0..trajectory.len())
        .map(|i| model.first_integral(State::from_slice(trajectory.state(i))));
    let initial = values.next()??;
    values.try_fold(0.0f64, |drift, h| Some(drift.max((h? - initial).abs())))
}
