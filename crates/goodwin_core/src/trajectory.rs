//! Fixed-step integration over a finite time span.

use crate::error::{SimResult, SimulationError};
use crate::solvers::RK4;
use crate::traits::{DynamicalSystem, Steppable};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Relative distance from an integer below which a step ratio snaps to it.
const STEP_RATIO_SNAP: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The span `[0, end]`.
    pub fn from_origin(end: f64) -> Self {
        Self::new(0.0, end)
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.start.is_finite() {
            return Err(SimulationError::invalid(
                "t_start",
                self.start,
                "must be finite",
            ));
        }
        if !self.end.is_finite() {
            return Err(SimulationError::invalid("t_end", self.end, "must be finite"));
        }
        if self.end <= self.start {
            return Err(SimulationError::invalid(
                "t_end",
                self.end,
                "must be greater than t_start",
            ));
        }
        Ok(())
    }
}

/// Number of uniform intervals needed to cover `length` with steps no larger
/// than `dt`, i.e. `ceil(length / dt)`.
///
/// Ratios within a relative 1e-9 of an integer (such as `200 / 0.1`) snap to
/// that integer instead of being bumped to the next one, so the resulting step
/// may exceed `dt` by at most that relative amount. Always at least one.
pub fn step_count(length: f64, dt: f64) -> f64 {
    let ratio = length / dt;
    let nearest = ratio.round();
    let steps = if (ratio - nearest).abs() <= STEP_RATIO_SNAP * nearest.max(1.0) {
        nearest
    } else {
        ratio.ceil()
    };
    steps.max(1.0)
}

/// Samples of a trajectory on a uniform time grid.
///
/// States are stored row-major: sample `i` occupies
/// `states[i * dimension..(i + 1) * dimension]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    dimension: usize,
    times: Vec<f64>,
    states: Vec<f64>,
}

impl Trajectory {
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn state(&self, index: usize) -> &[f64] {
        &self.states[index * self.dimension..(index + 1) * self.dimension]
    }

    pub fn sample(&self, index: usize) -> (f64, &[f64]) {
        (self.times[index], self.state(index))
    }

    pub fn final_state(&self) -> Option<&[f64]> {
        self.len().checked_sub(1).map(|last| self.state(last))
    }

    /// One state variable across all samples.
    pub fn component(&self, var: usize) -> impl Iterator<Item = f64> + '_ {
        self.states
            .chunks_exact(self.dimension)
            .map(move |row| row[var])
    }
}

/// Integrates `system` from `initial_state` across `span` with classical RK4.
///
/// The span is split into `step_count(span.length(), dt)` equal intervals, so
/// the effective step exceeds `dt` by at most a relative 1e-9 and the last
/// sample lands exactly on `span.end`. The first sample is `(span.start, initial_state)` unchanged.
///
/// Fails before allocating if the request needs more than `max_steps` steps,
/// and as soon as the state becomes non-finite.
pub fn integrate<S>(
    system: &S,
    initial_state: &[f64],
    span: TimeSpan,
    dt: f64,
    max_steps: usize,
) -> SimResult<Trajectory>
where
    S: DynamicalSystem<f64>,
{
    let dim = system.dimension();
    if initial_state.len() != dim {
        return Err(SimulationError::invalid(
            "initial_state",
            initial_state.len() as f64,
            "length must match the system dimension",
        ));
    }
    if let Some(&bad) = initial_state.iter().find(|x| !x.is_finite()) {
        return Err(SimulationError::invalid(
            "initial_state",
            bad,
            "must be finite",
        ));
    }
    if !dt.is_finite() || dt <= 0.0 {
        return Err(SimulationError::invalid(
            "dt",
            dt,
            "must be finite and positive",
        ));
    }
    span.validate()?;

    let steps = step_count(span.length(), dt);
    if steps > max_steps as f64 {
        warn!(steps, limit = max_steps, "rejecting oversized integration");
        return Err(SimulationError::ResourceBound {
            steps,
            limit: max_steps,
        });
    }
    let n = steps as usize;
    let h = span.length() / n as f64;

    let mut times = Vec::with_capacity(n + 1);
    let mut states = Vec::with_capacity((n + 1) * dim);
    times.push(span.start);
    states.extend_from_slice(initial_state);

    let mut solver = RK4::<f64>::new(dim);
    let mut state = initial_state.to_vec();
    let mut t = span.start;

    for step in 1..=n {
        solver.step(system, &mut t, &mut state, h);
        // Re-anchor on the grid so rounding does not accumulate in t.
        t = if step == n {
            span.end
        } else {
            span.start + step as f64 * h
        };

        if state.iter().any(|x| !x.is_finite()) {
            warn!(step, time = t, "integration diverged");
            return Err(SimulationError::NumericalInstability {
                step,
                time: t,
                state,
            });
        }

        times.push(t);
        states.extend_from_slice(&state);
    }

    Ok(Trajectory {
        dimension: dim,
        times,
        states,
    })
}
