//! Error type shared by the solver and the simulation entry point.

use thiserror::Error;

pub type SimResult<T> = Result<T, SimulationError>;

/// Failures of a single simulation request. None of them are recoverable
/// inside the core; callers adjust their inputs and retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// An input would make the model or the time grid meaningless
    /// (zero divisor, non-finite value, empty or reversed time span).
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The integrated state left the finite numbers.
    #[error("state became non-finite at step {step} (t = {time}): {state:?}")]
    NumericalInstability {
        step: usize,
        time: f64,
        state: Vec<f64>,
    },

    /// The time span and step size imply more steps than allowed.
    #[error("simulation would need {steps} steps, exceeding the limit of {limit}")]
    ResourceBound { steps: f64, limit: usize },
}

impl SimulationError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        SimulationError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = SimulationError::invalid("sigma", 0.0, "must be non-zero");
        assert_eq!(
            err.to_string(),
            "invalid parameter `sigma` = 0: must be non-zero"
        );

        let err = SimulationError::ResourceBound {
            steps: 2_000_000.0,
            limit: 1_000_000,
        };
        assert!(err.to_string().contains("exceeding the limit of 1000000"));
    }
}
