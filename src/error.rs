//! Error taxonomy for a season run.
//!
//! Every step-level fault is fatal: step *k+1* consumes the exact output of
//! step *k*, so a single bad step invalidates the rest of the trajectory.
//! There are no retries and no partial-season recovery; errors carry the
//! step index and signal name so a failed run is diagnosable.

use crate::stepper::StepperError;
use thiserror::Error;

/// Fatal errors raised while preparing or running a season.
#[derive(Debug, Error)]
pub enum SeasonError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("step {step}: required signal '{category}.{name}' missing from model state")]
    MissingSignal {
        step: usize,
        category: String,
        name: String,
    },

    #[error("step {step}: signal '{category}.{name}' has non-finite value {value}")]
    InvalidSignal {
        step: usize,
        category: String,
        name: String,
        value: f64,
    },

    #[error("step {step}: model stepper failed")]
    Stepper {
        step: usize,
        #[source]
        source: StepperError,
    },
}

/// Extraction faults, raised without step context by [`crate::extract`];
/// the orchestrator attaches the step index via [`ExtractError::at_step`].
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("signal '{category}.{name}' missing from model state")]
    MissingSignal { category: String, name: String },

    #[error("signal '{category}.{name}' has non-finite value {value}")]
    InvalidSignal {
        category: String,
        name: String,
        value: f64,
    },
}

impl ExtractError {
    /// Promote to a [`SeasonError`] carrying the failing step index.
    pub fn at_step(self, step: usize) -> SeasonError {
        match self {
            ExtractError::MissingSignal { category, name } => SeasonError::MissingSignal {
                step,
                category,
                name,
            },
            ExtractError::InvalidSignal {
                category,
                name,
                value,
            } => SeasonError::InvalidSignal {
                step,
                category,
                name,
                value,
            },
        }
    }
}
