//! # Model Stepper Capability
//!
//! Boundary between the orchestration loop and the physical greenhouse
//! model. The stepper owns everything the loop does not want to know about:
//! weather data, integration scheme, internal model variables. The loop only
//! ever calls [`Stepper::advance`], once per step, and adopts the returned
//! state wholesale.

use crate::state::ModelState;
use thiserror::Error;

/// Stepper-internal faults, propagated unmodified by the orchestrator.
#[derive(Debug, Error)]
pub enum StepperError {
    #[error("weather data error: {0}")]
    WeatherData(String),

    #[error("model integration failed: {0}")]
    Integration(String),

    #[error("invalid input state: {0}")]
    InvalidState(String),
}

/// Advances the simulated greenhouse by one time interval.
///
/// `advance` consumes the state returned by the previous call (or the
/// initial configuration state for step 0) and returns the successor state.
/// The call is synchronous and may be arbitrarily expensive; it is the only
/// blocking point in the season loop. Implementations resolve time-of-day,
/// day-of-year and weather offsets from `step_index` together with the
/// season interval.
pub trait Stepper {
    fn advance(
        &mut self,
        state: ModelState,
        season_length_days: f64,
        season_interval_days: f64,
        step_index: usize,
    ) -> Result<ModelState, StepperError>;
}
