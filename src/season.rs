//! # Season Orchestration
//!
//! The core loop: exactly `floor(season_length / season_interval)` stepper
//! calls, strictly sequential, each consuming the state the previous call
//! returned. After every successful step the extraction signals are folded
//! into an explicit accumulator value; any stepper or extraction fault
//! aborts the run at that step and the partial totals are discarded with it.

use crate::config::SeasonConfig;
use crate::error::SeasonError;
use crate::extract::{self, StepContribution};
use crate::report::{StepObservation, StepReporter};
use crate::state::ModelState;
use crate::stepper::Stepper;
use tracing::{debug, info};

/// Season-level accumulators, folded once per step.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RunningTotals {
    /// Cumulative fresh-mass yield (kg/m²).
    pub yield_kg_m2: f64,
    /// Cumulative lamp energy input (MJ/m²).
    pub lamp_mj_m2: f64,
    /// Cumulative boiler heat input (MJ/m²).
    pub boil_mj_m2: f64,
}

impl RunningTotals {
    pub const ZERO: Self = Self {
        yield_kg_m2: 0.0,
        lamp_mj_m2: 0.0,
        boil_mj_m2: 0.0,
    };

    /// Fold one step's contribution into a new accumulator value.
    #[must_use]
    pub fn add(self, c: StepContribution) -> Self {
        Self {
            yield_kg_m2: self.yield_kg_m2 + c.yield_kg_m2,
            lamp_mj_m2: self.lamp_mj_m2 + c.lamp_mj_m2,
            boil_mj_m2: self.boil_mj_m2 + c.boil_mj_m2,
        }
    }
}

/// Result of a completed season run.
#[derive(Debug, Clone)]
pub struct SeasonOutcome {
    /// State returned by the last step (the initial state for a zero-step
    /// season).
    pub final_state: ModelState,
    pub totals: RunningTotals,
}

/// Run one full growth season.
///
/// Threads `initial_state` through `config.total_steps()` sequential calls
/// to `stepper.advance`, replacing the held state with each return value,
/// and accumulates yield and energy totals from the extraction signals.
/// Per-step observations go to `reporter` fire-and-forget; the reporter has
/// no way to influence the loop.
///
/// Fail-fast: the first stepper or extraction error aborts the whole run.
/// A season shorter than one interval executes zero steps and returns zero
/// totals with the initial state untouched.
pub fn run_season<S: Stepper, R: StepReporter + ?Sized>(
    config: &SeasonConfig,
    initial_state: ModelState,
    stepper: &mut S,
    reporter: &mut R,
) -> Result<SeasonOutcome, SeasonError> {
    config.validate()?;

    let total_steps = config.total_steps();
    info!(
        total_steps,
        season_length_days = config.season_length_days,
        season_interval_days = config.season_interval_days,
        "starting season run"
    );

    let mut state = initial_state;
    let mut totals = RunningTotals::ZERO;

    for step in 0..total_steps {
        state = stepper
            .advance(
                state,
                config.season_length_days,
                config.season_interval_days,
                step,
            )
            .map_err(|source| SeasonError::Stepper { step, source })?;

        let contribution =
            extract::extract_step(&state, config.dry_matter_content).map_err(|e| e.at_step(step))?;
        totals = totals.add(contribution);

        debug!(
            step,
            step_yield_kg_m2 = contribution.yield_kg_m2,
            total_yield_kg_m2 = totals.yield_kg_m2,
            "step complete"
        );

        reporter.on_step(&StepObservation {
            step,
            state: &state,
            yield_kg_m2: contribution.yield_kg_m2,
        });
    }

    Ok(SeasonOutcome {
        final_state: state,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeasonConfig;
    use crate::extract::{AUX, BOILER_SIGNALS, FRUIT_HARVEST, LAMP_SIGNALS};
    use crate::report::NullReporter;
    use crate::stepper::StepperError;

    fn season(length: f64, interval: f64) -> SeasonConfig {
        SeasonConfig {
            season_length_days: length,
            season_interval_days: interval,
            first_day: 91,
            is_mature: true,
            dry_matter_content: 0.06,
        }
    }

    /// Returns the same fluxes every step, and tags each returned state with
    /// the step index that produced it so threading can be asserted.
    struct ConstantStepper {
        harvest: f64,
        lamp: f64,
        boil: f64,
    }

    impl Stepper for ConstantStepper {
        fn advance(
            &mut self,
            mut state: ModelState,
            _length: f64,
            _interval: f64,
            step: usize,
        ) -> Result<ModelState, StepperError> {
            // The state we receive must be the one we tagged last time.
            if step > 0 {
                assert_eq!(state.signal("t", "producedBy"), Some((step - 1) as f64));
            }
            state.set("t", "producedBy", step as f64);
            state.set(AUX, FRUIT_HARVEST, self.harvest);
            for name in LAMP_SIGNALS {
                state.set(AUX, name, 0.0);
            }
            for name in BOILER_SIGNALS {
                state.set(AUX, name, 0.0);
            }
            state.set(AUX, "qLampIn", self.lamp);
            state.set(AUX, "hBoilPipe", self.boil);
            Ok(state)
        }
    }

    #[test]
    fn test_step_count_floor() {
        assert_eq!(season(10.0, 1.0 / 24.0 / 4.0).total_steps(), 960);
        assert_eq!(season(1.0, 1.0).total_steps(), 1);
        assert_eq!(season(2.5, 1.0).total_steps(), 2);
        assert_eq!(season(0.5, 1.0).total_steps(), 0);
    }

    #[test]
    fn test_state_threading_and_accumulation() {
        let config = season(4.0, 1.0);
        let mut stepper = ConstantStepper {
            harvest: 6000.0,
            lamp: 100.0,
            boil: 50.0,
        };

        let outcome =
            run_season(&config, ModelState::new(), &mut stepper, &mut NullReporter).unwrap();

        // Final state carries the last step's tag.
        assert_eq!(outcome.final_state.signal("t", "producedBy"), Some(3.0));
        assert!((outcome.totals.yield_kg_m2 - 0.4).abs() < 1e-12);
        assert!((outcome.totals.lamp_mj_m2 - 4e-4).abs() < 1e-15);
        assert!((outcome.totals.boil_mj_m2 - 2e-4).abs() < 1e-15);
    }

    #[test]
    fn test_zero_step_season() {
        let config = season(0.5, 1.0);
        let mut stepper = ConstantStepper {
            harvest: 6000.0,
            lamp: 100.0,
            boil: 50.0,
        };
        let initial = ModelState::new().with("p", "aFlr", 4e4);

        let outcome = run_season(&config, initial.clone(), &mut stepper, &mut NullReporter).unwrap();

        assert_eq!(outcome.totals, RunningTotals::ZERO);
        assert_eq!(outcome.final_state, initial);
    }

    #[test]
    fn test_stepper_failure_aborts_with_step_context() {
        struct FailAt(usize);
        impl Stepper for FailAt {
            fn advance(
                &mut self,
                mut state: ModelState,
                _l: f64,
                _i: f64,
                step: usize,
            ) -> Result<ModelState, StepperError> {
                if step == self.0 {
                    return Err(StepperError::Integration("solver diverged".into()));
                }
                state.set(AUX, FRUIT_HARVEST, 6000.0);
                state.set(AUX, "qLampIn", 0.0);
                state.set(AUX, "qIntLampIn", 0.0);
                state.set(AUX, "hBoilPipe", 0.0);
                state.set(AUX, "hBoilGroPipe", 0.0);
                Ok(state)
            }
        }

        let config = season(5.0, 1.0);
        let err = run_season(&config, ModelState::new(), &mut FailAt(3), &mut NullReporter)
            .unwrap_err();

        assert!(matches!(err, SeasonError::Stepper { step: 3, .. }));
    }

    #[test]
    fn test_invalid_config_rejected_before_loop() {
        struct Unreachable;
        impl Stepper for Unreachable {
            fn advance(
                &mut self,
                _s: ModelState,
                _l: f64,
                _i: f64,
                _k: usize,
            ) -> Result<ModelState, StepperError> {
                panic!("stepper called despite invalid config");
            }
        }

        let config = season(-1.0, 1.0);
        let err = run_season(&config, ModelState::new(), &mut Unreachable, &mut NullReporter)
            .unwrap_err();
        assert!(matches!(err, SeasonError::Configuration(_)));
    }
}
