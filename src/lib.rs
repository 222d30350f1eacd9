//! # Greenhouse Season Simulator
//!
//! Drives a time-stepped greenhouse climate-and-crop model over a multi-day
//! growth season, threading the model state from one step to the next and
//! accumulating season-level yield and energy totals.
//!
//! The physical model itself lives behind the [`stepper::Stepper`] trait;
//! this crate owns the orchestration loop ([`season`]), the metric
//! extraction ([`extract`]), and the season summary ([`summary`]).

pub mod config;
pub mod error;
pub mod extract;
pub mod report;
pub mod season;
#[cfg(feature = "sim")]
pub mod sim;
pub mod state;
pub mod stepper;
pub mod summary;
pub mod telemetry;

pub use config::Config;
pub use error::SeasonError;
pub use season::{run_season, RunningTotals, SeasonOutcome};
pub use state::ModelState;
pub use stepper::{Stepper, StepperError};
pub use summary::SeasonSummary;
