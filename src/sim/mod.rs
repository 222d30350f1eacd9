//! # Synthetic Stepper (`sim` feature)
//!
//! A seeded stand-in for the real greenhouse model so the binary and the
//! integration tests can run a full season without external model code.
//! It reads the lamp schedule and temperature setpoints from the forwarded
//! parameters and produces plausible harvest, lamp and boiler fluxes from
//! simple schedules plus noise. It is not a physical model: no heat or mass
//! balance is solved here.

pub mod synthetic;

pub use synthetic::{SyntheticStepper, SyntheticStepperConfig};
