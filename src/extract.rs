//! # Metric Extraction
//!
//! Pulls the small enumerated list of signals the orchestrator cares about
//! out of a step's returned state and converts them into that step's
//! contribution to the running totals. Everything else in the state is
//! opaque pass-through.
//!
//! The source signals live in the `"a"` (auxiliary flux) category and come
//! back in raw model units: harvested fruit mass in mg/m², energy in J/m².
//! Values must be finite; negatives are the stepper's contract to avoid and
//! are deliberately not clamped here.

use crate::error::ExtractError;
use crate::state::ModelState;

/// Category holding the model's auxiliary flux signals.
pub const AUX: &str = "a";

/// Cumulative harvested fruit dry-mass flux since simulation start (mg/m²).
pub const FRUIT_HARVEST: &str = "mcFruitHar";

/// Lamp energy inputs: toplights and interlights (J/m²).
pub const LAMP_SIGNALS: [&str; 2] = ["qLampIn", "qIntLampIn"];

/// Boiler heat into the rail and grow-pipe circuits (J/m²).
pub const BOILER_SIGNALS: [&str; 2] = ["hBoilPipe", "hBoilGroPipe"];

/// mg/m² -> kg/m².
const MG_TO_KG: f64 = 1e-6;

/// J/m² -> MJ/m².
const J_TO_MJ: f64 = 1e-6;

/// One step's contribution to the season totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContribution {
    pub yield_kg_m2: f64,
    pub lamp_mj_m2: f64,
    pub boil_mj_m2: f64,
}

fn finite_signal(state: &ModelState, category: &str, name: &str) -> Result<f64, ExtractError> {
    let value = state
        .signal(category, name)
        .ok_or_else(|| ExtractError::MissingSignal {
            category: category.to_string(),
            name: name.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ExtractError::InvalidSignal {
            category: category.to_string(),
            name: name.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Fresh-mass yield for one step, in kg/m².
///
/// Reads the harvested dry-mass flux, converts mg to kg and divides by the
/// dry matter content (fraction in (0, 1], validated at configuration time)
/// to get fresh mass.
pub fn extract_yield(state: &ModelState, dry_matter_content: f64) -> Result<f64, ExtractError> {
    let raw = finite_signal(state, AUX, FRUIT_HARVEST)?;
    Ok(MG_TO_KG * raw / dry_matter_content)
}

/// Combined energy input for one step across the named signals, in MJ/m².
///
/// `signals` must be non-empty; every name must be present and finite.
pub fn extract_energy(state: &ModelState, signals: &[&str]) -> Result<f64, ExtractError> {
    debug_assert!(!signals.is_empty(), "extract_energy needs at least one signal");
    let mut sum = 0.0;
    for name in signals {
        sum += finite_signal(state, AUX, name)?;
    }
    Ok(J_TO_MJ * sum)
}

/// All three per-step quantities in one pass.
pub fn extract_step(
    state: &ModelState,
    dry_matter_content: f64,
) -> Result<StepContribution, ExtractError> {
    Ok(StepContribution {
        yield_kg_m2: extract_yield(state, dry_matter_content)?,
        lamp_mj_m2: extract_energy(state, &LAMP_SIGNALS)?,
        boil_mj_m2: extract_energy(state, &BOILER_SIGNALS)?,
    })
}
