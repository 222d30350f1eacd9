use crate::state::ModelState;
use crate::stepper::{Stepper, StepperError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Synthetic stepper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticStepperConfig {
    /// First day of the season (day of the year); drives the daylight curve.
    pub first_day: u32,
    /// Mature crops harvest from step 0; immature ones ramp up over the
    /// first weeks of the season.
    pub is_mature: bool,
    /// Weather source path, recorded but never parsed by the synthetic
    /// stepper (the real model reads it; here weather is generated).
    pub epw_path: String,
    /// Nominal lamp electrical input per unit floor area (W/m²).
    pub lamp_power_w_m2: f64,
    /// Nominal boiler heat per degree of heating demand (W/m²/°C).
    pub heat_per_degree_w_m2: f64,
    /// Random seed for reproducibility (None = random).
    pub random_seed: Option<u64>,
}

impl Default for SyntheticStepperConfig {
    fn default() -> Self {
        Self {
            first_day: 91,
            is_mature: true,
            epw_path: String::new(),
            lamp_power_w_m2: 100.0,
            heat_per_degree_w_m2: 4.0,
            random_seed: None,
        }
    }
}

/// Schedule-plus-noise greenhouse stand-in.
///
/// Each `advance` call keeps the incoming parameter set untouched, then
/// rewrites the `"a"` flux signals and a handful of `"x"` climate signals
/// for the step. Fluxes are per-step integrals in the model's raw units
/// (mg/m² for harvest mass, J/m² for energy).
pub struct SyntheticStepper {
    config: SyntheticStepperConfig,
    rng: StdRng,
}

impl SyntheticStepper {
    pub fn new(config: SyntheticStepperConfig) -> Self {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    fn param(state: &ModelState, name: &str) -> Result<f64, StepperError> {
        state.signal("p", name).ok_or_else(|| {
            StepperError::InvalidState(format!("required parameter 'p.{name}' not set"))
        })
    }

    /// Crude clear-sky global radiation (W/m²) from hour of day and season.
    fn sun_w_m2(&self, day_of_year: f64, hour: f64) -> f64 {
        let day_angle = 2.0 * PI * (day_of_year - 172.0) / 365.0;
        let peak = 650.0 + 300.0 * day_angle.cos();
        let elevation = (PI * (hour - 6.0) / 12.0).sin();
        (peak * elevation).max(0.0)
    }

    /// Outdoor temperature proxy (°C): seasonal mean plus a diurnal swing.
    fn outdoor_temp_c(&self, day_of_year: f64, hour: f64) -> f64 {
        let day_angle = 2.0 * PI * (day_of_year - 196.0) / 365.0;
        let mean = 12.0 + 9.0 * day_angle.cos();
        mean + 4.0 * (PI * (hour - 9.0) / 12.0).sin()
    }

    fn noise(&mut self, std_dev: f64) -> f64 {
        // Normal::new only fails on non-finite/negative std dev.
        match Normal::new(0.0, std_dev) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => 0.0,
        }
    }
}

impl Stepper for SyntheticStepper {
    fn advance(
        &mut self,
        mut state: ModelState,
        _season_length_days: f64,
        season_interval_days: f64,
        step_index: usize,
    ) -> Result<ModelState, StepperError> {
        if !(season_interval_days > 0.0) {
            return Err(StepperError::InvalidState(format!(
                "non-positive step interval {season_interval_days}"
            )));
        }

        let lamps_on = Self::param(&state, "lampsOn")?;
        let lamps_off = Self::param(&state, "lampsOff")?;
        let lamps_off_sun = Self::param(&state, "lampsOffSun")?;
        let t_sp_day = Self::param(&state, "tSpDay")?;
        let t_sp_night = Self::param(&state, "tSpNight")?;

        let elapsed_days = step_index as f64 * season_interval_days;
        let day_of_year = self.config.first_day as f64 + elapsed_days.floor();
        let hour = elapsed_days.fract() * 24.0;
        let step_seconds = season_interval_days * SECONDS_PER_DAY;

        let sun = self.sun_w_m2(day_of_year, hour);
        let daylight = sun > 5.0;

        // Lamps follow the configured on/off window and yield to the sun.
        let lamps_scheduled = hour >= lamps_on && hour < lamps_off;
        let lamp_w = if lamps_scheduled && sun < lamps_off_sun {
            self.config.lamp_power_w_m2 * (1.0 + self.noise(0.02))
        } else {
            0.0
        };

        // Heating demand against the day/night setpoint.
        let setpoint = if daylight { t_sp_day } else { t_sp_night };
        let outdoor = self.outdoor_temp_c(day_of_year, hour);
        let deficit = (setpoint - outdoor).max(0.0);
        let heat_w = self.config.heat_per_degree_w_m2 * deficit * (1.0 + self.noise(0.05));

        // Harvest ramps in over the first weeks unless the crop is mature.
        let maturity = if self.config.is_mature {
            1.0
        } else {
            (elapsed_days / 40.0).min(1.0)
        };
        let light_w = sun.min(lamps_off_sun) + lamp_w;
        let harvest_mg_m2 =
            (0.9 * maturity * light_w * step_seconds / 1000.0) * (1.0 + self.noise(0.1));

        let indoor_c = setpoint + self.noise(0.3);

        state.set("a", "mcFruitHar", harvest_mg_m2.max(0.0));
        state.set("a", "qLampIn", 0.82 * lamp_w * step_seconds);
        state.set("a", "qIntLampIn", 0.18 * lamp_w * step_seconds);
        state.set("a", "hBoilPipe", 0.75 * heat_w * step_seconds);
        state.set("a", "hBoilGroPipe", 0.25 * heat_w * step_seconds);
        state.set("x", "tAir", indoor_c);
        state.set("x", "co2Air", 400.0 + self.rng.gen_range(0.0..700.0));
        state.set("x", "rhAir", 70.0 + self.rng.gen_range(0.0..15.0));
        state.set("d", "iGlob", sun);
        state.set("d", "tOut", outdoor);

        Ok(state)
    }
}
