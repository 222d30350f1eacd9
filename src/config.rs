//! # Configuration
//!
//! Layered configuration in the figment style: `config/default.toml` merged
//! with `GHS__`-prefixed environment variables (split on `__`). The season
//! section is validated before a run starts; the greenhouse geometry,
//! equipment and control sections are never interpreted here — they are
//! folded verbatim into the `"p"` category of the initial model state and
//! forwarded to the stepper on every call.

use crate::error::SeasonError;
use crate::state::ModelState;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub season: SeasonConfig,
    pub weather: WeatherConfig,
    pub greenhouse: GreenhouseConfig,
    pub equipment: EquipmentConfig,
    pub control: ControlConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Season timing and crop constants. The only section the core interprets.
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonConfig {
    /// Length of the growth cycle in days; fractions allowed.
    pub season_length_days: f64,
    /// Interval of one model step as a fraction of a day
    /// (e.g. 1/96 = 15 minutes).
    pub season_interval_days: f64,
    /// First day of the growth cycle (day of the year).
    pub first_day: u32,
    /// Whether the crop starts the season mature.
    pub is_mature: bool,
    /// Dry matter fraction of harvested biomass, in (0, 1].
    pub dry_matter_content: f64,
}

impl SeasonConfig {
    /// Number of steps in the season: `floor(length / interval)`.
    pub fn total_steps(&self) -> usize {
        (self.season_length_days / self.season_interval_days).floor() as usize
    }

    pub fn validate(&self) -> Result<(), SeasonError> {
        if !(self.season_length_days > 0.0) {
            return Err(SeasonError::Configuration(format!(
                "season_length_days must be > 0, got {}",
                self.season_length_days
            )));
        }
        if !(self.season_interval_days > 0.0) {
            return Err(SeasonError::Configuration(format!(
                "season_interval_days must be > 0, got {}",
                self.season_interval_days
            )));
        }
        if !(self.dry_matter_content > 0.0 && self.dry_matter_content <= 1.0) {
            return Err(SeasonError::Configuration(format!(
                "dry_matter_content must be in (0, 1], got {}",
                self.dry_matter_content
            )));
        }
        Ok(())
    }
}

/// Weather data source. Opaque to the core: handed to the stepper at
/// construction time, never parsed here.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub epw_path: String,
}

/// Greenhouse structure. Field names are engineering-friendly; the model
/// parameter keys they map to are listed per field.
#[derive(Debug, Clone, Deserialize)]
pub struct GreenhouseConfig {
    /// Mean slope of the cover, degrees (`psi`).
    pub cover_slope_deg: f64,
    /// Floor area, m² (`aFlr`).
    pub floor_area_m2: f64,
    /// Cover area including side walls, m² (`aCov`).
    pub cover_area_m2: f64,
    /// Height of the main air compartment, m (`hAir`).
    pub air_height_m: f64,
    /// Mean greenhouse height, m (`hGh`).
    pub mean_height_m: f64,
    /// Maximum roof ventilation area, m² (`aRoof`).
    pub roof_vent_area_m2: f64,
    /// Vertical dimension of a single vent opening, m (`hVent`).
    pub vent_height_m: f64,
    /// Vent discharge coefficient, dimensionless (`cDgh`).
    pub discharge_coefficient: f64,
    /// Pipe-rail heating length, m per m² floor (`lPipe`).
    pub pipe_length_m_per_m2: f64,
}

/// Installed equipment capacities.
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentConfig {
    /// CO2 injection capacity for the whole greenhouse, mg/s (`phiExtCo2`).
    pub co2_injection_mg_s: f64,
    /// Boiler capacity for the whole greenhouse, W (`pBoil`).
    pub boiler_capacity_w: f64,
}

/// Climate control setpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    /// CO2 setpoint during the light period, ppm (`co2SpDay`).
    pub co2_setpoint_day_ppm: f64,
    /// Temperature setpoint during the dark period, °C (`tSpNight`).
    pub temp_setpoint_night_c: f64,
    /// Temperature setpoint during the light period, °C (`tSpDay`).
    pub temp_setpoint_day_c: f64,
    /// Maximum relative humidity, % (`rhMax`).
    pub humidity_max_percent: f64,
    /// P-band for ventilation at high temperature, °C (`ventHeatPband`).
    pub vent_heat_pband_c: f64,
    /// P-band for ventilation at high humidity, % (`ventRhPband`).
    pub vent_rh_pband_percent: f64,
    /// P-band for screen opening at high humidity, % (`thScrRhPband`).
    pub screen_rh_pband_percent: f64,
    /// Hour lamps switch on (`lampsOn`).
    pub lamps_on_h: f64,
    /// Hour lamps switch off (`lampsOff`).
    pub lamps_off_h: f64,
    /// Global radiation above which lamps switch off, W/m² (`lampsOffSun`).
    pub lamps_off_sun_w_m2: f64,
    /// Predicted daily radiation sum below which lamps are used,
    /// MJ/m²/day (`lampRadSumLimit`).
    pub lamp_rad_sum_limit_mj_m2: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// When set, every step is appended as a JSON line to this file.
    pub step_log: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("GHS__").split("__"));
        Ok(figment.extract()?)
    }

    /// Initial model state: every structural parameter, capacity and
    /// setpoint under the `"p"` category, using the model's own key names.
    pub fn initial_state(&self) -> ModelState {
        let gh = &self.greenhouse;
        let eq = &self.equipment;
        let c = &self.control;
        ModelState::new()
            .with("p", "psi", gh.cover_slope_deg)
            .with("p", "aFlr", gh.floor_area_m2)
            .with("p", "aCov", gh.cover_area_m2)
            .with("p", "hAir", gh.air_height_m)
            .with("p", "hGh", gh.mean_height_m)
            .with("p", "aRoof", gh.roof_vent_area_m2)
            .with("p", "hVent", gh.vent_height_m)
            .with("p", "cDgh", gh.discharge_coefficient)
            .with("p", "lPipe", gh.pipe_length_m_per_m2)
            .with("p", "phiExtCo2", eq.co2_injection_mg_s)
            .with("p", "pBoil", eq.boiler_capacity_w)
            .with("p", "co2SpDay", c.co2_setpoint_day_ppm)
            .with("p", "tSpNight", c.temp_setpoint_night_c)
            .with("p", "tSpDay", c.temp_setpoint_day_c)
            .with("p", "rhMax", c.humidity_max_percent)
            .with("p", "ventHeatPband", c.vent_heat_pband_c)
            .with("p", "ventRhPband", c.vent_rh_pband_percent)
            .with("p", "thScrRhPband", c.screen_rh_pband_percent)
            .with("p", "lampsOn", c.lamps_on_h)
            .with("p", "lampsOff", c.lamps_off_h)
            .with("p", "lampsOffSun", c.lamps_off_sun_w_m2)
            .with("p", "lampRadSumLimit", c.lamp_rad_sum_limit_mj_m2)
    }
}
