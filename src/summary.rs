//! Season-level summary: the three cumulative totals plus the derived
//! specific energy consumption (total energy input per unit of harvested
//! yield). A zero-yield season leaves the metric explicitly undefined
//! rather than producing a non-finite number.

use crate::season::RunningTotals;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub total_yield_kg_m2: f64,
    pub lamp_energy_mj_m2: f64,
    pub boil_energy_mj_m2: f64,
    /// `(lamp + boil) / yield`, `None` when the season produced no yield.
    pub specific_energy_mj_per_kg: Option<f64>,
}

impl SeasonSummary {
    pub fn from_totals(totals: &RunningTotals) -> Self {
        let energy = totals.lamp_mj_m2 + totals.boil_mj_m2;
        let specific_energy = if totals.yield_kg_m2 > 0.0 {
            Some(energy / totals.yield_kg_m2)
        } else {
            None
        };

        Self {
            total_yield_kg_m2: totals.yield_kg_m2,
            lamp_energy_mj_m2: totals.lamp_mj_m2,
            boil_energy_mj_m2: totals.boil_mj_m2,
            specific_energy_mj_per_kg: specific_energy,
        }
    }
}

impl fmt::Display for SeasonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total yield: {:.2} kg/m2", self.total_yield_kg_m2)?;
        writeln!(
            f,
            "Lighting energy consumption: {:.2} MJ/m2",
            self.lamp_energy_mj_m2
        )?;
        writeln!(
            f,
            "Heating energy consumption: {:.2} MJ/m2",
            self.boil_energy_mj_m2
        )?;
        match self.specific_energy_mj_per_kg {
            Some(se) => write!(f, "Energy consumption per unit: {se:.2} MJ/kg"),
            None => write!(f, "Energy consumption per unit: undefined (zero yield)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_energy() {
        let totals = RunningTotals {
            yield_kg_m2: 0.1,
            lamp_mj_m2: 1e-4,
            boil_mj_m2: 5e-5,
        };
        let summary = SeasonSummary::from_totals(&totals);
        let se = summary.specific_energy_mj_per_kg.unwrap();
        assert!((se - 1.5e-3).abs() < 1e-15);
    }

    #[test]
    fn test_zero_yield_leaves_metric_undefined() {
        let totals = RunningTotals {
            yield_kg_m2: 0.0,
            lamp_mj_m2: 2.0,
            boil_mj_m2: 3.0,
        };
        let summary = SeasonSummary::from_totals(&totals);

        // Totals stay reportable; only the ratio is undefined.
        assert_eq!(summary.specific_energy_mj_per_kg, None);
        assert!((summary.lamp_energy_mj_m2 - 2.0).abs() < 1e-12);
        assert!(summary.to_string().contains("undefined (zero yield)"));
    }

    #[test]
    fn test_display_formats_all_totals() {
        let totals = RunningTotals {
            yield_kg_m2: 52.5,
            lamp_mj_m2: 310.0,
            boil_mj_m2: 745.25,
        };
        let text = SeasonSummary::from_totals(&totals).to_string();
        assert!(text.contains("Total yield: 52.50 kg/m2"));
        assert!(text.contains("Lighting energy consumption: 310.00 MJ/m2"));
        assert!(text.contains("Heating energy consumption: 745.25 MJ/m2"));
        assert!(text.contains("MJ/kg"));
    }
}
