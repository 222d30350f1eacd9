//! # Step Reporting
//!
//! Fire-and-forget sinks for per-step observations and the final season
//! snapshot. The orchestrator emits to a reporter after every step but never
//! reads anything back; a reporter cannot fail or slow down the run beyond
//! the cost of its own I/O. This is the seam where a future telemetry
//! channel (MQTT, plotting frontend) plugs in without touching the loop.

use crate::state::ModelState;
use crate::summary::SeasonSummary;
use chrono::Utc;
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

/// One step's observation, borrowed from the loop.
#[derive(Debug, Clone, Copy)]
pub struct StepObservation<'a> {
    pub step: usize,
    pub state: &'a ModelState,
    /// Instantaneous fresh-mass yield for this step (kg/m²).
    pub yield_kg_m2: f64,
}

pub trait StepReporter {
    fn on_step(&mut self, obs: &StepObservation<'_>);

    /// Called once after a successful run with the final state snapshot.
    fn on_season_end(&mut self, final_state: &ModelState, summary: &SeasonSummary);
}

/// Discards everything. Used in tests and as a base case.
pub struct NullReporter;

impl StepReporter for NullReporter {
    fn on_step(&mut self, _obs: &StepObservation<'_>) {}
    fn on_season_end(&mut self, _final_state: &ModelState, _summary: &SeasonSummary) {}
}

/// Logs each step as a structured tracing event.
pub struct TracingReporter;

impl StepReporter for TracingReporter {
    fn on_step(&mut self, obs: &StepObservation<'_>) {
        info!(
            step = obs.step,
            yield_kg_m2 = format_args!("{:.4}", obs.yield_kg_m2),
            signals = obs.state.len(),
            "running step"
        );
    }

    fn on_season_end(&mut self, _final_state: &ModelState, summary: &SeasonSummary) {
        info!(
            total_yield_kg_m2 = summary.total_yield_kg_m2,
            lamp_energy_mj_m2 = summary.lamp_energy_mj_m2,
            boil_energy_mj_m2 = summary.boil_energy_mj_m2,
            specific_energy_mj_per_kg = summary.specific_energy_mj_per_kg,
            "season complete"
        );
    }
}

#[derive(Serialize)]
struct StepRecord<'a> {
    recorded_at: chrono::DateTime<Utc>,
    step: usize,
    yield_kg_m2: f64,
    state: &'a ModelState,
}

#[derive(Serialize)]
struct SeasonRecord<'a> {
    recorded_at: chrono::DateTime<Utc>,
    summary: &'a SeasonSummary,
    final_state: &'a ModelState,
}

/// Writes one JSON object per step (and one final season record) to any
/// writer, typically a buffered file. Write errors are logged and dropped:
/// a broken sink must not abort the simulation.
pub struct JsonlReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonlReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_line<T: Serialize>(&mut self, record: &T) {
        let result = serde_json::to_writer(&mut self.writer, record)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"));
        if let Err(e) = result {
            warn!(error = %e, "failed to write step log record");
        }
    }
}

impl<W: Write> StepReporter for JsonlReporter<W> {
    fn on_step(&mut self, obs: &StepObservation<'_>) {
        self.write_line(&StepRecord {
            recorded_at: Utc::now(),
            step: obs.step,
            yield_kg_m2: obs.yield_kg_m2,
            state: obs.state,
        });
    }

    fn on_season_end(&mut self, final_state: &ModelState, summary: &SeasonSummary) {
        self.write_line(&SeasonRecord {
            recorded_at: Utc::now(),
            summary,
            final_state,
        });
        if let Err(e) = self.writer.flush() {
            warn!(error = %e, "failed to flush step log");
        }
    }
}

/// Fans an observation out to two reporters, e.g. tracing plus a JSONL file.
pub struct Tee<A, B>(pub A, pub B);

impl<A: StepReporter, B: StepReporter> StepReporter for Tee<A, B> {
    fn on_step(&mut self, obs: &StepObservation<'_>) {
        self.0.on_step(obs);
        self.1.on_step(obs);
    }

    fn on_season_end(&mut self, final_state: &ModelState, summary: &SeasonSummary) {
        self.0.on_season_end(final_state, summary);
        self.1.on_season_end(final_state, summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::RunningTotals;

    #[test]
    fn test_jsonl_reporter_writes_one_line_per_event() {
        let mut buf = Vec::new();
        {
            let mut reporter = JsonlReporter::new(&mut buf);
            let state = ModelState::new().with("a", "mcFruitHar", 6000.0);
            reporter.on_step(&StepObservation {
                step: 0,
                state: &state,
                yield_kg_m2: 0.1,
            });
            let summary = SeasonSummary::from_totals(&RunningTotals {
                yield_kg_m2: 0.1,
                lamp_mj_m2: 1e-4,
                boil_mj_m2: 5e-5,
            });
            reporter.on_season_end(&state, &summary);
        }

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let step: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(step["step"], 0);
        assert_eq!(step["state"]["a"]["mcFruitHar"], 6000.0);

        let end: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert!(end["summary"]["specific_energy_mj_per_kg"].is_number());
    }

    #[test]
    fn test_tee_reaches_both_sinks() {
        struct Counter(usize);
        impl StepReporter for Counter {
            fn on_step(&mut self, _obs: &StepObservation<'_>) {
                self.0 += 1;
            }
            fn on_season_end(&mut self, _s: &ModelState, _m: &SeasonSummary) {}
        }

        let mut tee = Tee(Counter(0), Counter(0));
        let state = ModelState::new();
        tee.on_step(&StepObservation {
            step: 0,
            state: &state,
            yield_kg_m2: 0.0,
        });
        assert_eq!(tee.0 .0, 1);
        assert_eq!(tee.1 .0, 1);
    }
}
