use anyhow::{Context, Result};
use greenhouse_sim::report::{JsonlReporter, StepReporter, Tee, TracingReporter};
use greenhouse_sim::{config::Config, run_season, telemetry, SeasonSummary};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cfg = Config::load()?;
    cfg.season.validate()?;

    let mut reporter: Box<dyn StepReporter> = match &cfg.output.step_log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating step log {}", path.display()))?;
            Box::new(Tee(TracingReporter, JsonlReporter::new(BufWriter::new(file))))
        }
        None => Box::new(TracingReporter),
    };

    #[cfg(feature = "sim")]
    let mut stepper = {
        use greenhouse_sim::sim::{SyntheticStepper, SyntheticStepperConfig};
        SyntheticStepper::new(SyntheticStepperConfig {
            first_day: cfg.season.first_day,
            is_mature: cfg.season.is_mature,
            epw_path: cfg.weather.epw_path.clone(),
            ..Default::default()
        })
    };
    #[cfg(not(feature = "sim"))]
    anyhow::bail!("no model stepper compiled in; build with the 'sim' feature");

    #[cfg(feature = "sim")]
    {
        info!(
            weather = %cfg.weather.epw_path,
            first_day = cfg.season.first_day,
            "starting greenhouse season simulation"
        );

        let outcome = run_season(
            &cfg.season,
            cfg.initial_state(),
            &mut stepper,
            reporter.as_mut(),
        )?;

        let summary = SeasonSummary::from_totals(&outcome.totals);
        reporter.on_season_end(&outcome.final_state, &summary);

        println!("{summary}");
    }

    Ok(())
}
