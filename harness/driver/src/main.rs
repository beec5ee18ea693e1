use std::process;

use nightly_harness_config::HarnessSettings;
use nightly_harness_core::{chain::ChainRun, scenario::ScenarioSpec, session::SessionBuilder};
use nightly_harness_env as harness_env;
use tracing::{error, info, warn};

/// Number of stages in the nightly upgrade progression.
const UPGRADE_STAGES: u32 = 10;
const CHAIN_PROGRAM: &str = "upgrade_scenario.sh";
const SOUNDNESS_PROGRAM: &str = "soundness.sh";

fn nightly_scenarios() -> Vec<ScenarioSpec> {
    vec![
        ScenarioSpec::new("itst01.sh"),
        ScenarioSpec::new("itst02.sh"),
        ScenarioSpec::new("itst06.sh").with_args(["node=5"]),
        ScenarioSpec::new("itst07.sh"),
        ScenarioSpec::new("itst11.sh"),
        ScenarioSpec::new("itst13.sh").with_args(["timeout=500"]),
        ScenarioSpec::new("itst14.sh").with_args(["timeout=500"]),
        // relaunch drives its own setup, start, and teardown end to end
        ScenarioSpec::new("relaunch.sh").with_intrinsic_lifecycle(),
    ]
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = HarnessSettings::from_env();
    info!(
        overrides = %settings.overrides_root.display(),
        scenarios = %settings.scenarios_root.display(),
        "starting nightly session"
    );

    let chain = match ChainRun::stages(UPGRADE_STAGES) {
        Ok(chain) => chain,
        Err(error) => {
            error!("invalid upgrade chain definition: {error}");
            process::exit(1);
        }
    };

    let mut session = SessionBuilder::new(settings.clone())
        .with_scenarios(nightly_scenarios())
        .with_chain(chain, settings.scenarios_root.join(CHAIN_PROGRAM))
        .with_soundness(settings.scenarios_root.join(SOUNDNESS_PROGRAM))
        .build();

    match session.run().await {
        Ok(report) => {
            if let Some(path) = harness_env::report_path() {
                if let Err(error) = report.write_json(&path) {
                    warn!(error = %error, "failed to write run report");
                }
            }
            info!(
                scenarios = report.results().len(),
                duration_secs = report.total_duration().as_secs(),
                "nightly session passed"
            );
        }
        Err(error) => {
            error!("nightly session failed: {error}");
            process::exit(error.exit_code());
        }
    }
}
