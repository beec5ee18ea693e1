use std::{
    path::Path,
    time::{Duration, Instant},
};

use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, info};

use super::{definition::ScenarioSpec, runner::ScenarioError};
use crate::environment::NET_DIR_ENV;

/// Exit code recorded when a program is terminated by a signal.
pub(crate) const SIGNAL_EXIT_CODE: i32 = -1;

/// Outcome of one scenario invocation.
#[derive(Clone, Debug, Serialize)]
pub struct RunResult {
    pub scenario: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl RunResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Launch the scenario program and wait for it to finish.
pub(super) async fn invoke_scenario(
    scenarios_root: &Path,
    spec: &ScenarioSpec,
    net_dir: Option<&Path>,
) -> Result<RunResult, ScenarioError> {
    let program = scenarios_root.join(spec.name());
    let mut command = Command::new(&program);
    command.args(spec.args());
    if let Some(dir) = net_dir {
        command.env(NET_DIR_ENV, dir);
    }

    info!(
        scenario = spec.name(),
        args = spec.args().join(" "),
        "executing scenario"
    );
    let started = Instant::now();
    let status = command
        .status()
        .await
        .map_err(|source| ScenarioError::Spawn {
            scenario: spec.name().to_owned(),
            source,
        })?;
    let duration = started.elapsed();
    let exit_code = status.code().unwrap_or(SIGNAL_EXIT_CODE);

    debug!(
        scenario = spec.name(),
        exit_code,
        duration_secs = duration.as_secs(),
        "scenario finished"
    );
    Ok(RunResult {
        scenario: spec.name().to_owned(),
        exit_code,
        duration,
    })
}
