use std::path::PathBuf;

use nightly_harness_config::{HarnessSettings, OverrideBundle, OverrideStore};
use nightly_harness_env as harness_env;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{
    definition::ScenarioSpec,
    invoke::{self, RunResult},
};
use crate::environment::{Provisioner, ProvisioningError};

/// Errors from running one scenario. All variants are fatal to the enclosing
/// sequence.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("provisioning for scenario '{scenario}' failed: {source}")]
    Provisioning {
        scenario: String,
        #[source]
        source: ProvisioningError,
    },
    #[error("failed to launch scenario '{scenario}': {source}")]
    Spawn {
        scenario: String,
        #[source]
        source: std::io::Error,
    },
    #[error("scenario '{scenario}' failed with exit code {code}")]
    Failed { scenario: String, code: i32 },
}

impl ScenarioError {
    /// Exit code the harness propagates for this failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Failed { code, .. } => *code,
            Self::Provisioning { .. } | Self::Spawn { .. } => 1,
        }
    }
}

/// Drives one scenario against a freshly provisioned environment.
///
/// Unless the scenario manages its own lifecycle, the runner wraps it in
/// teardown → provision → start → settle beforehand and a teardown plus
/// cooldown afterwards, on success and failure alike, so a crashed scenario
/// cannot poison the next run.
pub struct ScenarioRunner {
    provisioner: Provisioner,
    store: OverrideStore,
    settings: HarnessSettings,
}

impl ScenarioRunner {
    #[must_use]
    pub fn new(provisioner: Provisioner, settings: HarnessSettings) -> Self {
        let store = OverrideStore::new(settings.overrides_root.clone());
        Self {
            provisioner,
            store,
            settings,
        }
    }

    pub async fn run(&mut self, spec: &ScenarioSpec) -> Result<RunResult, ScenarioError> {
        if spec.intrinsic_lifecycle() {
            info!(scenario = spec.name(), "scenario manages its own environment");
            let outcome =
                invoke::invoke_scenario(&self.settings.scenarios_root, spec, None).await?;
            return finish(spec, outcome);
        }

        let bundle = self.store.resolve(spec.base_name());
        if bundle.is_empty() {
            debug!(scenario = spec.name(), "no overrides for scenario");
        }

        if let Err(source) = self.provision_and_start(&bundle).await {
            // a half-built environment must not survive the failure
            self.release().await;
            return Err(ScenarioError::Provisioning {
                scenario: spec.name().to_owned(),
                source,
            });
        }

        let net_dir = self.net_dir();
        let outcome =
            invoke::invoke_scenario(&self.settings.scenarios_root, spec, net_dir.as_deref()).await;

        // released on success and failure alike
        self.release().await;

        finish(spec, outcome?)
    }

    #[must_use]
    pub fn environment_live(&self) -> bool {
        self.provisioner.is_live()
    }

    async fn provision_and_start(&mut self, bundle: &OverrideBundle) -> Result<(), ProvisioningError> {
        self.provisioner.provision(bundle).await?;
        self.provisioner.start().await
    }

    fn net_dir(&self) -> Option<PathBuf> {
        self.provisioner
            .current()
            .map(|handle| handle.net_dir().to_path_buf())
    }

    async fn release(&mut self) {
        if harness_env::preserve_environment() {
            warn!("preserve flag set; skipping environment teardown");
            return;
        }

        self.provisioner.teardown().await;

        let cooldown = self.settings.teardown_cooldown;
        if !cooldown.is_zero() {
            sleep(cooldown).await;
        }
    }
}

fn finish(spec: &ScenarioSpec, result: RunResult) -> Result<RunResult, ScenarioError> {
    if result.success() {
        info!(
            scenario = spec.name(),
            duration_secs = result.duration.as_secs(),
            "scenario passed"
        );
        Ok(result)
    } else {
        Err(ScenarioError::Failed {
            scenario: result.scenario,
            code: result.exit_code,
        })
    }
}
