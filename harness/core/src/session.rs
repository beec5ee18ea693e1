use std::{path::PathBuf, sync::Arc};

use nightly_harness_config::{HarnessSettings, OverrideStore};
use thiserror::Error;
use tracing::info;

use crate::{
    chain::{ChainError, ChainRun, ChainRunner},
    environment::{EnvironmentControl, Provisioner, ToolkitControl},
    report::RunReport,
    scenario::{ScenarioError, ScenarioRunner, ScenarioSpec, Sequencer},
    soundness::{SoundnessError, SoundnessSession},
};

/// First failure of any session phase; the run stops there.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Soundness(#[from] SoundnessError),
}

impl SessionError {
    /// Exit code the harness process reports for this failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Scenario(error) => error.exit_code(),
            Self::Chain(error) => error.exit_code(),
            Self::Soundness(error) => error.exit_code(),
        }
    }
}

/// Assembles a [`Session`] from its phases.
pub struct SessionBuilder {
    settings: HarnessSettings,
    control: Option<Arc<dyn EnvironmentControl>>,
    scenarios: Vec<ScenarioSpec>,
    chain: Option<(ChainRun, PathBuf)>,
    soundness_program: Option<PathBuf>,
}

impl SessionBuilder {
    #[must_use]
    pub fn new(settings: HarnessSettings) -> Self {
        Self {
            settings,
            control: None,
            scenarios: Vec::new(),
            chain: None,
            soundness_program: None,
        }
    }

    /// Swap the environment control surface; defaults to the external
    /// toolkit binary.
    #[must_use]
    pub fn with_control(mut self, control: Arc<dyn EnvironmentControl>) -> Self {
        self.control = Some(control);
        self
    }

    #[must_use]
    pub fn with_scenarios(mut self, scenarios: impl IntoIterator<Item = ScenarioSpec>) -> Self {
        self.scenarios.extend(scenarios);
        self
    }

    #[must_use]
    pub fn with_chain(mut self, chain: ChainRun, program: impl Into<PathBuf>) -> Self {
        self.chain = Some((chain, program.into()));
        self
    }

    #[must_use]
    pub fn with_soundness(mut self, program: impl Into<PathBuf>) -> Self {
        self.soundness_program = Some(program.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Session {
        let Self {
            settings,
            control,
            scenarios,
            chain,
            soundness_program,
        } = self;

        let control = control.unwrap_or_else(|| {
            Arc::new(ToolkitControl::new(&settings)) as Arc<dyn EnvironmentControl>
        });

        Session {
            settings,
            control,
            scenarios,
            chain,
            soundness_program,
        }
    }
}

/// Full nightly session: standalone scenarios, the upgrade chain, and the
/// soundness check, in that order. One phase's failure aborts the rest; the
/// propagated exit code is the first non-zero status encountered.
pub struct Session {
    settings: HarnessSettings,
    control: Arc<dyn EnvironmentControl>,
    scenarios: Vec<ScenarioSpec>,
    chain: Option<(ChainRun, PathBuf)>,
    soundness_program: Option<PathBuf>,
}

impl Session {
    pub async fn run(&mut self) -> Result<RunReport, SessionError> {
        let mut report = RunReport::new();

        if !self.scenarios.is_empty() {
            info!(scenarios = self.scenarios.len(), "running scenario sequence");
            let store = OverrideStore::new(self.settings.overrides_root.clone());
            let mut provisioner =
                Provisioner::new(Arc::clone(&self.control), self.settings.clone());
            if let Some(global) = store.global_override() {
                provisioner.activate_global_override(&global);
            }

            let runner = ScenarioRunner::new(provisioner, self.settings.clone());
            let mut sequencer = Sequencer::new(runner);
            report.record_all(sequencer.run_all(&self.scenarios).await?);
        }

        if let Some((chain, program)) = &self.chain {
            info!(steps = chain.steps().len(), "running upgrade chain");
            ChainRunner::new(program.clone()).run(chain).await?;
        }

        if let Some(program) = &self.soundness_program {
            let provisioner =
                Provisioner::new(Arc::clone(&self.control), self.settings.clone());
            SoundnessSession::new(provisioner, program.clone()).run().await?;
        }

        info!(results = report.results().len(), "session complete");
        Ok(report)
    }
}
