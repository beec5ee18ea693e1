use std::path::PathBuf;

use nightly_harness_env as harness_env;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

use crate::scenario::SIGNAL_EXIT_CODE;

/// Environment variable telling the chain-step program to reuse the live
/// environment instead of provisioning a fresh one.
pub const SKIP_SETUP_ENV: &str = "HARNESS_SKIP_SETUP";

/// One stage of a dependent multi-step chain test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChainStep {
    stage: u32,
    skip_setup: bool,
}

impl ChainStep {
    #[must_use]
    pub const fn new(stage: u32, skip_setup: bool) -> Self {
        Self { stage, skip_setup }
    }

    #[must_use]
    pub const fn stage(self) -> u32 {
        self.stage
    }

    #[must_use]
    pub const fn skip_setup(self) -> bool {
        self.skip_setup
    }
}

#[derive(Debug, Error)]
pub enum ChainBuildError {
    #[error("a chain run needs at least one step")]
    Empty,
    #[error("the first chain step must provision the environment (skip_setup set on stage {stage})")]
    FirstStepSkipsSetup { stage: u32 },
}

/// Validated ordered sequence of chain steps sharing one live environment.
#[derive(Clone, Debug)]
pub struct ChainRun {
    steps: Vec<ChainStep>,
}

impl ChainRun {
    /// Later steps assume the state left by earlier ones, so the first step
    /// must not skip setup; that is checked here rather than at run time.
    pub fn new(steps: Vec<ChainStep>) -> Result<Self, ChainBuildError> {
        let Some(first) = steps.first() else {
            return Err(ChainBuildError::Empty);
        };
        if first.skip_setup() {
            return Err(ChainBuildError::FirstStepSkipsSetup {
                stage: first.stage(),
            });
        }
        Ok(Self { steps })
    }

    /// Conventional progression: stage 1 provisions, stages 2..=n reuse the
    /// live environment.
    pub fn stages(count: u32) -> Result<Self, ChainBuildError> {
        Self::new(
            (1..=count)
                .map(|stage| ChainStep::new(stage, stage > 1))
                .collect(),
        )
    }

    #[must_use]
    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("failed to launch chain step {stage}: {source}")]
    Spawn {
        stage: u32,
        #[source]
        source: std::io::Error,
    },
    #[error("chain step {stage} failed with exit code {code}")]
    StepFailed { stage: u32, code: i32 },
}

impl ChainError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StepFailed { code, .. } => *code,
            Self::Spawn { .. } => 1,
        }
    }
}

/// Drives a chain run through the external chain-step program.
///
/// The program owns provisioning: the first step sets the environment up and
/// later steps exercise it in place. A failed step is fatal to the whole
/// run; there is no rollback.
pub struct ChainRunner {
    program: PathBuf,
}

impl ChainRunner {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub async fn run(&self, chain: &ChainRun) -> Result<(), ChainError> {
        for step in chain.steps() {
            self.run_step(*step).await?;
        }
        info!(steps = chain.steps().len(), "chain run complete");
        Ok(())
    }

    async fn run_step(&self, step: ChainStep) -> Result<(), ChainError> {
        let mut command = Command::new(&self.program);
        command.arg(step.stage().to_string());
        command.env(SKIP_SETUP_ENV, if step.skip_setup() { "true" } else { "false" });
        if let Some(branch) = harness_env::branch_id() {
            command.arg(format!("branch={branch}"));
        }
        if let Some(build) = harness_env::build_id() {
            command.arg(format!("build={build}"));
        }

        info!(
            stage = step.stage(),
            skip_setup = step.skip_setup(),
            "running chain step"
        );
        let status = command
            .status()
            .await
            .map_err(|source| ChainError::Spawn {
                stage: step.stage(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ChainError::StepFailed {
                stage: step.stage(),
                code: status.code().unwrap_or(SIGNAL_EXIT_CODE),
            })
        }
    }
}
