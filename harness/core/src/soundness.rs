use std::path::PathBuf;

use nightly_harness_env as harness_env;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

use crate::{
    environment::{Provisioner, resolve_toolkit_bin},
    scenario::SIGNAL_EXIT_CODE,
};

/// Environment variable handing the soundness driver the toolkit binary it
/// controls the network with.
pub const CONTROL_BIN_ENV: &str = "HARNESS_NETCTL_BIN";

#[derive(Debug, Error)]
pub enum SoundnessError {
    #[error("failed to launch soundness driver: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },
    #[error("soundness driver failed with exit code {code}")]
    Failed { code: i32 },
}

impl SoundnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Failed { code } => *code,
            Self::Spawn { .. } => 1,
        }
    }
}

/// Long-form soundness check driven by an external analysis program.
///
/// The driver provisions, exercises, and tears down the network itself; the
/// harness only guarantees a clean slate before and after.
pub struct SoundnessSession {
    provisioner: Provisioner,
    program: PathBuf,
}

impl SoundnessSession {
    #[must_use]
    pub fn new(provisioner: Provisioner, program: impl Into<PathBuf>) -> Self {
        Self {
            provisioner,
            program: program.into(),
        }
    }

    pub async fn run(&mut self) -> Result<(), SoundnessError> {
        self.provisioner.teardown().await;

        let mut command = Command::new(&self.program);
        if harness_env::ci_context() {
            // CI children start without an activated control surface
            let control_bin = resolve_toolkit_bin();
            info!(bin = %control_bin.display(), "activating network control for child processes");
            command.env(CONTROL_BIN_ENV, control_bin);
        }

        info!(program = %self.program.display(), "running soundness session");
        let status = command
            .status()
            .await
            .map_err(|source| SoundnessError::Spawn { source });

        self.provisioner.teardown().await;

        let status = status?;
        if status.success() {
            info!("soundness session passed");
            Ok(())
        } else {
            Err(SoundnessError::Failed {
                code: status.code().unwrap_or(SIGNAL_EXIT_CODE),
            })
        }
    }
}
