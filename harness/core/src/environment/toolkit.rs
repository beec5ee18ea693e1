use std::{
    env,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use async_trait::async_trait;
use nightly_harness_config::{HarnessSettings, adjust_timeout, timeouts};
use nightly_harness_env as harness_env;
use thiserror::Error;
use tokio::{process::Command, time::timeout};
use tracing::{debug, info};

use super::EnvironmentControl;
use crate::DynError;

const TOOLKIT_BIN_NAME: &str = "netctl";
const SETUP_SUBCOMMAND: &str = "assets-setup";
const START_SUBCOMMAND: &str = "start";
const TEARDOWN_SUBCOMMAND: &str = "assets-teardown";
const STATUS_SUBCOMMAND: &str = "status";

/// Environment variable pointing toolkit invocations (and scenario children)
/// at the network asset directory.
pub const NET_DIR_ENV: &str = "HARNESS_NET_DIR";

/// Errors from driving a toolkit command.
#[derive(Debug, Error)]
pub enum ToolkitCommandError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
    },
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

/// Adapter invoking the external net-control toolkit binary.
pub struct ToolkitControl {
    bin: PathBuf,
    net_dir: PathBuf,
    command_timeout: Duration,
}

impl ToolkitControl {
    #[must_use]
    pub fn new(settings: &HarnessSettings) -> Self {
        Self::from_parts(
            resolve_toolkit_bin(),
            settings.net_dir.clone(),
            settings.toolkit_timeout,
        )
    }

    #[must_use]
    pub fn from_parts(bin: PathBuf, net_dir: PathBuf, command_timeout: Duration) -> Self {
        Self {
            bin,
            net_dir,
            command_timeout,
        }
    }

    #[must_use]
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    fn command(&self, subcommand: &str) -> Command {
        let mut command = Command::new(&self.bin);
        command.arg(subcommand);
        command.env(NET_DIR_ENV, &self.net_dir);
        command
    }

    async fn run(
        &self,
        mut command: Command,
        description: &str,
    ) -> Result<(), ToolkitCommandError> {
        debug!(command = description, "running toolkit command");
        let bound = adjust_timeout(self.command_timeout);

        match timeout(bound, command.status()).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(ToolkitCommandError::Failed {
                command: description.to_owned(),
                status,
            }),
            Ok(Err(source)) => Err(ToolkitCommandError::Spawn {
                command: description.to_owned(),
                source,
            }),
            Err(_) => Err(ToolkitCommandError::Timeout {
                command: description.to_owned(),
                timeout: bound,
            }),
        }
    }
}

#[async_trait]
impl EnvironmentControl for ToolkitControl {
    async fn setup(&self, args: &[String]) -> Result<(), DynError> {
        let mut command = self.command(SETUP_SUBCOMMAND);
        command.args(args);

        info!(args = args.join(" "), "materializing network assets");
        self.run(command, "netctl assets-setup").await.map_err(Into::into)
    }

    async fn start(&self) -> Result<(), DynError> {
        info!("starting network nodes");
        self.run(self.command(START_SUBCOMMAND), "netctl start")
            .await
            .map_err(Into::into)
    }

    async fn teardown(&self) -> Result<(), DynError> {
        info!("tearing network assets down");
        self.run(self.command(TEARDOWN_SUBCOMMAND), "netctl assets-teardown")
            .await
            .map_err(Into::into)
    }

    async fn is_active(&self) -> bool {
        let mut command = self.command(STATUS_SUBCOMMAND);
        command.stdout(Stdio::null()).stderr(Stdio::null());

        timeout(
            adjust_timeout(timeouts::toolkit_status_timeout()),
            command.status(),
        )
        .await
        .ok()
        .and_then(Result::ok)
        .map(|status| status.success())
        .unwrap_or(false)
    }
}

/// Locate the toolkit binary: explicit env override first, then PATH, then
/// the bare name for the OS to resolve at spawn time.
#[must_use]
pub fn resolve_toolkit_bin() -> PathBuf {
    if let Some(path) = harness_env::toolkit_bin() {
        info!(path = %path.display(), "resolved toolkit binary from env override");
        return path;
    }
    if let Some(path) = which_on_path(TOOLKIT_BIN_NAME) {
        info!(path = %path.display(), "resolved toolkit binary from PATH");
        return path;
    }

    debug!(binary = TOOLKIT_BIN_NAME, "falling back to bare toolkit binary name");
    PathBuf::from(TOOLKIT_BIN_NAME)
}

fn which_on_path(bin: &str) -> Option<PathBuf> {
    let path_env = env::var_os("PATH")?;
    env::split_paths(&path_env)
        .map(|p| p.join(bin))
        .find(|candidate| candidate.is_file())
}
