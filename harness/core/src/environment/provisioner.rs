use std::{path::Path, sync::Arc};

use nightly_harness_config::{HarnessSettings, OverrideBundle};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{EnvironmentControl, EnvironmentHandle};
use crate::DynError;

/// Errors from provisioning or starting an environment. Fatal to the
/// enclosing scenario run.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("environment setup failed: {source}")]
    Setup {
        #[source]
        source: DynError,
    },
    #[error("environment start failed: {source}")]
    Start {
        #[source]
        source: DynError,
    },
    #[error("no provisioned environment to start")]
    NotProvisioned,
}

/// Supervising owner of the single network environment slot.
///
/// Teardown is best-effort and idempotent; provisioning always tears down
/// whatever might be left over first, so an aborted prior run cannot poison
/// the next one.
pub struct Provisioner {
    control: Arc<dyn EnvironmentControl>,
    settings: HarnessSettings,
    global_args: Vec<String>,
    live: Option<EnvironmentHandle>,
}

impl Provisioner {
    #[must_use]
    pub fn new(control: Arc<dyn EnvironmentControl>, settings: HarnessSettings) -> Self {
        Self {
            control,
            settings,
            global_args: Vec::new(),
            live: None,
        }
    }

    /// Append a session-wide override to every subsequent setup invocation.
    pub fn activate_global_override(&mut self, path: &Path) {
        info!(path = %path.display(), "activating session-wide override");
        self.global_args.push(format!("global_path={}", path.display()));
    }

    /// Release all environment resources. Never fails the run: errors are
    /// logged and the live slot is cleared regardless.
    pub async fn teardown(&mut self) {
        if let Some(handle) = self.live.as_mut() {
            handle.mark_torn_down();
        }
        self.live = None;

        if let Err(error) = self.control.teardown().await {
            warn!(error = %error, "environment teardown failed; continuing");
        }
    }

    /// Materialize a fresh environment from the bundle, tearing down any
    /// leftover state first.
    pub async fn provision(
        &mut self,
        bundle: &OverrideBundle,
    ) -> Result<&EnvironmentHandle, ProvisioningError> {
        self.teardown().await;
        if self.control.is_active().await {
            warn!("toolkit still reports an active environment after teardown");
        }

        let mut args = bundle.setup_args();
        args.extend(self.global_args.iter().cloned());

        debug!(args = args.join(" "), "provisioning environment");
        self.control
            .setup(&args)
            .await
            .map_err(|source| ProvisioningError::Setup { source })?;

        let handle = EnvironmentHandle::provisioned(self.settings.net_dir.clone());
        Ok(self.live.insert(handle))
    }

    /// Launch the network and wait out the settling period.
    pub async fn start(&mut self) -> Result<(), ProvisioningError> {
        let Some(handle) = self.live.as_mut() else {
            return Err(ProvisioningError::NotProvisioned);
        };

        self.control
            .start()
            .await
            .map_err(|source| ProvisioningError::Start { source })?;
        handle.mark_running();

        // Fixed settling wait; there is no readiness signal to poll.
        let settle = self.settings.startup_settle;
        if !settle.is_zero() {
            info!(secs = settle.as_secs(), "waiting for the network to settle");
            sleep(settle).await;
        }
        Ok(())
    }

    #[must_use]
    pub fn current(&self) -> Option<&EnvironmentHandle> {
        self.live.as_ref()
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }
}
