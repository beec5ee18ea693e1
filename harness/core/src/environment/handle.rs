use std::path::{Path, PathBuf};

/// Lifecycle states of a provisioned network instance.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnvironmentState {
    Provisioned,
    Running,
    TornDown,
}

/// Owned token for one provisioned, possibly running network instance.
///
/// Created by [`Provisioner::provision`](super::Provisioner::provision),
/// advanced to `Running` by `start`, and invalidated by `teardown`. The
/// provisioner keeps the live slot; at most one handle is live at a time.
#[derive(Clone, Debug)]
pub struct EnvironmentHandle {
    net_dir: PathBuf,
    state: EnvironmentState,
}

impl EnvironmentHandle {
    pub(crate) fn provisioned(net_dir: PathBuf) -> Self {
        Self {
            net_dir,
            state: EnvironmentState::Provisioned,
        }
    }

    /// Directory holding the instance's generated assets; exported to
    /// scenario programs.
    #[must_use]
    pub fn net_dir(&self) -> &Path {
        &self.net_dir
    }

    #[must_use]
    pub const fn state(&self) -> EnvironmentState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == EnvironmentState::Running
    }

    pub(crate) fn mark_running(&mut self) {
        self.state = EnvironmentState::Running;
    }

    pub(crate) fn mark_torn_down(&mut self) {
        self.state = EnvironmentState::TornDown;
    }
}
