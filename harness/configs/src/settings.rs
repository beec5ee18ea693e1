use std::{path::PathBuf, time::Duration};

use nightly_harness_env as harness_env;

use crate::timeouts;

const DEFAULT_OVERRIDES_ROOT: &str = "overrides";
const DEFAULT_SCENARIOS_ROOT: &str = "scenarios";
const DEFAULT_NET_DIR: &str = "net-assets";

/// Explicit harness configuration handed to each component constructor.
///
/// Everything the session needs travels through this struct; components do
/// not read ambient process state at use sites.
#[derive(Clone, Debug)]
pub struct HarnessSettings {
    /// Root of the override store (`chainspecs/`, `accounts/`, `configs/`).
    pub overrides_root: PathBuf,
    /// Directory holding the scenario programs.
    pub scenarios_root: PathBuf,
    /// Directory where the toolkit materializes network assets.
    pub net_dir: PathBuf,
    /// Blind settling wait after the network starts; not a readiness probe.
    pub startup_settle: Duration,
    /// Cooldown after tearing an environment down.
    pub teardown_cooldown: Duration,
    /// Upper bound for a single toolkit command.
    pub toolkit_timeout: Duration,
}

impl HarnessSettings {
    /// Settings from environment variables, falling back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            overrides_root: harness_env::overrides_root()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OVERRIDES_ROOT)),
            scenarios_root: harness_env::scenarios_root()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIOS_ROOT)),
            net_dir: harness_env::net_dir().unwrap_or_else(|| PathBuf::from(DEFAULT_NET_DIR)),
            startup_settle: timeouts::startup_settle(),
            teardown_cooldown: timeouts::teardown_cooldown(),
            toolkit_timeout: timeouts::toolkit_command_timeout(),
        }
    }
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            overrides_root: PathBuf::from(DEFAULT_OVERRIDES_ROOT),
            scenarios_root: PathBuf::from(DEFAULT_SCENARIOS_ROOT),
            net_dir: PathBuf::from(DEFAULT_NET_DIR),
            startup_settle: Duration::from_secs(timeouts::STARTUP_SETTLE_SECS),
            teardown_cooldown: Duration::from_secs(timeouts::TEARDOWN_COOLDOWN_SECS),
            toolkit_timeout: Duration::from_secs(timeouts::TOOLKIT_COMMAND_TIMEOUT_SECS),
        }
    }
}
