use std::{env, time::Duration};

pub const STARTUP_SETTLE_SECS: u64 = 90;
pub const TEARDOWN_COOLDOWN_SECS: u64 = 10;
pub const TOOLKIT_COMMAND_TIMEOUT_SECS: u64 = 300;
pub const TOOLKIT_STATUS_TIMEOUT_SECS: u64 = 15;

fn env_duration(key: &str, default: u64) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

/// Blind settling wait after the network starts. There is no readiness probe
/// to poll; the duration is empirical.
pub fn startup_settle() -> Duration {
    env_duration("HARNESS_STARTUP_SETTLE_SECS", STARTUP_SETTLE_SECS)
}

/// Cooldown after an environment is torn down, before the next use of the
/// shared ports and directories.
pub fn teardown_cooldown() -> Duration {
    env_duration("HARNESS_TEARDOWN_COOLDOWN_SECS", TEARDOWN_COOLDOWN_SECS)
}

/// Upper bound for a single toolkit command.
pub fn toolkit_command_timeout() -> Duration {
    env_duration("HARNESS_TOOLKIT_TIMEOUT_SECS", TOOLKIT_COMMAND_TIMEOUT_SECS)
}

/// Upper bound for the toolkit activity query.
pub fn toolkit_status_timeout() -> Duration {
    env_duration("HARNESS_TOOLKIT_STATUS_TIMEOUT_SECS", TOOLKIT_STATUS_TIMEOUT_SECS)
}
