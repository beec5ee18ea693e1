use std::{ops::Mul as _, sync::LazyLock, time::Duration};

use nightly_harness_env as harness_env;

pub mod overrides;
pub mod settings;
pub mod timeouts;

pub use overrides::{OverrideBundle, OverrideKind, OverrideStore, scenario_base_name};
pub use settings::HarnessSettings;

static IS_SLOW_TEST_ENV: LazyLock<bool> = LazyLock::new(harness_env::slow_test_env);

const SLOW_ENV_TIMEOUT_MULTIPLIER: u32 = 2;

/// In slow test environments like shared CI runners, use 2x timeout.
#[must_use]
pub fn adjust_timeout(d: Duration) -> Duration {
    if *IS_SLOW_TEST_ENV {
        d.mul(SLOW_ENV_TIMEOUT_MULTIPLIER)
    } else {
        d
    }
}
