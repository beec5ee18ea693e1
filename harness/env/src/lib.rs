use std::{env, path::PathBuf};

#[must_use]
pub fn slow_test_env() -> bool {
    env::var("SLOW_TEST_ENV").is_ok_and(|s| s == "true")
}

#[must_use]
pub fn ci_context() -> bool {
    env::var("CI").is_ok_and(|val| !val.is_empty() && !val.eq_ignore_ascii_case("false"))
}

#[must_use]
pub fn branch_id() -> Option<String> {
    env::var("HARNESS_BRANCH").ok()
}

#[must_use]
pub fn build_id() -> Option<String> {
    env::var("HARNESS_BUILD").ok()
}

#[must_use]
pub fn preserve_environment() -> bool {
    env::var("HARNESS_PRESERVE_ENV").is_ok()
}

#[must_use]
pub fn toolkit_bin() -> Option<PathBuf> {
    env::var("HARNESS_NETCTL_BIN").ok().map(PathBuf::from)
}

#[must_use]
pub fn overrides_root() -> Option<PathBuf> {
    env::var("HARNESS_OVERRIDES_ROOT").ok().map(PathBuf::from)
}

#[must_use]
pub fn scenarios_root() -> Option<PathBuf> {
    env::var("HARNESS_SCENARIOS_ROOT").ok().map(PathBuf::from)
}

#[must_use]
pub fn net_dir() -> Option<PathBuf> {
    env::var("HARNESS_NET_DIR").ok().map(PathBuf::from)
}

#[must_use]
pub fn report_path() -> Option<PathBuf> {
    env::var("HARNESS_REPORT_PATH").ok().map(PathBuf::from)
}
