pub mod chain;
pub mod environment;
pub mod report;
pub mod scenario;
pub mod session;
pub mod soundness;

pub use nightly_harness_config::adjust_timeout;

/// Boxed error used across capability boundaries.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
