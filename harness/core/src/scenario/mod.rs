mod definition;
mod invoke;
mod runner;
mod sequence;

pub use definition::ScenarioSpec;
pub use invoke::RunResult;
pub use runner::{ScenarioError, ScenarioRunner};
pub use sequence::Sequencer;

pub(crate) use invoke::SIGNAL_EXIT_CODE;
