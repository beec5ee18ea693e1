use tracing::info;

use super::{ScenarioError, ScenarioRunner, ScenarioSpec, invoke::RunResult};

/// Runs scenarios strictly in order, stopping at the first failure.
///
/// Scenarios share network state and ports, so there is no parallelism, no
/// reordering, and no retry; the first non-zero exit aborts the remaining
/// entries.
pub struct Sequencer {
    runner: ScenarioRunner,
}

impl Sequencer {
    #[must_use]
    pub const fn new(runner: ScenarioRunner) -> Self {
        Self { runner }
    }

    pub async fn run_all(
        &mut self,
        scenarios: &[ScenarioSpec],
    ) -> Result<Vec<RunResult>, ScenarioError> {
        let mut results = Vec::with_capacity(scenarios.len());
        for (index, spec) in scenarios.iter().enumerate() {
            info!(
                scenario = spec.name(),
                position = index + 1,
                total = scenarios.len(),
                "running scenario"
            );
            results.push(self.runner.run(spec).await?);
        }
        Ok(results)
    }

    #[must_use]
    pub fn environment_live(&self) -> bool {
        self.runner.environment_live()
    }
}
