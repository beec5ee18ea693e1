use std::{fs, io, path::Path, time::Duration};

use serde::Serialize;
use tracing::info;

use crate::scenario::RunResult;

/// Aggregated outcome of a whole session, for reporting.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    results: Vec<RunResult>,
}

impl RunReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: RunResult) {
        self.results.push(result);
    }

    pub fn record_all(&mut self, results: impl IntoIterator<Item = RunResult>) {
        self.results.extend(results);
    }

    #[must_use]
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(RunResult::success)
    }

    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|result| result.duration).sum()
    }

    /// Serialize the report as JSON for downstream tooling.
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let rendered = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, rendered)?;
        info!(
            path = %path.display(),
            results = self.results.len(),
            "run report written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(scenario: &str, exit_code: i32, secs: u64) -> RunResult {
        RunResult {
            scenario: scenario.to_owned(),
            exit_code,
            duration: Duration::from_secs(secs),
        }
    }

    #[test]
    fn report_aggregates_results() {
        let mut report = RunReport::new();
        report.record(result("itst01.sh", 0, 30));
        report.record(result("itst02.sh", 0, 45));

        assert!(report.all_passed());
        assert_eq!(report.total_duration(), Duration::from_secs(75));
    }

    #[test]
    fn failed_result_flips_the_report() {
        let mut report = RunReport::new();
        report.record_all([result("itst01.sh", 0, 30), result("itst02.sh", 5, 1)]);

        assert!(!report.all_passed());
    }

    #[test]
    fn report_serializes_to_json() {
        let mut report = RunReport::new();
        report.record(result("itst01.sh", 0, 30));

        let rendered = serde_json::to_string(&report).expect("serialize report");
        assert!(rendered.contains("itst01.sh"));
        assert!(rendered.contains("\"exit_code\":0"));
    }
}
