//! Reporter - scenario outcomes and suite reports.
//!
//! A [`SuiteReport`] is what a run produces: one [`ScenarioOutcome`] per
//! selected scenario, in run order. It serializes to JSON for CI and
//! renders a one-line summary for humans.

use crate::result::{E2eError, E2eResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Every step succeeded
    Passed,
    /// A step failed
    Failed,
    /// Not run (fail-fast)
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Where and why a scenario failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    /// Zero-based step index (setup steps first), if a step failed
    pub index: Option<usize>,
    /// Step description
    pub step: Option<String>,
    /// Full error message
    pub message: String,
    /// Expected observation, for assertion timeouts
    pub expected: Option<String>,
    /// Last observed value, for assertion timeouts
    pub actual: Option<String>,
}

impl StepFailure {
    /// Extract the reportable parts of an error
    #[must_use]
    pub fn from_error(error: &E2eError) -> Self {
        let (index, step) = match error {
            E2eError::StepFailed { index, step, .. } => (Some(*index), Some(step.clone())),
            _ => (None, None),
        };
        let (expected, actual) = match error.root() {
            E2eError::AssertionTimeout {
                expected, actual, ..
            } => (Some(expected.clone()), Some(actual.clone())),
            _ => (None, None),
        };
        Self {
            index,
            step,
            message: error.root().to_string(),
            expected,
            actual,
        }
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Context name
    pub context: String,
    /// Scenario name
    pub scenario: String,
    /// Result
    pub status: TestStatus,
    /// Wall time, including the reset navigation
    #[serde(rename = "duration_ms", with = "crate::config::millis")]
    pub duration: Duration,
    /// Steps completed successfully
    pub steps_run: usize,
    /// Failure detail
    pub failure: Option<StepFailure>,
}

impl ScenarioOutcome {
    /// Create a passing outcome
    #[must_use]
    pub fn passed(context: &str, scenario: &str, duration: Duration, steps_run: usize) -> Self {
        Self {
            context: context.to_string(),
            scenario: scenario.to_string(),
            status: TestStatus::Passed,
            duration,
            steps_run,
            failure: None,
        }
    }

    /// Create a failing outcome
    #[must_use]
    pub fn failed(context: &str, scenario: &str, duration: Duration, error: &E2eError) -> Self {
        Self {
            context: context.to_string(),
            scenario: scenario.to_string(),
            status: TestStatus::Failed,
            duration,
            steps_run: error.step_index().unwrap_or(0),
            failure: Some(StepFailure::from_error(error)),
        }
    }

    /// Create a skipped outcome
    #[must_use]
    pub fn skipped(context: &str, scenario: &str) -> Self {
        Self {
            context: context.to_string(),
            scenario: scenario.to_string(),
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            steps_run: 0,
            failure: None,
        }
    }

    /// "context > scenario"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} > {}", self.context, self.scenario)
    }
}

/// Results of a suite run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// Suite name
    pub suite: String,
    /// Driver used
    pub driver: String,
    /// Start page
    pub base_url: String,
    /// Outcomes in run order
    pub outcomes: Vec<ScenarioOutcome>,
    /// Wall time of the whole run
    #[serde(rename = "duration_ms", with = "crate::config::millis")]
    pub duration: Duration,
}

impl SuiteReport {
    /// Create an empty report
    #[must_use]
    pub fn new(suite: &str, driver: &str, base_url: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            suite: suite.to_string(),
            driver: driver.to_string(),
            base_url: base_url.to_string(),
            outcomes: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Record an outcome
    pub fn push(&mut self, outcome: ScenarioOutcome) {
        self.outcomes.push(outcome);
    }

    /// Record total wall time
    pub fn finish(&mut self, duration: Duration) {
        self.duration = duration;
    }

    fn count(&self, status: TestStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Get number of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    /// Get number of failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    /// Get number of skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    /// Get total scenario count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    /// True when nothing failed or was skipped
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.passed_count() == self.total_count()
    }

    /// Get failing outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_failed())
            .collect()
    }

    /// Generate summary string
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {} passed, {} failed, {} skipped ({:.2}s)",
            self.suite,
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.duration.as_secs_f64()
        )
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> E2eResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write JSON to a file
    pub fn write_json(&self, path: &Path) -> E2eResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeout_error() -> E2eError {
        E2eError::AssertionTimeout {
            subject: ".todo-count".to_string(),
            expected: "have text \"3 items left\"".to_string(),
            actual: "text \"2 items left\"".to_string(),
            attempts: 80,
            waited_ms: 4000,
        }
        .at_step(10, "expect .todo-count to have text \"3 items left\"")
    }

    mod failure_tests {
        use super::*;

        #[test]
        fn test_from_step_error() {
            let failure = StepFailure::from_error(&timeout_error());
            assert_eq!(failure.index, Some(10));
            assert_eq!(failure.expected.as_deref(), Some("have text \"3 items left\""));
            assert_eq!(failure.actual.as_deref(), Some("text \"2 items left\""));
            assert!(failure.message.starts_with("Timed out after 4000ms"));
        }

        #[test]
        fn test_from_bare_error() {
            let failure = StepFailure::from_error(&E2eError::NavigationError {
                url: "http://x".to_string(),
                message: "refused".to_string(),
            });
            assert_eq!(failure.index, None);
            assert!(failure.expected.is_none());
            assert!(failure.message.contains("refused"));
        }

        #[test]
        fn test_failed_outcome_counts_completed_steps() {
            let outcome = ScenarioOutcome::failed("C", "S", Duration::ZERO, &timeout_error());
            assert_eq!(outcome.steps_run, 10);
            assert_eq!(outcome.full_name(), "C > S");
        }
    }

    mod report_tests {
        use super::*;

        fn report() -> SuiteReport {
            let mut report = SuiteReport::new("TodoMVC", "memory", "http://localhost:8888");
            report.push(ScenarioOutcome::passed("A", "one", Duration::from_millis(5), 3));
            report.push(ScenarioOutcome::failed(
                "A",
                "two",
                Duration::from_millis(7),
                &timeout_error(),
            ));
            report.push(ScenarioOutcome::skipped("B", "three"));
            report.finish(Duration::from_millis(1500));
            report
        }

        #[test]
        fn test_counts() {
            let report = report();
            assert_eq!(report.total_count(), 3);
            assert_eq!(report.passed_count(), 1);
            assert_eq!(report.failed_count(), 1);
            assert_eq!(report.skipped_count(), 1);
            assert!(!report.all_passed());
            assert_eq!(report.failures()[0].scenario, "two");
        }

        #[test]
        fn test_summary() {
            assert_eq!(
                report().summary(),
                "TodoMVC: 1 passed, 1 failed, 1 skipped (1.50s)"
            );
        }

        #[test]
        fn test_json_shape() {
            let json: serde_json::Value =
                serde_json::from_str(&report().to_json().unwrap()).unwrap();
            assert_eq!(json["driver"], "memory");
            assert_eq!(json["duration_ms"], 1500);
            assert_eq!(json["outcomes"][1]["status"], "failed");
            assert_eq!(json["outcomes"][1]["failure"]["index"], 10);
            assert_eq!(json["outcomes"][2]["status"], "skipped");
        }

        #[test]
        fn test_write_json() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("report.json");
            report().write_json(&path).unwrap();
            let back: SuiteReport =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(back.outcomes.len(), 3);
        }

        #[test]
        fn test_empty_report_passes() {
            let report = SuiteReport::new("empty", "memory", "x");
            assert!(report.all_passed());
        }
    }
}
