//! Runs the full TodoMVC suite against the in-process application.
//!
//! A correct application must pass every scenario; each injected defect
//! must fail the scenarios that cover it, with the failing step and the
//! expected and observed values in the report.

use std::time::Duration;
use todomvc_e2e::prelude::*;

fn config() -> RunnerConfig {
    RunnerConfig::new("http://localhost:8888")
        .with_timeout(Duration::from_millis(300))
        .with_poll_interval(Duration::from_millis(5))
}

async fn run(driver: MemoryDriver, config: RunnerConfig) -> SuiteReport {
    let suite = todomvc_suite(&TodoFixture::default());
    let mut runner = ScenarioRunner::new(driver, config);
    runner.run_suite(&suite).await
}

fn outcome<'a>(report: &'a SuiteReport, scenario: &str) -> &'a ScenarioOutcome {
    report
        .outcomes
        .iter()
        .find(|o| o.scenario == scenario)
        .unwrap_or_else(|| panic!("no outcome for {scenario}"))
}

// =============================================================================
// Correct application
// =============================================================================

#[tokio::test]
async fn test_full_suite_passes() {
    let report = run(MemoryDriver::new(), config()).await;
    for failure in report.failures() {
        eprintln!("{}: {:?}", failure.full_name(), failure.failure);
    }
    assert_eq!(report.total_count(), 11);
    assert!(report.all_passed(), "{}", report.summary());
    assert_eq!(report.driver, "memory");
}

#[tokio::test]
async fn test_full_suite_passes_with_render_latency() {
    let driver = MemoryDriver::new().with_render_latency(Duration::from_millis(15));
    let report = run(driver, config()).await;
    for failure in report.failures() {
        eprintln!("{}: {:?}", failure.full_name(), failure.failure);
    }
    assert!(report.all_passed(), "{}", report.summary());
}

#[tokio::test]
async fn test_custom_fixture_passes() {
    let fixture =
        TodoFixture::new(["walk the dog", "water the plants", "call mom", "pay rent"]).unwrap();
    let suite = todomvc_suite(&fixture);
    let mut runner = ScenarioRunner::new(MemoryDriver::new(), config());
    let report = runner.run_suite(&suite).await;
    assert!(report.all_passed(), "{}", report.summary());
}

#[tokio::test]
async fn test_fixture_with_overlapping_labels_passes() {
    // "cat" is a substring of "feed the cat", which sits above it
    let fixture = TodoFixture::new(["feed the cat", "cat", "buy cheese"]).unwrap();
    let suite = todomvc_suite(&fixture);
    let mut runner = ScenarioRunner::new(MemoryDriver::new(), config());
    let report = runner.run_suite(&suite).await;
    for failure in report.failures() {
        eprintln!("{}: {:?}", failure.full_name(), failure.failure);
    }
    assert_eq!(report.passed_count(), 11, "{}", report.summary());
}

// =============================================================================
// Injected defects
// =============================================================================

#[tokio::test]
async fn test_untrimmed_labels_fail_trim_scenario() {
    let driver = MemoryDriver::new().with_defect(AppDefect::NoTrim);
    let report = run(driver, config()).await;

    let trim = outcome(&report, "should trim entered text");
    assert_eq!(trim.status, TestStatus::Failed);
    let failure = trim.failure.as_ref().unwrap();
    // type, enter, wait for row, then the exact-text assertion
    assert_eq!(failure.index, Some(3));
    assert_eq!(failure.expected.as_deref(), Some("have text \"buy some cheese\""));
    assert_eq!(
        failure.actual.as_deref(),
        Some("text \"    buy some cheese    \"")
    );

    // scenarios that never pad their input are unaffected
    assert!(outcome(&report, "should allow me to add todo items").status.is_passed());
}

#[tokio::test]
async fn test_kept_input_fails_clear_scenario() {
    let driver = MemoryDriver::new().with_defect(AppDefect::KeepInput);
    let report = run(driver, config()).await;

    let clear = outcome(&report, "should clear text input field when an item is added");
    let failure = clear.failure.as_ref().unwrap();
    assert_eq!(failure.index, Some(2));
    assert_eq!(failure.expected.as_deref(), Some("have value \"\""));
    assert_eq!(failure.actual.as_deref(), Some("value \"buy some cheese\""));
}

#[tokio::test]
async fn test_stale_toggle_all_fails_aggregate_scenario() {
    let driver = MemoryDriver::new().with_defect(AppDefect::StaleToggleAll);
    let report = run(driver, config()).await;

    let aggregate = outcome(
        &report,
        "complete all checkbox should update state when items are completed / cleared",
    );
    let failure = aggregate.failure.as_ref().unwrap();
    assert!(failure.step.as_deref().unwrap().contains("@toggleAll"));
    assert_eq!(failure.expected.as_deref(), Some("not be checked"));
    assert_eq!(failure.actual.as_deref(), Some("checked"));

    assert!(outcome(&report, "should allow me to mark all items as completed")
        .status
        .is_passed());
}

// =============================================================================
// Runner behavior
// =============================================================================

#[tokio::test]
async fn test_fail_fast_skips_after_first_failure() {
    let driver = MemoryDriver::new().with_defect(AppDefect::KeepInput);
    let report = run(driver, config().with_fail_fast(true)).await;

    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.passed_count(), 1);
    assert_eq!(report.skipped_count(), 9);
    assert_eq!(report.outcomes[2].status, TestStatus::Skipped);
}

#[tokio::test]
async fn test_filter_selects_context() {
    let report = run(MemoryDriver::new(), config().with_filter("mark all")).await;
    assert_eq!(report.total_count(), 3);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.context == "Mark all as completed"));
}

#[tokio::test]
async fn test_unknown_alias_fails_scenario() {
    let suite = Suite::new("aliases").with_context(
        Context::new("Broken").with_scenario(
            Scenario::new("recalls before remembering")
                .create_todo("feed the cat", 0, None)
                .expect(Target::alias("firstTodo"), Expectation::Exist),
        ),
    );
    let mut runner = ScenarioRunner::new(MemoryDriver::new(), config());
    let report = runner.run_suite(&suite).await;
    let failure = report.outcomes[0].failure.as_ref().unwrap();
    assert_eq!(failure.index, Some(3));
    assert_eq!(failure.message, "Unknown alias @firstTodo");
}

#[tokio::test]
async fn test_report_round_trips_through_json() {
    let report = run(MemoryDriver::new(), config().with_filter("New Todo")).await;
    let json = report.to_json().unwrap();
    let back: SuiteReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.run_id, report.run_id);
    assert_eq!(back.total_count(), 5);
    assert_eq!(back.passed_count(), report.passed_count());
    let names: Vec<String> = back.outcomes.iter().map(ScenarioOutcome::full_name).collect();
    assert_eq!(names[0], "New Todo > should allow me to add todo items");
}

#[tokio::test]
async fn test_three_default_items_and_first_completed() {
    let fixture = TodoFixture::default();
    let rows = || Target::css(TODO_ITEMS);
    let completed = Expectation::class("completed");
    let suite = Suite::new("concrete").with_context(
        Context::new("Defaults")
            .with_scenario(
                Scenario::new("three items in order")
                    .create_default_todos(&fixture, None)
                    .expect(rows().nth(0), Expectation::text("buy some cheese"))
                    .expect(rows().nth(1), Expectation::text("feed the cat"))
                    .expect(rows().nth(2), Expectation::text("book a doctors appointment"))
                    .expect(".todo-count", Expectation::text("3 items left"))
                    .expect(NEW_TODO, Expectation::value("")),
            )
            .with_scenario(
                Scenario::new("first completed")
                    .create_default_todos(&fixture, None)
                    .check(rows().nth(0).find(".toggle"))
                    .expect(rows().nth(0), completed.clone())
                    .expect(rows().nth(1), completed.clone().not())
                    .expect(rows().nth(2), completed.not()),
            ),
    );
    let mut runner = ScenarioRunner::new(MemoryDriver::new(), config());
    let report = runner.run_suite(&suite).await;
    assert!(report.all_passed(), "{:?}", report.failures());
}
