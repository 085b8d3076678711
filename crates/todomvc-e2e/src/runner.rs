//! Scenario runner.
//!
//! Executes scenarios one at a time against a [`TodoDriver`]:
//!
//! 1. navigate to the start page (fresh application state)
//! 2. run the context setup steps, then the scenario steps
//! 3. blur the focused element, whatever the outcome
//!
//! Action targets are awaited within the action timeout; expectations are
//! polled within the assertion timeout. A failure stops only the current
//! scenario.

use crate::driver::{Observation, TodoDriver};
use crate::expectation::Expectation;
use crate::locator::{Locator, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::reporter::{ScenarioOutcome, SuiteReport};
use crate::result::{E2eError, E2eResult};
use crate::scenario::{full_name, Action, Context, Scenario, Step, Suite, Target};
use crate::wait::{Poller, RetryConfig, RetryResult};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Runner settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Start page, visited before every scenario
    pub base_url: String,
    /// Bounded wait for action targets
    pub action_timeout: Duration,
    /// Bounded wait for expectations
    pub assertion_timeout: Duration,
    /// Interval between polls
    pub poll_interval: Duration,
    /// Skip remaining scenarios after the first failure
    pub fail_fast: bool,
    /// Case-insensitive substring filter on "context > scenario"
    pub filter: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            action_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            assertion_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            fail_fast: false,
            filter: None,
        }
    }
}

impl RunnerConfig {
    /// Create with defaults and a start page
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set both timeouts
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self.assertion_timeout = timeout;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Stop after the first failure
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Only run matching scenarios
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Whether a scenario's full name passes the filter
    #[must_use]
    pub fn selects(&self, full_name: &str) -> bool {
        self.filter.as_ref().map_or(true, |f| {
            full_name.to_lowercase().contains(&f.to_lowercase())
        })
    }

    /// Resolve a visit target against the start page
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.contains("://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }

    fn retry(&self, timeout: Duration) -> RetryConfig {
        RetryConfig::new(timeout).with_poll_interval(self.poll_interval)
    }
}

/// Scenario-scoped alias registry
#[derive(Debug, Clone, Default)]
pub struct Aliases {
    named: HashMap<String, Locator>,
}

impl Aliases {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or rebind) a name
    pub fn remember(&mut self, name: impl Into<String>, locator: Locator) {
        self.named.insert(name.into(), locator);
    }

    /// Look up a name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Locator> {
        self.named.get(name)
    }

    /// Turn a target into a concrete locator
    pub fn resolve(&self, target: &Target) -> E2eResult<Locator> {
        match target {
            Target::Locator(locator) => Ok(locator.clone()),
            Target::Alias { name, refinements } => self
                .named
                .get(name)
                .map(|locator| locator.clone().refine(refinements))
                .ok_or_else(|| E2eError::UnknownAlias { name: name.clone() }),
        }
    }
}

/// Runs scenarios against a driver
#[derive(Debug)]
pub struct ScenarioRunner<D: TodoDriver> {
    driver: D,
    config: RunnerConfig,
}

impl<D: TodoDriver> ScenarioRunner<D> {
    /// Create a runner
    #[must_use]
    pub const fn new(driver: D, config: RunnerConfig) -> Self {
        Self { driver, config }
    }

    /// Get the config
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Borrow the driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutably borrow the driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Close the driver and give it back
    pub async fn close(mut self) -> E2eResult<D> {
        self.driver.close().await?;
        Ok(self.driver)
    }

    /// Run every selected scenario of a suite
    pub async fn run_suite(&mut self, suite: &Suite) -> SuiteReport {
        let started = Instant::now();
        let mut report = SuiteReport::new(&suite.name, self.driver.name(), &self.config.base_url);
        let mut stopped = false;

        for (context, scenario) in suite.iter() {
            if !self.config.selects(&full_name(context, scenario)) {
                continue;
            }
            if stopped {
                report.push(ScenarioOutcome::skipped(&context.name, &scenario.name));
                continue;
            }
            let outcome = self.run_scenario(context, scenario).await;
            if outcome.status.is_failed() && self.config.fail_fast {
                tracing::warn!("fail-fast: skipping remaining scenarios");
                stopped = true;
            }
            report.push(outcome);
        }

        report.finish(started.elapsed());
        tracing::info!(summary = %report.summary(), "suite finished");
        report
    }

    /// Run one scenario with its context setup
    pub async fn run_scenario(&mut self, context: &Context, scenario: &Scenario) -> ScenarioOutcome {
        let name = full_name(context, scenario);
        tracing::info!(scenario = %name, "scenario started");
        let started = Instant::now();

        let result = self.execute(context, scenario).await;

        if let Err(e) = self.driver.blur_active().await {
            tracing::warn!(scenario = %name, error = %e, "blur after scenario failed");
        }

        let duration = started.elapsed();
        match result {
            Ok(steps) => {
                tracing::info!(scenario = %name, steps, ?duration, "scenario passed");
                ScenarioOutcome::passed(&context.name, &scenario.name, duration, steps)
            }
            Err(error) => {
                tracing::info!(scenario = %name, error = %error, "scenario failed");
                ScenarioOutcome::failed(&context.name, &scenario.name, duration, &error)
            }
        }
    }

    /// Reset, then run setup and scenario steps; returns steps executed
    async fn execute(&mut self, context: &Context, scenario: &Scenario) -> E2eResult<usize> {
        let start = self.config.base_url.clone();
        self.driver.navigate(&start).await?;

        let mut aliases = Aliases::new();
        let steps = context.setup.steps.iter().chain(&scenario.steps);
        let mut executed = 0;
        for (index, step) in steps.enumerate() {
            tracing::debug!(index, step = %step, "step");
            self.run_step(step, &mut aliases)
                .await
                .map_err(|e| e.at_step(index, step.to_string()))?;
            executed += 1;
        }
        Ok(executed)
    }

    /// Execute a single step
    pub async fn run_step(&mut self, step: &Step, aliases: &mut Aliases) -> E2eResult<()> {
        match step {
            Step::Visit(path) => {
                let url = self.config.url_for(path);
                self.driver.navigate(&url).await
            }
            Step::Act { target, action } => {
                let locator = aliases.resolve(target)?;
                self.act(&locator, action).await
            }
            Step::Remember { name, target } => {
                let locator = aliases.resolve(target)?;
                aliases.remember(name.clone(), locator);
                Ok(())
            }
            Step::Expect {
                target,
                expectation,
            } => {
                let locator = aliases.resolve(target)?;
                self.expect(&target.to_string(), &locator, expectation)
                    .await
                    .map(|_| ())
            }
        }
    }

    async fn act(&mut self, locator: &Locator, action: &Action) -> E2eResult<()> {
        let target = self.wait_for_target(locator).await?;
        match action {
            Action::Type(text) => self.driver.type_text(locator, text).await,
            Action::Press(key) => self.driver.press_key(locator, *key).await,
            Action::Click => self.driver.click(locator).await,
            Action::DoubleClick => self.driver.double_click(locator).await,
            Action::Clear => self.driver.clear(locator).await,
            Action::Check | Action::Uncheck => {
                let checked = target
                    .first
                    .as_ref()
                    .and_then(|el| el.checked)
                    .ok_or_else(|| E2eError::InputError {
                        selector: locator.to_string(),
                        message: "element is not a checkbox".to_string(),
                    })?;
                let want = matches!(action, Action::Check);
                if checked == want {
                    tracing::debug!(selector = %locator, checked, "already in requested state");
                    Ok(())
                } else {
                    self.driver.click(locator).await
                }
            }
        }
    }

    /// Wait until the locator matches, enforcing strictness
    pub async fn wait_for_target(&mut self, locator: &Locator) -> E2eResult<Observation> {
        let timeout = locator
            .options()
            .timeout
            .unwrap_or(self.config.action_timeout);
        let mut poller = Poller::new(self.config.retry(timeout));
        loop {
            let observed = self.driver.observe(locator).await?;
            if observed.exists() {
                if locator.options().strict && observed.count > 1 {
                    return Err(E2eError::StrictModeViolation {
                        selector: locator.to_string(),
                        count: observed.count,
                    });
                }
                return Ok(observed);
            }
            if let Err(gave_up) = poller.retry("0 matches").await {
                return Err(E2eError::LocatorTimeout {
                    selector: locator.to_string(),
                    waited_ms: gave_up.waited_ms(),
                });
            }
        }
    }

    /// Poll until the expectation holds or the assertion timeout passes
    pub async fn expect(
        &mut self,
        subject: &str,
        locator: &Locator,
        expectation: &Expectation,
    ) -> E2eResult<RetryResult> {
        let timeout = locator
            .options()
            .timeout
            .unwrap_or(self.config.assertion_timeout);
        let mut poller = Poller::new(self.config.retry(timeout));
        loop {
            let observed = self.driver.observe(locator).await?;
            match expectation.evaluate(&observed) {
                Ok(()) => {
                    let result = poller.finish();
                    tracing::trace!(subject, attempts = result.attempts, "expectation met");
                    return Ok(result);
                }
                Err(miss) => {
                    if let Err(gave_up) = poller.retry(miss.actual).await {
                        return Err(E2eError::AssertionTimeout {
                            subject: subject.to_string(),
                            expected: miss.expected,
                            actual: gave_up.last_observed.clone(),
                            attempts: gave_up.attempts,
                            waited_ms: gave_up.waited_ms(),
                        });
                    }
                }
            }
        }
    }
}
