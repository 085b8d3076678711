//! Command handlers

use crate::commands::{Cli, ConfigArgs, ListArgs, RunArgs};
use crate::config::{CliConfig, ColorChoice, Verbosity};
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ProgressReporter};
use std::path::Path;
use std::time::Duration;
use todomvc_e2e::{
    todomvc_suite, DriverKind, MemoryDriver, RunnerConfig, ScenarioRunner, Suite, SuiteConfig,
    SuiteReport, TodoDriver, TodoFixture,
};

/// Build the CLI configuration from global flags
#[must_use]
pub fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

/// Load the suite configuration file, then apply flag overrides
pub fn suite_config(args: &RunArgs) -> CliResult<SuiteConfig> {
    let mut config = match &args.config {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };

    if let Some(url) = &args.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(driver) = args.driver {
        config.driver = driver.into();
    }
    if let Some(filter) = &args.filter {
        config.filter = Some(filter.clone());
    }
    if args.fail_fast {
        config.fail_fast = true;
    }
    if let Some(ms) = args.timeout {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    if args.headed {
        config.browser = config.browser.headless(false);
    }
    if let Some(path) = &args.fixture {
        config.fixture = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Load seed items, or fall back to the default three
pub fn load_fixture(path: Option<&Path>) -> CliResult<TodoFixture> {
    match path {
        Some(path) => Ok(TodoFixture::load(path)?),
        None => Ok(TodoFixture::default()),
    }
}

/// Execute the run command; fails when any selected scenario fails
pub fn execute_run(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let suite_config = suite_config(args)?;
    let fixture = load_fixture(suite_config.fixture.as_deref())?;
    let suite = todomvc_suite(&fixture);
    let format: OutputFormat = args.format.into();

    let mut reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    if format == OutputFormat::Text {
        reporter.start_spinner(&format!(
            "Running {} against {}",
            suite.name, suite_config.base_url
        ));
    }

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::config(format!("failed to start async runtime: {e}")))?;
    let result = runtime.block_on(run_suite(&suite, &suite_config));
    reporter.finish();
    let report = result?;

    if let Some(path) = &args.report {
        report.write_json(path)?;
        tracing::info!(path = %path.display(), "report written");
    }

    match format {
        OutputFormat::Text => reporter.report(&report),
        OutputFormat::Json => reporter.line(&report.to_json()?),
    }

    if report.all_passed() {
        Ok(())
    } else {
        Err(CliError::SuiteFailed {
            failed: report.failed_count(),
            total: report.total_count(),
        })
    }
}

async fn run_suite(suite: &Suite, config: &SuiteConfig) -> CliResult<SuiteReport> {
    let runner_config = config.runner_config();
    match config.driver {
        DriverKind::Memory => run_with(MemoryDriver::new(), suite, runner_config).await,
        DriverKind::Chromium => run_chromium(suite, config, runner_config).await,
    }
}

#[cfg(feature = "browser")]
async fn run_chromium(
    suite: &Suite,
    config: &SuiteConfig,
    runner_config: RunnerConfig,
) -> CliResult<SuiteReport> {
    let driver = todomvc_e2e::ChromiumDriver::launch(config.browser.clone()).await?;
    run_with(driver, suite, runner_config).await
}

#[cfg(not(feature = "browser"))]
async fn run_chromium(
    _suite: &Suite,
    _config: &SuiteConfig,
    _runner_config: RunnerConfig,
) -> CliResult<SuiteReport> {
    Err(CliError::config(
        "the chromium driver is not enabled. Rebuild with --features browser or use --driver memory",
    ))
}

async fn run_with<D: TodoDriver>(
    driver: D,
    suite: &Suite,
    runner_config: RunnerConfig,
) -> CliResult<SuiteReport> {
    let mut runner = ScenarioRunner::new(driver, runner_config);
    let report = runner.run_suite(suite).await;
    if let Err(e) = runner.close().await {
        tracing::warn!(error = %e, "failed to close driver");
    }
    Ok(report)
}

/// Execute the list command
pub fn execute_list(config: &CliConfig, args: &ListArgs) -> CliResult<()> {
    let fixture = load_fixture(args.fixture.as_deref())?;
    let suite = todomvc_suite(&fixture);
    let selection = RunnerConfig::default();
    let selection = match &args.filter {
        Some(filter) => selection.with_filter(filter.clone()),
        None => selection,
    };

    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    for name in suite.full_names() {
        if selection.selects(&name) {
            reporter.line(&name);
        }
    }
    Ok(())
}

/// Execute the config command
pub fn execute_config(args: &ConfigArgs) -> CliResult<()> {
    let config = match (&args.config, args.defaults) {
        (Some(path), false) => SuiteConfig::load(path)?,
        _ => SuiteConfig::default(),
    };
    print!("{}", config.to_yaml()?);
    Ok(())
}
