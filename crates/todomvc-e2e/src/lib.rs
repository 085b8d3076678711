//! todomvc-e2e: End-to-End Behavioral Suite for TodoMVC
//!
//! Drives a TodoMVC page through simulated user input and asserts on the
//! resulting DOM, polling every assertion until it holds or times out.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    todomvc-e2e Architecture                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────────┐    │
//! │   │ Scenarios  │    │ Scenario   │    │ TodoDriver         │    │
//! │   │ (Suite)    │───►│ Runner     │───►│  ├ ChromiumDriver  │    │
//! │   │            │    │ + Poller   │    │  └ MemoryDriver    │    │
//! │   └────────────┘    └────────────┘    └────────────────────┘    │
//! │                            │                                    │
//! │                            ▼                                    │
//! │                      SuiteReport (JSON)                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use todomvc_e2e::prelude::*;
//!
//! let suite = todomvc_suite(&TodoFixture::default());
//! let mut runner = ScenarioRunner::new(MemoryDriver::new(), RunnerConfig::default());
//! let report = runner.run_suite(&suite).await;
//! assert!(report.all_passed());
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

#[cfg(feature = "browser")]
mod browser;
mod config;
mod driver;
mod expectation;
mod fixture;
mod locator;
/// In-process TodoMVC application and its driver
pub mod memory;
mod reporter;
mod result;
mod runner;
mod scenario;
mod todomvc;
mod wait;

#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::{DriverKind, SuiteConfig, DEFAULT_BASE_URL};
pub use driver::{DriverConfig, ElementState, Key, Observation, TodoDriver};
pub use expectation::{Expectation, Mismatch};
pub use fixture::{items_left_text, TodoFixture};
pub use locator::{
    Locator, LocatorOptions, Refinement, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};
pub use memory::{AppDefect, MemoryDriver};
pub use reporter::{ScenarioOutcome, StepFailure, SuiteReport, TestStatus};
pub use result::{E2eError, E2eResult};
pub use runner::{Aliases, RunnerConfig, ScenarioRunner};
pub use scenario::{
    full_name, Action, Context, Scenario, Setup, Step, StepSequence, Suite, Target, NEW_TODO,
    TODO_ITEMS,
};
pub use todomvc::{todomvc_suite, EDITED_LABEL, SUITE_NAME};
pub use wait::{Poller, RetryConfig, RetryError, RetryResult};

/// Prelude for convenient imports
pub mod prelude {
    #[cfg(feature = "browser")]
    pub use super::browser::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::expectation::*;
    pub use super::fixture::*;
    pub use super::locator::*;
    pub use super::memory::{AppDefect, MemoryDriver};
    pub use super::reporter::*;
    pub use super::result::*;
    pub use super::runner::*;
    pub use super::scenario::*;
    pub use super::todomvc::*;
    pub use super::wait::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod prelude_tests {
        #[test]
        fn test_prelude_exposes_runner_types() {
            use crate::prelude::*;
            let config = RunnerConfig::default();
            let _runner = ScenarioRunner::new(MemoryDriver::new(), config);
            let _suite = todomvc_suite(&TodoFixture::default());
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_browser_not_found_display() {
            let msg = E2eError::BrowserNotFound.to_string();
            assert!(msg.contains("Browser") || msg.contains("browser"));
        }

        #[test]
        fn test_unknown_alias_display() {
            let err = E2eError::UnknownAlias {
                name: "secondTodo".to_string(),
            };
            assert_eq!(err.to_string(), "Unknown alias @secondTodo");
        }
    }
}
