//! Result and error types for the TodoMVC suite.

use thiserror::Error;

/// Result type for suite operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can occur while driving or asserting on the application
#[derive(Debug, Error)]
pub enum E2eError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Target element was never located within the bounded wait
    #[error("Element not found: {selector} (waited {waited_ms}ms)")]
    LocatorTimeout {
        /// Rendered selector chain
        selector: String,
        /// Time spent waiting in milliseconds
        waited_ms: u64,
    },

    /// An action matched more than one element
    #[error("Strict mode violation: {selector} matched {count} elements")]
    StrictModeViolation {
        /// Rendered selector chain
        selector: String,
        /// Number of matches
        count: usize,
    },

    /// Predicate never became true within the bounded wait
    #[error(
        "Timed out after {waited_ms}ms ({attempts} attempt(s)) on {subject}: expected {expected}, last observed {actual}"
    )]
    AssertionTimeout {
        /// What was being asserted on
        subject: String,
        /// Expected observation
        expected: String,
        /// Last observed value
        actual: String,
        /// Number of polls performed
        attempts: usize,
        /// Time spent polling in milliseconds
        waited_ms: u64,
    },

    /// Input simulation error
    #[error("Input simulation failed on {selector}: {message}")]
    InputError {
        /// Rendered selector chain
        selector: String,
        /// Error message
        message: String,
    },

    /// Alias recalled before being remembered
    #[error("Unknown alias @{name}")]
    UnknownAlias {
        /// Alias name
        name: String,
    },

    /// Script evaluation error
    #[error("Script evaluation failed: {message}")]
    ScriptError {
        /// Error message
        message: String,
    },

    /// A step failed inside a scenario
    #[error("Step {index} ({step}) failed: {source}")]
    StepFailed {
        /// Zero-based step index
        index: usize,
        /// Step description
        step: String,
        /// Underlying failure
        #[source]
        source: Box<E2eError>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },

    /// Fixture error
    #[error("Fixture error: {message}")]
    FixtureError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl E2eError {
    /// Wrap an error with the step that produced it
    #[must_use]
    pub fn at_step(self, index: usize, step: impl Into<String>) -> Self {
        Self::StepFailed {
            index,
            step: step.into(),
            source: Box::new(self),
        }
    }

    /// Step index when this error came from a scenario step
    #[must_use]
    pub const fn step_index(&self) -> Option<usize> {
        match self {
            Self::StepFailed { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Innermost error, skipping step wrappers
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::StepFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// True for locator and assertion timeouts
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.root(),
            Self::LocatorTimeout { .. } | Self::AssertionTimeout { .. }
        )
    }
}
