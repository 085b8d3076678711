//! Suite configuration
//!
//! Loaded from YAML; every field has a default so a partial file (or no
//! file at all) is valid.

use crate::driver::DriverConfig;
use crate::locator::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::result::{E2eError, E2eResult};
use crate::runner::RunnerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default start page of the application under test
pub const DEFAULT_BASE_URL: &str = "http://localhost:8888";

/// Which driver backs the run
///
/// Defaults to Chromium when the `browser` feature is built in, otherwise
/// to the in-process model, so a default configuration always runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Real Chromium over CDP
    Chromium,
    /// In-process TodoMVC model
    Memory,
}

impl Default for DriverKind {
    #[cfg(feature = "browser")]
    fn default() -> Self {
        Self::Chromium
    }

    #[cfg(not(feature = "browser"))]
    fn default() -> Self {
        Self::Memory
    }
}

impl DriverKind {
    /// Get the config name of this driver
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Memory => "memory",
        }
    }
}

/// Complete suite configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Start page, visited before every scenario
    pub base_url: String,
    /// Driver backing the run
    pub driver: DriverKind,
    /// Bounded wait for locating action targets
    #[serde(rename = "action_timeout_ms", with = "millis")]
    pub action_timeout: Duration,
    /// Bounded wait for assertions
    #[serde(rename = "assertion_timeout_ms", with = "millis")]
    pub assertion_timeout: Duration,
    /// Interval between polls
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,
    /// Skip remaining scenarios after the first failure
    pub fail_fast: bool,
    /// Only run scenarios whose full name contains this
    pub filter: Option<String>,
    /// Seed items file (JSON)
    pub fixture: Option<PathBuf>,
    /// Browser options for the Chromium driver
    pub browser: DriverConfig,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            driver: DriverKind::default(),
            action_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            assertion_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            fail_fast: false,
            filter: None,
            fixture: None,
            browser: DriverConfig::default(),
        }
    }
}

impl SuiteConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> E2eResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> E2eResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| E2eError::ConfigError {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> E2eResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Reject values that would make every scenario fail
    pub fn validate(&self) -> E2eResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(E2eError::ConfigError {
                message: "base_url must not be empty".to_string(),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(E2eError::ConfigError {
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        if self.poll_interval > self.assertion_timeout {
            return Err(E2eError::ConfigError {
                message: "poll_interval_ms must not exceed assertion_timeout_ms".to_string(),
            });
        }
        Ok(())
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the driver
    #[must_use]
    pub const fn with_driver(mut self, driver: DriverKind) -> Self {
        self.driver = driver;
        self
    }

    /// Set both bounded waits
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self.assertion_timeout = timeout;
        self
    }

    /// Set the name filter
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Settings the scenario runner needs
    #[must_use]
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            base_url: self.base_url.clone(),
            action_timeout: self.action_timeout,
            assertion_timeout: self.assertion_timeout,
            poll_interval: self.poll_interval,
            fail_fast: self.fail_fast,
            filter: self.filter.clone(),
        }
    }
}

/// Serde adapter storing a `Duration` as whole milliseconds
pub(crate) mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
