//! Bounded polling for eventually-consistent UI state.
//!
//! The application updates its DOM asynchronously relative to the script
//! driving it, so nothing is checked once. Callers own the loop: observe the
//! driver, evaluate, and on a miss hand the last observation to
//! [`Poller::retry`], which sleeps or reports that the budget is spent.
//!
//! ```ignore
//! let mut poller = Poller::new(config);
//! loop {
//!     let observed = driver.observe(&locator).await?;
//!     match expectation.evaluate(&observed) {
//!         Ok(()) => break poller.finish(),
//!         Err(miss) => poller.retry(miss.actual).await?,
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total timeout duration
    pub timeout: Duration,
    /// Interval between retry attempts
    pub poll_interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(4),
            poll_interval: Duration::from_millis(50),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with timeout
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(50),
        }
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Result of a successful poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryResult {
    /// Number of attempts, including the successful one
    pub attempts: usize,
    /// Total duration of all attempts
    pub duration: Duration,
}

/// Poll budget exhausted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryError {
    /// Last observation reported by the caller
    pub last_observed: String,
    /// Number of attempts made
    pub attempts: usize,
    /// Total duration of all attempts
    pub duration: Duration,
}

impl RetryError {
    /// Elapsed wait in whole milliseconds
    #[must_use]
    pub fn waited_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}

impl fmt::Display for RetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempt(s) ({:.2}s), last observed {}",
            self.attempts,
            self.duration.as_secs_f64(),
            self.last_observed
        )
    }
}

impl std::error::Error for RetryError {}

/// Tracks one bounded wait
#[derive(Debug)]
pub struct Poller {
    config: RetryConfig,
    start: Instant,
    failed_attempts: usize,
}

impl Poller {
    /// Start the clock
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            start: Instant::now(),
            failed_attempts: 0,
        }
    }

    /// Get the config
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Time since the poller started
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Record a miss. Sleeps until the next attempt, or fails once the
    /// timeout is reached.
    pub async fn retry(&mut self, observed: impl Into<String>) -> Result<(), RetryError> {
        self.failed_attempts += 1;
        let elapsed = self.start.elapsed();

        if elapsed >= self.config.timeout {
            return Err(RetryError {
                last_observed: observed.into(),
                attempts: self.failed_attempts,
                duration: elapsed,
            });
        }

        let remaining = self.config.timeout.saturating_sub(elapsed);
        tokio::time::sleep(self.config.poll_interval.min(remaining)).await;
        Ok(())
    }

    /// Summarize a successful wait
    #[must_use]
    pub fn finish(&self) -> RetryResult {
        RetryResult {
            attempts: self.failed_attempts + 1,
            duration: self.start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_config() {
            let config = RetryConfig::default();
            assert_eq!(config.timeout, Duration::from_secs(4));
            assert_eq!(config.poll_interval, Duration::from_millis(50));
        }

        #[test]
        fn test_builder() {
            let config = RetryConfig::new(Duration::from_secs(1))
                .with_poll_interval(Duration::from_millis(5));
            assert_eq!(config.timeout, Duration::from_secs(1));
            assert_eq!(config.poll_interval, Duration::from_millis(5));
        }
    }

    mod poller_tests {
        use super::*;

        fn quick() -> RetryConfig {
            RetryConfig::new(Duration::from_millis(500))
                .with_poll_interval(Duration::from_millis(10))
        }

        #[tokio::test]
        async fn test_immediate_success_is_one_attempt() {
            let poller = Poller::new(quick());
            let result = poller.finish();
            assert_eq!(result.attempts, 1);
        }

        #[tokio::test]
        async fn test_succeeds_after_misses() {
            let mut poller = Poller::new(quick());
            let mut value = 0;
            let result = loop {
                value += 1;
                if value == 3 {
                    break poller.finish();
                }
                poller.retry(format!("value {value}")).await.unwrap();
            };
            assert_eq!(result.attempts, 3);
        }

        #[tokio::test]
        async fn test_times_out_with_last_observation() {
            let config = RetryConfig::new(Duration::from_millis(40))
                .with_poll_interval(Duration::from_millis(5));
            let mut poller = Poller::new(config);
            let mut n = 0;
            let err = loop {
                n += 1;
                if let Err(e) = poller.retry(format!("observation {n}")).await {
                    break e;
                }
            };
            assert_eq!(err.last_observed, format!("observation {n}"));
            assert_eq!(err.attempts, n);
            assert!(err.duration >= Duration::from_millis(40));
            assert!(err.to_string().contains("last observed"));
        }

        #[tokio::test]
        async fn test_zero_timeout_fails_on_first_miss() {
            let mut poller = Poller::new(RetryConfig::new(Duration::ZERO));
            let err = poller.retry("nothing").await.unwrap_err();
            assert_eq!(err.attempts, 1);
        }
    }
}
