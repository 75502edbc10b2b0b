use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration for individual commands
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 disables retrying)
    pub max_retries: u32,

    /// Initial delay between retries in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (typically 2.0)
    pub backoff_multiplier: f64,

    /// Whether to add jitter to prevent thundering herd
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Create a retry configuration that never retries
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a retry config with custom max retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Create a retry config with custom initial delay
    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    /// Create a retry config with custom max delay
    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    /// Disable jitter
    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Retry a blocking operation with exponential backoff
///
/// Only errors accepted by `should_retry` are retried; anything else is
/// returned immediately.
///
/// # Example
/// ```ignore
/// use storage::common::{retry_with_backoff, RetryConfig, StorageError};
///
/// let config = RetryConfig::new().with_max_retries(3).with_initial_delay(8);
/// let value: i64 = retry_with_backoff(|| run_incr(), &config, StorageError::is_transient)?;
/// ```
pub fn retry_with_backoff<F, T, E, P>(
    mut operation: F,
    config: &RetryConfig,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        match operation() {
            Ok(result) => {
                if attempt > 0 {
                    debug!("Operation succeeded after {} retries", attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                if !should_retry(&e) {
                    return Err(e);
                }

                attempt += 1;

                if attempt > config.max_retries {
                    if config.max_retries > 0 {
                        warn!(
                            "Operation failed after {} attempts: {}",
                            config.max_retries, e
                        );
                    }
                    return Err(e);
                }

                let current_delay = if config.use_jitter {
                    apply_jitter(delay)
                } else {
                    delay
                };

                debug!(
                    "Operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempt, config.max_retries, e, current_delay
                );

                std::thread::sleep(Duration::from_millis(current_delay));

                // A zero cap leaves the backoff unbounded
                delay = (delay as f64 * config.backoff_multiplier) as u64;
                if config.max_delay_ms > 0 {
                    delay = delay.min(config.max_delay_ms);
                }
            }
        }
    }
}

/// Apply jitter to a delay value to prevent thundering herd
///
/// Uses a random value between 50% and 100% of the original delay
fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5; // 0.5 to 1.0

    (delay as f64 * random_factor) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn always(_: &String) -> bool {
        true
    }

    #[test]
    fn test_retry_success_first_attempt() {
        let counter = Cell::new(0);

        let result = retry_with_backoff(
            || {
                counter.set(counter.get() + 1);
                Ok::<_, String>("success")
            },
            &RetryConfig::new().with_max_retries(3),
            always,
        );

        assert_eq!(result.unwrap(), "success");
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_retry_success_after_failures() {
        let counter = Cell::new(0);
        let config = RetryConfig::new()
            .with_max_retries(3)
            .with_initial_delay(5)
            .with_max_delay(20)
            .without_jitter();

        let result = retry_with_backoff(
            || {
                let count = counter.get();
                counter.set(count + 1);
                if count < 2 {
                    Err(format!("Attempt {}", count + 1))
                } else {
                    Ok("success")
                }
            },
            &config,
            always,
        );

        assert_eq!(result.unwrap(), "success");
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn test_retry_max_retries_exceeded() {
        let counter = Cell::new(0);
        let config = RetryConfig::new()
            .with_max_retries(2)
            .with_initial_delay(5)
            .with_max_delay(20)
            .without_jitter();

        let result = retry_with_backoff(
            || {
                counter.set(counter.get() + 1);
                Err::<String, _>("always fails".to_string())
            },
            &config,
            always,
        );

        assert_eq!(result.unwrap_err(), "always fails");
        assert_eq!(counter.get(), 3); // 1 initial + 2 retries
    }

    #[test]
    fn test_zero_retries_runs_once() {
        let counter = Cell::new(0);

        let result = retry_with_backoff(
            || {
                counter.set(counter.get() + 1);
                Err::<(), _>("down".to_string())
            },
            &RetryConfig::new(),
            always,
        );

        assert!(result.is_err());
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_non_retryable_error_returns_immediately() {
        let counter = Cell::new(0);
        let config = RetryConfig::new().with_max_retries(5);

        let result = retry_with_backoff(
            || {
                counter.set(counter.get() + 1);
                Err::<(), _>("WRONGTYPE".to_string())
            },
            &config,
            |e: &String| !e.starts_with("WRONGTYPE"),
        );

        assert!(result.is_err());
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_retry_config_builder() {
        let config = RetryConfig::new()
            .with_max_retries(5)
            .with_initial_delay(200)
            .with_max_delay(10000)
            .without_jitter();

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.initial_delay_ms, 200);
        assert_eq!(config.max_delay_ms, 10000);
        assert!(!config.use_jitter);
    }

    #[test]
    fn test_apply_jitter() {
        let delay = 1000;
        for _ in 0..10 {
            let jittered = apply_jitter(delay);
            assert!(jittered >= 500); // At least 50%
            assert!(jittered <= 1000); // At most 100%
        }
    }

    #[test]
    fn test_exponential_backoff() {
        let start = std::time::Instant::now();
        let config = RetryConfig::new()
            .with_max_retries(3)
            .with_initial_delay(20)
            .with_max_delay(1000)
            .without_jitter();

        let _result = retry_with_backoff(|| Err::<(), _>("fail".to_string()), &config, always);

        // Should take at least 20 + 40 + 80 = 140ms
        assert!(start.elapsed().as_millis() >= 140);
    }

    #[test]
    fn test_zero_max_delay_is_uncapped() {
        let start = std::time::Instant::now();
        let config = RetryConfig::new()
            .with_max_retries(2)
            .with_initial_delay(20)
            .without_jitter();

        let _result = retry_with_backoff(|| Err::<(), _>("fail".to_string()), &config, always);

        // 20 + 40 = 60ms, not 20 + 0
        assert!(start.elapsed().as_millis() >= 60);
    }
}
