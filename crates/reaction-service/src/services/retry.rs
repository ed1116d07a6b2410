//! Retry policy for conflicting reaction transactions

use std::time::Duration;

use reaction_common::ReactionConfig;

/// Retry policy with exponential backoff and jitter
///
/// ```
/// use reaction_service::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_attempts(3)
///     .with_initial_delay(Duration::from_millis(5));
/// assert_eq!(policy.max_attempts(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    max_attempts: u32,
    /// Delay before the first retry
    initial_delay: Duration,
    /// Cap on the exponential backoff
    max_delay: Duration,
}

/// Each retry waits twice as long as the previous one, up to `max_delay`
const BACKOFF_MULTIPLIER: f64 = 2.0;

impl RetryPolicy {
    /// Defaults: 5 attempts, 10ms initial delay, 200ms cap, doubling.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(200),
        }
    }

    /// Build from the reaction section of the application config
    #[must_use]
    pub fn from_config(config: &ReactionConfig) -> Self {
        Self::new()
            .with_max_attempts(config.max_attempts)
            .with_initial_delay(Duration::from_millis(config.initial_backoff_ms))
            .with_max_delay(Duration::from_millis(config.max_backoff_ms))
    }

    /// Set maximum attempts. Zero is treated as one.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = if attempts == 0 { 1 } else { attempts };
        self
    }

    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay before retry number `retry` (0-indexed):
    /// `min(initial * 2^retry, max) * random(0.5..=1.0)`
    #[must_use]
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        use rand::Rng;

        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let base_secs = self.initial_delay.as_secs_f64() * BACKOFF_MULTIPLIER.powi(exponent);
        let capped_secs = base_secs.min(self.max_delay.as_secs_f64());

        let jitter = rand::thread_rng().gen_range(0.5..=1.0);
        Duration::from_secs_f64(capped_secs * jitter)
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt is allowed after `attempts_made`
    #[must_use]
    pub const fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
