//! Retry policy for catalog requests.

use std::time::Duration;

use crate::error::FetchError;

/// Backoff strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffStrategy {
    /// Same delay every time.
    Fixed,
    /// base * 2^(attempt - 1)
    #[default]
    Exponential,
    /// base * attempt
    Linear,
}

/// When to retry a failed request and how long to wait first.
///
/// `max_attempts` counts every request, the first one included: a budget of 3
/// means at most three requests hit the server.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub base_delay: Duration,
    /// Cap for any single delay.
    pub max_delay: Duration,
    pub strategy: BackoffStrategy,
    /// Fraction (0.0-1.0) each delay is shifted by. The shift is a fixed
    /// function of the attempt number, not randomness.
    pub skew: f64,
    /// Which failures are worth another attempt.
    pub retry_predicate: fn(&FetchError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            strategy: BackoffStrategy::Exponential,
            skew: 0.1,
            retry_predicate: FetchError::is_transient,
        }
    }
}

impl RetryPolicy {
    /// One request, no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay: delay,
            max_delay: delay,
            strategy: BackoffStrategy::Fixed,
            skew: 0.0,
            ..Default::default()
        }
    }

    pub fn exponential(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
            strategy: BackoffStrategy::Exponential,
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_predicate(mut self, retry_predicate: fn(&FetchError) -> bool) -> Self {
        self.retry_predicate = retry_predicate;
        self
    }

    /// Delay to wait after failed attempt `attempt` (1-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let nominal = self.nominal_delay_ms(attempt);
        let skewed = nominal * (1.0 + self.skew * skew_fraction(attempt));
        Duration::from_millis(skewed.max(0.0).round() as u64)
    }

    fn nominal_delay_ms(&self, attempt: u32) -> f64 {
        let base = self.base_delay.as_millis() as f64;
        let cap = self.max_delay.as_millis() as f64;
        match self.strategy {
            BackoffStrategy::Fixed => base,
            BackoffStrategy::Linear => (base * f64::from(attempt)).min(cap),
            BackoffStrategy::Exponential => {
                let doublings = attempt.saturating_sub(1).min(62);
                (base * 2_f64.powi(doublings as i32)).min(cap)
            }
        }
    }

    /// Whether a request that just failed as attempt `attempt` (1-indexed)
    /// with `error` should be followed by another.
    pub fn should_retry(&self, attempt: u32, error: &FetchError) -> bool {
        attempt < self.max_attempts && (self.retry_predicate)(error)
    }
}

/// Fixed offset in `[-1.0, 1.0]` for an attempt number. Not random: the same
/// attempt always gets the same offset.
fn skew_fraction(attempt: u32) -> f64 {
    f64::from(attempt.wrapping_mul(7) % 9) / 4.0 - 1.0
}
