//! When and how often a failed fetch is tried again.

use std::time::Duration;

use crate::FetchError;

/// Pause before each retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Retry immediately.
    None,
    /// Same pause before every retry.
    Fixed(Duration),
    /// Pause doubles with every retry, starting at `initial`, never above `cap`.
    Exponential { initial: Duration, cap: Duration },
}

impl BackoffStrategy {
    /// Pause before retry number `retry` (the first retry is 0).
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            BackoffStrategy::None => Duration::ZERO,
            BackoffStrategy::Fixed(pause) => pause,
            BackoffStrategy::Exponential { initial, cap } => initial
                .checked_mul(1u32.checked_shl(retry).unwrap_or(u32::MAX))
                .map_or(cap, |pause| pause.min(cap)),
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        BackoffStrategy::Exponential {
            initial: Duration::from_millis(50),
            cap: Duration::from_millis(500),
        }
    }
}

/// A failure worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// This exact status.
    Status(u16),
    /// Any 5xx status.
    ServerError,
    /// The request timed out.
    Timeout,
    /// The host could not be reached.
    Unreachable,
}

impl RetryCondition {
    fn covers_status(self, status: u16) -> bool {
        match self {
            RetryCondition::Status(wanted) => status == wanted,
            RetryCondition::ServerError => status >= 500 && status <= 599,
            RetryCondition::Timeout | RetryCondition::Unreachable => false,
        }
    }

    fn covers_error(self, error: &FetchError) -> bool {
        match (self, error) {
            (RetryCondition::Timeout, FetchError::Timeout) => true,
            (RetryCondition::Unreachable, FetchError::ConnectionError(_)) => true,
            _ => false,
        }
    }
}

/// How many times to retry, which failures qualify and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff: BackoffStrategy,
    pub conditions: Vec<RetryCondition>,
}

impl RetryPolicy {
    /// Retry server errors, timeouts and unreachable hosts up to
    /// `max_retries` times.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: BackoffStrategy::default(),
            conditions: vec![
                RetryCondition::ServerError,
                RetryCondition::Timeout,
                RetryCondition::Unreachable,
            ],
        }
    }

    /// Never retry.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffStrategy::None,
            conditions: Vec::new(),
        }
    }

    /// Policy for read-only lookups: like [`RetryPolicy::new`], and also
    /// retries `429 Too Many Requests`.
    pub fn for_reads(max_retries: u32) -> Self {
        Self::new(max_retries).with_condition(RetryCondition::Status(429))
    }

    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_condition(mut self, condition: RetryCondition) -> Self {
        if !self.conditions.contains(&condition) {
            self.conditions.push(condition);
        }
        self
    }

    /// Whether a response with `status` should be retried, given that
    /// `retry` retries have already happened.
    pub fn retries_status(&self, status: u16, retry: u32) -> bool {
        retry < self.max_retries && self.conditions.iter().any(|c| c.covers_status(status))
    }

    /// Whether a transport error should be retried, given that `retry`
    /// retries have already happened.
    pub fn retries_error(&self, error: &FetchError, retry: u32) -> bool {
        retry < self.max_retries && self.conditions.iter().any(|c| c.covers_error(error))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}
