//! Polling policy

use std::time::Duration;

/// Fixed polling cadence applied to every provider.
///
/// The default is one poll per second for at most 300 polls, a five minute
/// wall-clock ceiling. There is no backoff and no per-provider override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 300;

    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Upper bound on time spent sleeping between polls.
    pub fn ceiling(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_second_times_300() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert_eq!(policy.max_attempts, 300);
        assert_eq!(policy.ceiling(), Duration::from_secs(299));
    }

    #[test]
    fn test_at_least_one_attempt() {
        assert_eq!(PollPolicy::new(Duration::ZERO, 0).max_attempts, 1);
    }
}
