use std::time::Duration;

pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);
pub const DEFAULT_DELAY_INCREMENT: Duration = Duration::from_millis(300);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(2500);
pub const DEFAULT_RETRY_CAP: u32 = 5;

/// Delay schedule for automatic recognition restarts.
///
/// `delay_for(retry) = min(base + retry * increment, max_delay)`; the retry
/// counter itself saturates at `retry_cap`. Pure data, so restart timing is
/// testable without timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    pub base_delay: Duration,
    pub delay_increment: Duration,
    pub max_delay: Duration,
    pub retry_cap: u32,
}

impl RestartPolicy {
    pub fn delay_for(&self, retry: u32) -> Duration {
        (self.base_delay + self.delay_increment * retry).min(self.max_delay)
    }

    pub fn next_retry(&self, retry: u32) -> u32 {
        (retry + 1).min(self.retry_cap)
    }
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            delay_increment: DEFAULT_DELAY_INCREMENT,
            max_delay: DEFAULT_MAX_DELAY,
            retry_cap: DEFAULT_RETRY_CAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::first(0, 200)]
    #[case::second(1, 500)]
    #[case::third(2, 800)]
    #[case::at_cap(5, 1700)]
    fn test_default_delay_schedule(#[case] retry: u32, #[case] expected_ms: u64) {
        let policy = RestartPolicy::default();
        assert_eq!(policy.delay_for(retry), Duration::from_millis(expected_ms));
    }

    #[test]
    fn test_delay_is_non_decreasing() {
        let policy = RestartPolicy::default();
        let mut previous = Duration::ZERO;
        for retry in 0..20 {
            let delay = policy.delay_for(retry);
            assert!(delay >= previous);
            previous = delay;
        }
    }

    #[test]
    fn test_max_delay_caps_the_schedule() {
        let policy = RestartPolicy {
            base_delay: Duration::from_millis(1000),
            delay_increment: Duration::from_millis(1000),
            max_delay: Duration::from_millis(2500),
            retry_cap: 10,
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2500));
        assert_eq!(policy.delay_for(9), Duration::from_millis(2500));
    }

    #[test]
    fn test_retry_counter_saturates() {
        let policy = RestartPolicy::default();
        let mut retry = 0;
        for _ in 0..10 {
            retry = policy.next_retry(retry);
        }
        assert_eq!(retry, DEFAULT_RETRY_CAP);
    }
}
