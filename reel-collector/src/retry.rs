use tracing::debug;

/// Configuration for stall-bounded loops
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Consecutive attempts without progress before giving up
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Outcome of feeding one observation into a [`BoundedRetry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// The tracked count grew; the attempt counter was reset
    Progressed,
    /// No growth; the attempt counter went up but budget remains
    Stalled { attempts: u32 },
    /// No growth and the budget is spent
    Exhausted,
}

/// Bounded retry with progress reset.
///
/// `attempts` returns to zero whenever the observed count grows and goes up
/// by one otherwise; the loop stops once `attempts >= max_attempts` or its
/// goal is reached.
#[derive(Debug, Clone)]
pub struct BoundedRetry {
    max_attempts: u32,
    attempts: u32,
    last_count: usize,
}

impl BoundedRetry {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            attempts: 0,
            last_count: 0,
        }
    }

    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self::new(&RetryConfig { max_attempts })
    }

    /// Records the current size of whatever the loop accumulates.
    pub fn observe(&mut self, count: usize) -> RetryState {
        if count > self.last_count {
            self.last_count = count;
            self.attempts = 0;
            RetryState::Progressed
        } else {
            self.record_stall()
        }
    }

    /// Counts an extra stalled attempt, e.g. a fallback action that failed.
    pub fn record_stall(&mut self) -> RetryState {
        self.attempts = self.attempts.saturating_add(1);
        debug!(
            "No progress (attempt {}/{})",
            self.attempts, self.max_attempts
        );
        self.state()
    }

    pub fn state(&self) -> RetryState {
        if self.is_exhausted() {
            RetryState::Exhausted
        } else if self.attempts == 0 {
            RetryState::Progressed
        } else {
            RetryState::Stalled {
                attempts: self.attempts,
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// True while neither the goal nor the stall budget has been reached.
    pub fn should_continue(&self, goal_reached: bool) -> bool {
        !goal_reached && !self.is_exhausted()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let retry = BoundedRetry::new(&RetryConfig::default());
        assert_eq!(retry.max_attempts(), 3);
        assert_eq!(retry.state(), RetryState::Progressed);
    }

    #[test]
    fn test_progress_resets_attempts() {
        let mut retry = BoundedRetry::with_max_attempts(3);

        assert_eq!(retry.observe(0), RetryState::Stalled { attempts: 1 });
        assert_eq!(retry.observe(0), RetryState::Stalled { attempts: 2 });
        assert_eq!(retry.observe(4), RetryState::Progressed);
        assert_eq!(retry.attempts(), 0);
        assert_eq!(retry.observe(4), RetryState::Stalled { attempts: 1 });
    }

    #[test]
    fn test_exhausts_after_consecutive_stalls() {
        let mut retry = BoundedRetry::with_max_attempts(2);
        retry.observe(1);
        assert!(retry.should_continue(false));
        retry.observe(1);
        assert_eq!(retry.observe(1), RetryState::Exhausted);
        assert!(!retry.should_continue(false));
    }

    #[test]
    fn test_extra_stall_counts_toward_budget() {
        let mut retry = BoundedRetry::with_max_attempts(3);
        retry.observe(2);
        retry.observe(2);
        assert_eq!(retry.record_stall(), RetryState::Stalled { attempts: 2 });
        assert_eq!(retry.record_stall(), RetryState::Exhausted);
    }

    #[test]
    fn test_goal_stops_loop() {
        let retry = BoundedRetry::with_max_attempts(5);
        assert!(!retry.should_continue(true));
    }

    #[test]
    fn test_shrinking_count_is_a_stall() {
        let mut retry = BoundedRetry::with_max_attempts(3);
        retry.observe(5);
        assert_eq!(retry.observe(3), RetryState::Stalled { attempts: 1 });
    }
}
