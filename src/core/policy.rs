use std::time::Duration;

/// Attempt budget and fixed delays for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Network attempts per request
    pub attempts: u32,
    /// Wait after a "model loading" reply
    pub loading_delay: Duration,
    /// Wait after a transport or write failure
    pub transport_delay: Duration,
    /// Per-attempt HTTP timeout
    pub timeout: Duration,
    /// Pause after each successful request of a batch
    pub pacing: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            loading_delay: Duration::from_secs(20),
            transport_delay: Duration::from_secs(10),
            timeout: Duration::from_secs(60),
            pacing: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }
}
