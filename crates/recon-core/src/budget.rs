//! Hard ceilings for a resolution run.

use std::time::Duration;

/// Bounds every resolution run. Delays are fixed; there is no exponential
/// backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    /// Rounds of the identifier endpoint sweep.
    pub rounds: u32,
    /// Pause between two identifier rounds.
    pub round_delay: Duration,
    /// Polls of the record detail endpoint while waiting for the artifact.
    pub poll_attempts: u32,
    /// Pause between two detail polls.
    pub poll_interval: Duration,
    /// Maximum number of requests one run may issue.
    pub max_attempts: u32,
    /// Maximum wall-clock time of one run.
    pub deadline: Duration,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self {
            rounds: 6,
            round_delay: Duration::from_millis(900),
            poll_attempts: 6,
            poll_interval: Duration::from_secs(2),
            max_attempts: 128,
            deadline: Duration::from_secs(90),
        }
    }
}

impl RetryBudget {
    /// Budget with no waiting at all. Handy for one-shot probes.
    #[must_use]
    pub const fn immediate(rounds: u32, poll_attempts: u32) -> Self {
        Self {
            rounds,
            round_delay: Duration::ZERO,
            poll_attempts,
            poll_interval: Duration::ZERO,
            max_attempts: 128,
            deadline: Duration::from_secs(90),
        }
    }

    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}
