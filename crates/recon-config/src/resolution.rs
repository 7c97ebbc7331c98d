//! Resolution bounds.

use std::time::Duration;

use recon_core::RetryBudget;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_rounds() -> u32 {
    6
}

const fn default_round_delay_ms() -> u64 {
    900
}

const fn default_poll_attempts() -> u32 {
    6
}

const fn default_poll_interval_ms() -> u64 {
    2_000
}

const fn default_max_attempts() -> u32 {
    128
}

const fn default_deadline_secs() -> u64 {
    90
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolutionConfig {
    /// Rounds of the identifier endpoint sweep.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    #[serde(default = "default_round_delay_ms")]
    pub round_delay_ms: u64,

    /// Polls of the detail endpoint while waiting for the artifact.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Hard ceiling on requests per run.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Hard wall-clock ceiling per run, in seconds.
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            round_delay_ms: default_round_delay_ms(),
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

impl ResolutionConfig {
    /// Reject bounds that would make a run either useless or unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidValue {
            field: format!("resolution.{field}"),
            reason: reason.to_string(),
        };
        if self.rounds == 0 {
            return Err(invalid("rounds", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        if self.deadline_secs == 0 {
            return Err(invalid("deadline_secs", "must be at least 1"));
        }
        Ok(())
    }

    #[must_use]
    pub const fn budget(&self) -> RetryBudget {
        RetryBudget {
            rounds: self.rounds,
            round_delay: Duration::from_millis(self.round_delay_ms),
            poll_attempts: self.poll_attempts,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_attempts,
            deadline: Duration::from_secs(self.deadline_secs),
        }
    }
}
