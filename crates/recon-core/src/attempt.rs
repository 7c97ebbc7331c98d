//! Diagnostic record of one endpoint probe.

use std::fmt;

use serde::Serialize;

/// One `(template, url, outcome)` tuple. Kept only for the lifetime of a
/// resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointAttempt {
    /// Endpoint pattern the URL was built from (`/{Resource}/by-{parent}/{id}`).
    pub template: String,
    pub url: String,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The backend answered with this HTTP status.
    Status(u16),
    /// Network error, timeout, or unreadable response.
    Transport(String),
    /// Not sent: budget spent or run cancelled.
    Skipped(String),
}

impl AttemptOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Status(code) if *code >= 200 && *code < 300)
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Transport(reason) => write!(f, "transport: {reason}"),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_2xx_status_is_success() {
        assert!(AttemptOutcome::Status(204).is_success());
        assert!(!AttemptOutcome::Status(404).is_success());
        assert!(!AttemptOutcome::Transport("reset".into()).is_success());
        assert!(!AttemptOutcome::Skipped("deadline".into()).is_success());
    }

    #[test]
    fn serializes_tagged() {
        let attempt = EndpointAttempt {
            template: "/{Resource}".into(),
            url: "http://api/Evaluation".into(),
            outcome: AttemptOutcome::Status(500),
        };
        let json = serde_json::to_value(&attempt).unwrap();
        assert_eq!(json["outcome"]["type"], "status");
        assert_eq!(json["outcome"]["detail"], 500);
    }
}
