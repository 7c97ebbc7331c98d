//! Terminal result of a resolution run.

use serde::Serialize;

/// The only value a resolution run hands back. All intermediate state is
/// dropped when the run ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionOutcome {
    pub identifier: Option<i64>,
    pub artifact_url: Option<String>,
    pub attempts_made: u32,
    /// True when the bounded budget was spent without finding everything.
    pub exhausted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Identifier and artifact URL are both known.
    Resolved,
    /// Identifier known, artifact still missing.
    PartiallyResolved,
    Unresolved,
}

impl ResolutionOutcome {
    #[must_use]
    pub const fn status(&self) -> ResolutionStatus {
        match (self.identifier, &self.artifact_url) {
            (Some(_), Some(_)) => ResolutionStatus::Resolved,
            (Some(_), None) => ResolutionStatus::PartiallyResolved,
            (None, _) => ResolutionStatus::Unresolved,
        }
    }

    /// The budget ran out and no artifact was found. Callers surface this to
    /// the user instead of reporting success.
    #[must_use]
    pub const fn needs_manual_retry(&self) -> bool {
        self.exhausted && self.artifact_url.is_none()
    }

    /// User-facing advice when [`needs_manual_retry`](Self::needs_manual_retry)
    /// holds.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        if !self.needs_manual_retry() {
            return None;
        }
        Some(match self.identifier {
            Some(id) => format!(
                "The record was saved (id {id}) but its document is not available yet. \
                 Retry the document generation manually in a moment."
            ),
            None => "The record was saved but could not be located, so its document \
                     was not generated. Retry the document generation manually."
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_follows_found_values() {
        let mut outcome = ResolutionOutcome::default();
        assert_eq!(outcome.status(), ResolutionStatus::Unresolved);
        outcome.identifier = Some(4);
        assert_eq!(outcome.status(), ResolutionStatus::PartiallyResolved);
        outcome.artifact_url = Some("https://cdn/x.pdf".into());
        assert_eq!(outcome.status(), ResolutionStatus::Resolved);
    }

    #[test]
    fn exhausted_without_artifact_needs_manual_retry() {
        let outcome = ResolutionOutcome {
            identifier: Some(12),
            artifact_url: None,
            attempts_made: 40,
            exhausted: true,
        };
        assert!(outcome.needs_manual_retry());
        assert!(outcome.user_message().unwrap().contains("id 12"));
    }

    #[test]
    fn resolved_outcome_has_no_message() {
        let outcome = ResolutionOutcome {
            identifier: Some(12),
            artifact_url: Some("https://cdn/x.pdf".into()),
            attempts_made: 3,
            exhausted: false,
        };
        assert!(!outcome.needs_manual_retry());
        assert!(outcome.user_message().is_none());
    }
}
