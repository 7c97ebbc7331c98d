//! Canonical view of one record returned by any endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fingerprint::TextField;

/// A record as seen through the normalizer, regardless of the wire shape the
/// producing endpoint used. Discarded at the end of a resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateRecord {
    pub id: Option<i64>,
    pub parent_id: Option<i64>,
    pub author_id: Option<i64>,
    pub comments: Option<String>,
    pub role_label: Option<String>,
    pub category_label: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CandidateRecord {
    /// Value of the given free-text field, if the record carried one.
    #[must_use]
    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Comments => self.comments.as_deref(),
            TextField::Role => self.role_label.as_deref(),
            TextField::Category => self.category_label.as_deref(),
        }
    }

    /// True when no field at all could be extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
