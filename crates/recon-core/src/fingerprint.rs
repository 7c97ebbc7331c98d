//! Attributes known about a record before its identifier is discovered.

use serde::{Deserialize, Serialize};

use crate::kind::ResourceKind;

/// What the submitting session knows about the record it just created.
///
/// Used only to score candidates; never mutated after construction. Build it
/// with [`ResourceFingerprint::new`] and the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFingerprint {
    pub kind: ResourceKind,
    pub parent_id: i64,
    pub author_id: Option<i64>,
    pub comments: Option<String>,
    pub role_label: Option<String>,
    pub category_label: Option<String>,
}

impl ResourceFingerprint {
    #[must_use]
    pub const fn new(kind: ResourceKind, parent_id: i64) -> Self {
        Self {
            kind,
            parent_id,
            author_id: None,
            comments: None,
            role_label: None,
            category_label: None,
        }
    }

    #[must_use]
    pub const fn with_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = non_blank(comments.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role_label = non_blank(role.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category_label = non_blank(category.into());
        self
    }

    /// Free-text fields that carry a value, paired with their field name.
    pub fn text_fields(&self) -> impl Iterator<Item = (TextField, &str)> {
        [
            (TextField::Comments, self.comments.as_deref()),
            (TextField::Role, self.role_label.as_deref()),
            (TextField::Category, self.category_label.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }

    #[must_use]
    pub fn has_text_fields(&self) -> bool {
        self.text_fields().next().is_some()
    }
}

/// Names the free-text attributes shared by fingerprints and candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Comments,
    Role,
    Category,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
