//! Resource kinds and their wire naming conventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A kind of backend record that can be created and later resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A multi-criterion evaluation of an experience.
    Evaluation,
    /// A submitted experience, filed under a reference category.
    Experience,
}

impl ResourceKind {
    /// Every supported kind.
    pub const ALL: [Self; 2] = [Self::Evaluation, Self::Experience];

    /// Resource path segment as the backend spells it (`/Evaluation/...`).
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Evaluation => "Evaluation",
            Self::Experience => "Experience",
        }
    }

    /// Path segment of the parent resource (`getByExperience`).
    #[must_use]
    pub const fn parent(self) -> &'static str {
        match self {
            Self::Evaluation => "Experience",
            Self::Experience => "Category",
        }
    }

    /// Specific identifier key (`evaluationId`).
    #[must_use]
    pub const fn id_key(self) -> &'static str {
        match self {
            Self::Evaluation => "evaluationId",
            Self::Experience => "experienceId",
        }
    }

    /// Key under which a record names its parent (`experienceId`).
    #[must_use]
    pub const fn parent_key(self) -> &'static str {
        match self {
            Self::Evaluation => "experienceId",
            Self::Experience => "categoryId",
        }
    }

    /// Plural collection key some listings wrap their records in.
    #[must_use]
    pub const fn plural_key(self) -> &'static str {
        match self {
            Self::Evaluation => "evaluations",
            Self::Experience => "experiences",
        }
    }

    /// Slug of the asynchronously rendered artifact (`generate-pdf`).
    #[must_use]
    pub const fn artifact(self) -> &'static str {
        match self {
            Self::Evaluation | Self::Experience => "pdf",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Evaluation => "evaluation",
            Self::Experience => "experience",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "evaluation" | "evaluations" => Ok(Self::Evaluation),
            "experience" | "experiences" => Ok(Self::Experience),
            other => Err(CoreError::UnknownKind(other.to_string())),
        }
    }
}
