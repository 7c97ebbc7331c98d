//! Outcome of a create/update call.

use serde::Serialize;
use serde_json::Value;

/// What the backend answered to a create or update request.
///
/// Immutable once received: the resolution protocol reads it, never edits it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationResult {
    raw_body: Value,
    location_hint: Option<String>,
    status_code: u16,
}

impl MutationResult {
    #[must_use]
    pub const fn new(raw_body: Value, location_hint: Option<String>, status_code: u16) -> Self {
        Self {
            raw_body,
            location_hint,
            status_code,
        }
    }

    /// Response body as received. `Value::Null` when the body was empty or
    /// not JSON.
    #[must_use]
    pub const fn raw_body(&self) -> &Value {
        &self.raw_body
    }

    /// Value of the `Location` header, if the backend sent one.
    #[must_use]
    pub fn location_hint(&self) -> Option<&str> {
        self.location_hint.as_deref()
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}
