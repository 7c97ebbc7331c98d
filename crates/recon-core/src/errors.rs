//! Cross-cutting error types for recon.
//!
//! Transport errors live in `recon-client` and configuration errors in
//! `recon-config`. The resolution protocol itself never returns an error to
//! its caller; everything here is raised at the edges (argument parsing,
//! fingerprint construction).

use thiserror::Error;

/// Errors that can be raised by any recon crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A resource kind name did not match any known kind.
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    /// Data failed validation (missing parent id, malformed payload).
    #[error("Validation error: {0}")]
    Validation(String),
}
