//! # recon-resolve
//!
//! Recovers the identifier and the generated artifact URL of a record the
//! backend created or updated without reporting them reliably.
//!
//! A resolution run goes through, in order:
//! 1. the mutation response body, then its `Location` header
//! 2. a bounded sweep of candidate listing endpoints, matching records
//!    against a [`ResourceFingerprint`](recon_core::ResourceFingerprint)
//! 3. once an identifier is known, the artifact tiers: trigger generation,
//!    probe discovery endpoints, poll the record detail
//!
//! Every run is bounded by a [`RetryBudget`](recon_core::RetryBudget) and
//! ends with a [`ResolutionOutcome`](recon_core::ResolutionOutcome); it never
//! returns an error.

pub mod artifact;
pub mod catalog;
pub mod identifier;
pub mod matcher;
pub mod normalize;
pub mod orchestrator;
pub mod run;
pub mod strategy;

pub use artifact::{ArtifactListener, ArtifactTarget, embed_artifact_url};
pub use catalog::{DefaultCatalog, EndpointCatalog, EndpointTemplate, Scope};
pub use matcher::{TieBreak, select, select_by_parent};
pub use normalize::{
    WireShape, extract_identifier, extract_url, fingerprint_from_payload, find_url,
    identifier_from_location, normalize, unwrap_record,
};
pub use orchestrator::{IdentifierSource, Orchestrator, Submission};
pub use run::Run;
pub use strategy::{Strategy, first_success};
