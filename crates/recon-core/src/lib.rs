//! # recon-core
//!
//! Data model and error types shared by every recon crate.
//!
//! This crate provides:
//! - [`ResourceKind`] with the wire naming conventions of each resource
//! - The values that flow through one resolution run: [`MutationResult`],
//!   [`ResourceFingerprint`], [`CandidateRecord`], [`EndpointAttempt`]
//! - The terminal [`ResolutionOutcome`] handed back to callers
//! - [`RetryBudget`], the hard ceilings every run is bounded by
//! - Cross-cutting error types

pub mod attempt;
pub mod budget;
pub mod candidate;
pub mod errors;
pub mod fingerprint;
pub mod kind;
pub mod mutation;
pub mod outcome;

pub use attempt::{AttemptOutcome, EndpointAttempt};
pub use budget::RetryBudget;
pub use candidate::CandidateRecord;
pub use errors::CoreError;
pub use fingerprint::{ResourceFingerprint, TextField};
pub use kind::ResourceKind;
pub use mutation::MutationResult;
pub use outcome::{ResolutionOutcome, ResolutionStatus};
