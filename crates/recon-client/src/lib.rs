//! # recon-client
//!
//! HTTP boundary of recon.
//!
//! - [`Backend`]: the seam the resolution protocol talks through
//! - [`HttpBackend`]: reqwest implementation with bearer auth, per-request
//!   timeout, and two bases (absolute backend, locally routed)
//! - [`submit`]: create/update calls that produce a [`recon_core::MutationResult`]
//! - `testing::ScriptedBackend` (feature `testing`): in-memory backend for tests

mod backend;
mod error;
mod http;
mod mutation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::{ApiRequest, ApiResponse, Backend, BackendOptions, HttpBackend, Method, Route};
pub use error::ClientError;
pub use http::decode_body;
pub use mutation::{MutationMode, submit};
