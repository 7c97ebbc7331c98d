//! Create/update calls whose answers feed the resolution protocol.

use recon_core::{MutationResult, ResourceKind};
use serde_json::Value;

use crate::backend::{ApiRequest, Backend};
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationMode {
    /// `POST /{Resource}`
    Create,
    /// `PUT /{Resource}/update`
    Update,
}

impl MutationMode {
    #[must_use]
    pub fn request(self, kind: ResourceKind, payload: Value) -> ApiRequest {
        match self {
            Self::Create => ApiRequest::post(format!("/{}", kind.resource())).with_body(payload),
            Self::Update => ApiRequest::put(format!("/{}/update", kind.resource()), payload),
        }
    }
}

/// Send a create or update and capture what the backend answered.
///
/// # Errors
///
/// Returns [`ClientError`] if the request fails or the backend rejects the
/// mutation. A successful mutation that returns no usable body is not an
/// error; it is what the resolution protocol exists for.
pub async fn submit<B: Backend + ?Sized>(
    backend: &B,
    kind: ResourceKind,
    mode: MutationMode,
    payload: Value,
    token: Option<&str>,
) -> Result<MutationResult, ClientError> {
    let request = mode.request(kind, payload);
    let response = backend.send(&request, token).await?;
    tracing::info!(
        %kind,
        status = response.status,
        has_location = response.location.is_some(),
        "mutation accepted"
    );
    Ok(MutationResult::new(
        response.body,
        response.location,
        response.status,
    ))
}
