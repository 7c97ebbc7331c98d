//! Turns a mutation result into a [`ResolutionOutcome`].

use std::sync::Arc;

use recon_client::Backend;
use recon_core::{
    MutationResult, ResolutionOutcome, ResourceFingerprint, ResourceKind, RetryBudget,
};
use tokio_util::sync::CancellationToken;

use crate::artifact::{self, ArtifactListener, ArtifactTarget};
use crate::catalog::{DefaultCatalog, EndpointCatalog};
use crate::identifier;
use crate::normalize::{extract_identifier, identifier_from_location};
use crate::run::Run;
use crate::strategy::{Strategy, first_success};

/// What a caller hands over after a create or update call.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub mutation: &'a MutationResult,
    pub fingerprint: &'a ResourceFingerprint,
    /// Identifier the caller already sent, as in an update payload.
    pub sent_id: Option<i64>,
}

impl<'a> Submission<'a> {
    #[must_use]
    pub const fn new(mutation: &'a MutationResult, fingerprint: &'a ResourceFingerprint) -> Self {
        Self {
            mutation,
            fingerprint,
            sent_id: None,
        }
    }

    #[must_use]
    pub const fn with_sent_id(mut self, id: Option<i64>) -> Self {
        self.sent_id = id;
        self
    }
}

/// Where the new record's identifier can come from, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierSource {
    /// The identifier the caller sent with the mutation.
    Submitted,
    /// The mutation response body.
    DirectBody,
    /// The mutation response `Location` header.
    LocationHint,
    /// Listing endpoints matched against the fingerprint.
    Discovery,
}

const IDENTIFIER_SOURCES: [IdentifierSource; 4] = [
    IdentifierSource::Submitted,
    IdentifierSource::DirectBody,
    IdentifierSource::LocationHint,
    IdentifierSource::Discovery,
];

impl<'s> Strategy<Submission<'s>> for IdentifierSource {
    type Output = i64;

    fn name(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::DirectBody => "direct_body",
            Self::LocationHint => "location_hint",
            Self::Discovery => "discovery",
        }
    }

    fn needs_budget(&self) -> bool {
        matches!(self, Self::Discovery)
    }

    async fn attempt(&self, run: &mut Run<'_>, submission: &Submission<'s>) -> Option<i64> {
        let kind = submission.fingerprint.kind;
        match self {
            Self::Submitted => submission.sent_id,
            Self::DirectBody => extract_identifier(submission.mutation.raw_body(), kind),
            Self::LocationHint => submission
                .mutation
                .location_hint()
                .and_then(|hint| identifier_from_location(hint, kind)),
            Self::Discovery => identifier::resolve(run, submission.fingerprint).await,
        }
    }
}

/// Entry point of the resolution protocol.
///
/// Cheap to clone and safe to share: every call owns its own [`Run`], and
/// concurrent calls share only the backend, catalog, and listener.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn Backend>,
    catalog: Arc<dyn EndpointCatalog>,
    budget: RetryBudget,
    listener: Option<Arc<dyn ArtifactListener>>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            catalog: Arc::new(DefaultCatalog),
            budget: RetryBudget::default(),
            listener: None,
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn EndpointCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub const fn with_budget(mut self, budget: RetryBudget) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn ArtifactListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    #[must_use]
    pub const fn budget(&self) -> &RetryBudget {
        &self.budget
    }

    /// Resolve the identifier and artifact URL of the record `mutation`
    /// created or updated. Never fails; see [`ResolutionOutcome`].
    pub async fn orchestrate(
        &self,
        mutation: &MutationResult,
        fp: &ResourceFingerprint,
        token: Option<&str>,
    ) -> ResolutionOutcome {
        self.orchestrate_cancellable(mutation, fp, token, CancellationToken::new())
            .await
    }

    /// [`orchestrate`](Self::orchestrate), abandoned as soon as `cancel`
    /// fires. Whatever was found by then is returned.
    pub async fn orchestrate_cancellable(
        &self,
        mutation: &MutationResult,
        fp: &ResourceFingerprint,
        token: Option<&str>,
        cancel: CancellationToken,
    ) -> ResolutionOutcome {
        self.orchestrate_submission(Submission::new(mutation, fp), token, cancel)
            .await
    }

    /// Resolve a [`Submission`]. An identifier the caller already sent wins
    /// over anything the response or the listings say.
    pub async fn orchestrate_submission(
        &self,
        submission: Submission<'_>,
        token: Option<&str>,
        cancel: CancellationToken,
    ) -> ResolutionOutcome {
        let fp = submission.fingerprint;
        tracing::info!(kind = %fp.kind, parent_id = fp.parent_id, "resolve: run started");
        let mut run = self.start(token, cancel);

        let identifier = first_success(&IDENTIFIER_SOURCES, &mut run, &submission).await;
        let artifact_url = match identifier {
            Some(id) => self.resolve_artifact(&mut run, fp.kind, id).await,
            None => {
                tracing::warn!(kind = %fp.kind, parent_id = fp.parent_id, "resolve: identifier not found");
                None
            }
        };
        Self::finish(run, fp.kind, identifier, artifact_url)
    }

    /// Artifact tiers only, on a fresh budget. Offered to the user when a
    /// previous outcome [needs a manual retry](ResolutionOutcome::needs_manual_retry).
    pub async fn retry_artifact(
        &self,
        kind: ResourceKind,
        id: i64,
        token: Option<&str>,
        cancel: CancellationToken,
    ) -> ResolutionOutcome {
        tracing::info!(%kind, id, "resolve: artifact retry started");
        let mut run = self.start(token, cancel);
        let artifact_url = self.resolve_artifact(&mut run, kind, id).await;
        Self::finish(run, kind, Some(id), artifact_url)
    }

    fn start<'a>(&'a self, token: Option<&'a str>, cancel: CancellationToken) -> Run<'a> {
        Run::new(
            self.backend.as_ref(),
            self.catalog.as_ref(),
            token,
            self.budget,
            cancel,
        )
    }

    async fn resolve_artifact(&self, run: &mut Run<'_>, kind: ResourceKind, id: i64) -> Option<String> {
        artifact::resolve(run, ArtifactTarget { kind, id }, self.listener.as_deref()).await
    }

    fn finish(
        run: Run<'_>,
        kind: ResourceKind,
        identifier: Option<i64>,
        artifact_url: Option<String>,
    ) -> ResolutionOutcome {
        let attempts_made = run.finish();
        let exhausted = artifact_url.is_none();
        if exhausted {
            tracing::warn!(%kind, ?identifier, attempts_made, "resolve: budget exhausted without artifact");
        }
        ResolutionOutcome {
            identifier,
            artifact_url,
            attempts_made,
            exhausted,
        }
    }
}
