//! Artifact resolver: gets the URL of the asynchronously rendered document
//! for a known record, then writes it back onto the record.

use recon_client::ApiRequest;
use recon_core::ResourceKind;
use serde_json::{Map, Value};

use crate::normalize::{URL_KEYS, canonical_key, extract_url, find_url, unwrap_record};
use crate::run::Run;
use crate::strategy::{Strategy, first_success};

/// Sub-objects of a record that hold its documents, in order of preference.
const DOCUMENT_KEYS: &[&str] = &["documents", "files", "attachments", "document", "file", "pdf"];

/// Receives the artifact URL once it is known and persisted.
///
/// Implementations must not block; they run inline at the end of the run.
pub trait ArtifactListener: Send + Sync {
    fn artifact_ready(&self, kind: ResourceKind, id: i64, url: &str);
}

impl<F> ArtifactListener for F
where
    F: Fn(ResourceKind, i64, &str) + Send + Sync,
{
    fn artifact_ready(&self, kind: ResourceKind, id: i64, url: &str) {
        self(kind, id, url);
    }
}

/// Record whose artifact is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub kind: ResourceKind,
    pub id: i64,
}

/// A URL plus the full record it was read from, when a tier had one.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundArtifact {
    pub url: String,
    pub record: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactTier {
    /// POST the generation endpoint on the absolute backend base.
    TriggerAbsolute,
    /// POST the generation endpoint through the local routing.
    TriggerLocal,
    /// GET each read-only discovery probe once.
    DiscoverySweep,
    /// GET the record detail every `poll_interval`, `poll_attempts` times.
    PollDetail,
}

const TIERS: [ArtifactTier; 4] = [
    ArtifactTier::TriggerAbsolute,
    ArtifactTier::TriggerLocal,
    ArtifactTier::DiscoverySweep,
    ArtifactTier::PollDetail,
];

/// Resolve the artifact URL of `target`.
///
/// On success the URL is persisted onto the record and `listener` is told
/// about it. Neither side effect can fail the resolution.
pub async fn resolve(
    run: &mut Run<'_>,
    target: ArtifactTarget,
    listener: Option<&dyn ArtifactListener>,
) -> Option<String> {
    let found = first_success(&TIERS, run, &target).await?;
    tracing::info!(kind = %target.kind, id = target.id, url = %found.url, "resolve: artifact available");

    persist(run, target, &found).await;
    if let Some(listener) = listener {
        listener.artifact_ready(target.kind, target.id, &found.url);
    }
    Some(found.url)
}

impl Strategy<ArtifactTarget> for ArtifactTier {
    type Output = FoundArtifact;

    fn name(&self) -> &'static str {
        match self {
            Self::TriggerAbsolute => "trigger_absolute",
            Self::TriggerLocal => "trigger_local",
            Self::DiscoverySweep => "discovery_sweep",
            Self::PollDetail => "poll_detail",
        }
    }

    async fn attempt(&self, run: &mut Run<'_>, target: &ArtifactTarget) -> Option<FoundArtifact> {
        match self {
            Self::TriggerAbsolute => trigger(run, *target, true).await,
            Self::TriggerLocal => trigger(run, *target, false).await,
            Self::DiscoverySweep => discover(run, *target).await,
            Self::PollDetail => poll(run, *target).await,
        }
    }
}

async fn trigger(run: &mut Run<'_>, target: ArtifactTarget, direct: bool) -> Option<FoundArtifact> {
    let endpoint = run.catalog().generation(target.kind, target.id);
    let mut request = ApiRequest::post(endpoint.path.as_str());
    if direct {
        request = request.direct();
    }
    let response = run.request(endpoint.pattern, &request).await?;
    let url = extract_url(&response.body)?;
    Some(FoundArtifact { url, record: None })
}

async fn discover(run: &mut Run<'_>, target: ArtifactTarget) -> Option<FoundArtifact> {
    for probe in run.catalog().artifact_probes(target.kind, target.id) {
        let Some(response) = run
            .request(probe.pattern, &ApiRequest::get(probe.path.as_str()))
            .await
        else {
            if run.is_spent() {
                return None;
            }
            continue;
        };
        if let Some(url) = extract_url(&response.body) {
            return Some(FoundArtifact { url, record: None });
        }
    }
    None
}

async fn poll(run: &mut Run<'_>, target: ArtifactTarget) -> Option<FoundArtifact> {
    let budget = *run.budget();
    let detail = run.catalog().detail(target.kind, target.id);

    for n in 1..=budget.poll_attempts {
        if n > 1 && !run.pause(budget.poll_interval).await {
            return None;
        }
        let Some(response) = run
            .request(detail.pattern, &ApiRequest::get(detail.path.as_str()))
            .await
        else {
            continue;
        };
        let Some(record) = unwrap_record(&response.body, target.kind).cloned() else {
            continue;
        };
        if let Some(url) = find_url(&record) {
            return Some(FoundArtifact {
                url,
                record: Some(record),
            });
        }
        tracing::debug!(kind = %target.kind, id = target.id, poll = n, "resolve: artifact not ready yet");
    }
    None
}

/// Write the URL back onto the record through the generic update endpoint.
async fn persist(run: &mut Run<'_>, target: ArtifactTarget, found: &FoundArtifact) {
    let record = match &found.record {
        Some(record) => Some(record.clone()),
        None => {
            let detail = run.catalog().detail(target.kind, target.id);
            run.request(detail.pattern, &ApiRequest::get(detail.path.as_str()))
                .await
                .and_then(|response| unwrap_record(&response.body, target.kind).cloned())
        }
    };
    let Some(mut record) = record else {
        tracing::warn!(kind = %target.kind, id = target.id, "resolve: artifact url not persisted, record unavailable");
        return;
    };

    embed_artifact_url(&mut record, &found.url);
    let update = run.catalog().update(target.kind);
    if run
        .request(update.pattern, &ApiRequest::patch(update.path.as_str(), record))
        .await
        .is_none()
    {
        tracing::warn!(kind = %target.kind, id = target.id, "resolve: artifact url not persisted, update rejected");
    }
}

/// Put `url` into the record's first document-like sub-object (the first
/// element when it is an array), else into a top-level `pdfUrl`.
pub fn embed_artifact_url(record: &mut Value, url: &str) {
    let Value::Object(obj) = record else {
        return;
    };

    let document_key = DOCUMENT_KEYS.iter().find_map(|wanted| {
        obj.keys()
            .find(|key| canonical_key(key) == *wanted)
            .cloned()
    });
    let document = match document_key {
        Some(key) => match obj.get_mut(&key) {
            Some(Value::Object(doc)) => Some(doc),
            Some(Value::Array(items)) => items.iter_mut().find_map(Value::as_object_mut),
            _ => None,
        },
        None => None,
    };

    match document {
        Some(doc) => set_url(doc, URL_KEYS, "url", url),
        None => set_url(obj, &["pdfurl"], "pdfUrl", url),
    }
}

fn set_url(obj: &mut Map<String, Value>, aliases: &[&str], default_key: &str, url: &str) {
    let key = obj
        .keys()
        .find(|key| aliases.contains(&canonical_key(key).as_str()))
        .cloned()
        .unwrap_or_else(|| default_key.to_string());
    obj.insert(key, Value::String(url.to_string()));
}
