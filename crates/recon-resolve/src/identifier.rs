//! Identifier resolver: finds a freshly created record by listing its
//! siblings and matching them against the fingerprint.

use recon_client::ApiRequest;
use recon_core::ResourceFingerprint;

use crate::matcher::{select, select_by_parent};
use crate::normalize::normalize;
use crate::run::Run;
use crate::strategy::{Strategy, first_success};

/// Discovery steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStep {
    /// `rounds` sequential sweeps of the catalog's listing endpoints, with a
    /// fixed delay between rounds. Non-2xx and transport failures are
    /// recorded and skipped.
    EndpointSweep,
    /// One GET of the generic listing, matched on parent only.
    LastResortListing,
}

const STEPS: [DiscoveryStep; 2] = [DiscoveryStep::EndpointSweep, DiscoveryStep::LastResortListing];

/// Discover the identifier of the record described by `fp`.
pub async fn resolve(run: &mut Run<'_>, fp: &ResourceFingerprint) -> Option<i64> {
    first_success(&STEPS, run, fp).await
}

impl Strategy<ResourceFingerprint> for DiscoveryStep {
    type Output = i64;

    fn name(&self) -> &'static str {
        match self {
            Self::EndpointSweep => "endpoint_sweep",
            Self::LastResortListing => "last_resort_listing",
        }
    }

    async fn attempt(&self, run: &mut Run<'_>, fp: &ResourceFingerprint) -> Option<i64> {
        match self {
            Self::EndpointSweep => sweep(run, fp).await,
            Self::LastResortListing => last_resort(run, fp).await,
        }
    }
}

async fn sweep(run: &mut Run<'_>, fp: &ResourceFingerprint) -> Option<i64> {
    let templates = run.catalog().templates(fp.kind, fp.parent_id);
    let budget = *run.budget();

    for round in 1..=budget.rounds {
        if round > 1 && !run.pause(budget.round_delay).await {
            return None;
        }
        for template in &templates {
            let request = ApiRequest::get(template.path.as_str());
            let Some(response) = run.request(template.pattern, &request).await else {
                if run.is_spent() {
                    return None;
                }
                continue;
            };
            let candidates = normalize(&response.body, fp.kind);
            if let Some(id) = select(&candidates, fp).and_then(|c| c.id) {
                tracing::debug!(
                    kind = %fp.kind,
                    id,
                    round,
                    template = template.pattern,
                    "resolve: identifier matched"
                );
                return Some(id);
            }
        }
        tracing::debug!(kind = %fp.kind, round, "resolve: sweep round found no match");
    }
    None
}

async fn last_resort(run: &mut Run<'_>, fp: &ResourceFingerprint) -> Option<i64> {
    let listing = run.catalog().listing(fp.kind);
    let response = run
        .request(listing.pattern, &ApiRequest::get(listing.path.as_str()))
        .await?;
    let id = select_by_parent(&normalize(&response.body, fp.kind), fp.parent_id)?.id;
    if let Some(id) = id {
        tracing::debug!(kind = %fp.kind, id, "resolve: identifier taken from last-resort listing");
    }
    id
}
