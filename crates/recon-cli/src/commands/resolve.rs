use anyhow::Context;
use recon_client::decode_body;
use recon_core::{MutationResult, ResourceFingerprint};
use serde_json::Value;

use crate::cli::{GlobalFlags, ResolveArgs};
use crate::commands::report;
use crate::context::{AppContext, cancel_on_ctrl_c};

/// Handle `recon resolve`.
pub async fn handle(args: &ResolveArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let body = match &args.body {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read response body {}", path.display()))?;
            decode_body(&raw)
        }
        None => Value::Null,
    };
    let mutation = MutationResult::new(body, args.location.clone(), 200);

    let outcome = ctx
        .orchestrator
        .orchestrate_cancellable(&mutation, &fingerprint(args), ctx.token(), cancel_on_ctrl_c())
        .await;
    report(args.kind, &outcome, flags)
}

fn fingerprint(args: &ResolveArgs) -> ResourceFingerprint {
    let mut fp = ResourceFingerprint::new(args.kind, args.parent);
    if let Some(author) = args.author {
        fp = fp.with_author(author);
    }
    if let Some(comments) = &args.comments {
        fp = fp.with_comments(comments.as_str());
    }
    if let Some(role) = &args.role {
        fp = fp.with_role(role.as_str());
    }
    if let Some(category) = &args.category {
        fp = fp.with_category(category.as_str());
    }
    fp
}
