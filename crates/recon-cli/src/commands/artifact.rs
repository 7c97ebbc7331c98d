use crate::cli::{ArtifactArgs, GlobalFlags};
use crate::commands::report;
use crate::context::{AppContext, cancel_on_ctrl_c};

/// Handle `recon artifact`.
pub async fn handle(args: &ArtifactArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let outcome = ctx
        .orchestrator
        .retry_artifact(args.kind, args.id, ctx.token(), cancel_on_ctrl_c())
        .await;
    report(args.kind, &outcome, flags)
}
