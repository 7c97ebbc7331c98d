use serde::Serialize;

use recon_core::{ResolutionOutcome, ResolutionStatus, ResourceKind};

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;
use crate::output::output;

pub mod artifact;
pub mod resolve;
pub mod submit;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Submit(args) => submit::handle(&args, ctx, flags).await,
        Commands::Resolve(args) => resolve::handle(&args, ctx, flags).await,
        Commands::Artifact(args) => artifact::handle(&args, ctx, flags).await,
    }
}

/// What every command prints.
#[derive(Debug, Serialize)]
pub struct OutcomeReport {
    pub kind: ResourceKind,
    pub status: ResolutionStatus,
    pub identifier: Option<i64>,
    pub artifact_url: Option<String>,
    pub attempts_made: u32,
    pub exhausted: bool,
}

impl OutcomeReport {
    pub fn new(kind: ResourceKind, outcome: &ResolutionOutcome) -> Self {
        Self {
            kind,
            status: outcome.status(),
            identifier: outcome.identifier,
            artifact_url: outcome.artifact_url.clone(),
            attempts_made: outcome.attempts_made,
            exhausted: outcome.exhausted,
        }
    }
}

/// Print the outcome, plus the manual-retry advice on stderr when the run
/// gave up on the document.
pub fn report(kind: ResourceKind, outcome: &ResolutionOutcome, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&OutcomeReport::new(kind, outcome), flags.format)?;
    if let Some(message) = outcome.user_message()
        && !flags.quiet
    {
        eprintln!("{message}");
        if let Some(id) = outcome.identifier {
            eprintln!("  retry with: recon artifact --kind {kind} --id {id}");
        }
    }
    Ok(())
}
