use std::path::PathBuf;

use clap::{Args, Subcommand};
use recon_core::ResourceKind;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create or update a record, then resolve its identifier and document.
    Submit(SubmitArgs),
    /// Resolve a record from a previously received mutation response.
    Resolve(ResolveArgs),
    /// Retry document generation for a known record.
    Artifact(ArtifactArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SubmitArgs {
    /// Resource kind: evaluation, experience
    #[arg(short, long)]
    pub kind: ResourceKind,

    /// JSON file with the record payload
    #[arg(long)]
    pub payload: PathBuf,

    /// Update an existing record instead of creating one
    #[arg(long)]
    pub update: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ResolveArgs {
    /// Resource kind: evaluation, experience
    #[arg(short, long)]
    pub kind: ResourceKind,

    /// Parent record id (experience for evaluations, category for experiences)
    #[arg(long)]
    pub parent: i64,

    /// Author id of the record
    #[arg(long)]
    pub author: Option<i64>,

    /// Free-text comments the record was submitted with
    #[arg(long)]
    pub comments: Option<String>,

    /// Role label of the author
    #[arg(long)]
    pub role: Option<String>,

    /// Category label of the record
    #[arg(long)]
    pub category: Option<String>,

    /// File holding the mutation response body
    #[arg(long)]
    pub body: Option<PathBuf>,

    /// `Location` header of the mutation response
    #[arg(long)]
    pub location: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ArtifactArgs {
    /// Resource kind: evaluation, experience
    #[arg(short, long)]
    pub kind: ResourceKind,

    /// Record id
    #[arg(long)]
    pub id: i64,
}
