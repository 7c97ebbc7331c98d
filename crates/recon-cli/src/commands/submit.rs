use std::path::Path;

use anyhow::Context;
use recon_client::{MutationMode, submit};
use recon_core::ResourceKind;
use recon_resolve::{Submission, extract_identifier, fingerprint_from_payload};
use serde_json::Value;

use crate::cli::{GlobalFlags, SubmitArgs};
use crate::commands::report;
use crate::context::{AppContext, cancel_on_ctrl_c};

/// Handle `recon submit`.
pub async fn handle(args: &SubmitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let payload = read_payload(&args.payload).await?;

    // A payload without a parent can never be resolved; reject it before writing.
    let fingerprint = fingerprint_from_payload(&payload, args.kind)?;
    let (mode, verb) = if args.update {
        (MutationMode::Update, "update")
    } else {
        (MutationMode::Create, "create")
    };
    let sent_id = sent_identifier(mode, &payload, args.kind);

    let mutation = submit(ctx.backend.as_ref(), args.kind, mode, payload, ctx.token())
        .await
        .with_context(|| format!("{} {verb} was rejected", args.kind))?;
    tracing::info!(kind = %args.kind, status = mutation.status_code(), "submit: mutation accepted");

    let submission = Submission::new(&mutation, &fingerprint).with_sent_id(sent_id);
    let outcome = ctx
        .orchestrator
        .orchestrate_submission(submission, ctx.token(), cancel_on_ctrl_c())
        .await;
    report(args.kind, &outcome, flags)
}

/// An update names the record it touches; a create cannot.
fn sent_identifier(mode: MutationMode, payload: &Value, kind: ResourceKind) -> Option<i64> {
    match mode {
        MutationMode::Update => extract_identifier(payload, kind),
        MutationMode::Create => None,
    }
}

async fn read_payload(path: &Path) -> anyhow::Result<Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read payload file {}", path.display()))?;
    let payload: Value = serde_json::from_str(&raw)
        .with_context(|| format!("payload file {} is not valid JSON", path.display()))?;
    anyhow::ensure!(
        payload.is_object(),
        "payload file {} must hold a JSON object",
        path.display()
    );
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use recon_client::MutationMode;
    use recon_core::ResourceKind;

    use super::{read_payload, sent_identifier};

    #[tokio::test]
    async fn reads_object_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"experienceId": 5, "comments": "Solid"}}"#).unwrap();

        let payload = read_payload(file.path()).await.unwrap();
        assert_eq!(payload, json!({"experienceId": 5, "comments": "Solid"}));
    }

    #[tokio::test]
    async fn rejects_non_object_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();

        let err = read_payload(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = read_payload(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }

    #[test]
    fn only_updates_carry_a_sent_identifier() {
        let payload = json!({"id": 12, "experienceId": 5, "experience": {"id": 5}});
        let kind = ResourceKind::Evaluation;
        assert_eq!(sent_identifier(MutationMode::Update, &payload, kind), Some(12));
        assert_eq!(sent_identifier(MutationMode::Create, &payload, kind), None);
        assert_eq!(
            sent_identifier(MutationMode::Update, &json!({"experienceId": 5}), kind),
            None
        );
    }
}
