//! Picks the record a session created out of a list of candidates.

use std::cmp::Ordering;

use recon_core::{CandidateRecord, ResourceFingerprint};

/// Policy for choosing between equally scored candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Newest `created_at` wins; records without a timestamp lose to records
    /// with one. Remaining ties go to the numerically largest id.
    ///
    /// The largest-id rule assumes the backend assigns increasing ids, which
    /// has not been confirmed for every deployment.
    #[default]
    PreferMostRecent,
}

impl TieBreak {
    /// `Greater` means `a` is preferred over `b`.
    #[must_use]
    pub fn compare(self, a: &CandidateRecord, b: &CandidateRecord) -> Ordering {
        match self {
            Self::PreferMostRecent => a
                .created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id)),
        }
    }
}

/// Select the candidate that best matches `fp`.
///
/// Parent equality is mandatory. A lone parent match is returned without
/// looking at any other field. Among several, a candidate naming a different
/// author is dropped; one whose listing leaves the author out is kept as
/// unknown and ranks below a confirmed author. Remaining candidates are scored
/// on the fingerprint text fields they contain.
#[must_use]
pub fn select(candidates: &[CandidateRecord], fp: &ResourceFingerprint) -> Option<CandidateRecord> {
    let same_parent: Vec<&CandidateRecord> = candidates
        .iter()
        .filter(|c| c.id.is_some() && c.parent_id == Some(fp.parent_id))
        .collect();

    match same_parent.as_slice() {
        [] => return None,
        [only] => return Some((*only).clone()),
        _ => {}
    }

    let tie_break = TieBreak::default();
    same_parent
        .into_iter()
        .filter_map(|c| author_rank(c, fp).map(|rank| ((rank, text_score(c, fp)), c)))
        .max_by(|(sa, a), (sb, b)| sa.cmp(sb).then_with(|| tie_break.compare(a, b)))
        .map(|(_, c)| c.clone())
}

/// Parent-only selection with the default tie-break.
#[must_use]
pub fn select_by_parent(candidates: &[CandidateRecord], parent_id: i64) -> Option<CandidateRecord> {
    let tie_break = TieBreak::default();
    candidates
        .iter()
        .filter(|c| c.id.is_some() && c.parent_id == Some(parent_id))
        .max_by(|a, b| tie_break.compare(a, b))
        .cloned()
}

/// `None` rules the candidate out; `Some(1)` is a confirmed author.
fn author_rank(candidate: &CandidateRecord, fp: &ResourceFingerprint) -> Option<u8> {
    match (fp.author_id, candidate.author_id) {
        (Some(wanted), Some(have)) if wanted != have => None,
        (Some(_), Some(_)) => Some(1),
        _ => Some(0),
    }
}

fn text_score(candidate: &CandidateRecord, fp: &ResourceFingerprint) -> usize {
    if !fp.has_text_fields() {
        return 0;
    }
    fp.text_fields()
        .filter(|(field, wanted)| {
            candidate
                .text(*field)
                .is_some_and(|have| have.to_lowercase().contains(&wanted.to_lowercase()))
        })
        .count()
}
