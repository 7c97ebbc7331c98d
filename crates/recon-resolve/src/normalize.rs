//! Response shape normalizer.
//!
//! The backend answers with several wire shapes for the same resource:
//! bare arrays, envelopes (`{"data": [...]}`, `{"result": {"items": [...]}}`),
//! single objects, and keys spelled in any casing (`id`, `Id`, `ID`,
//! `experienceId`, `experience_id`). This module turns any of them into the
//! canonical [`CandidateRecord`] in two explicit steps:
//!
//! 1. [`WireShape::classify`] decides which records a value carries.
//! 2. [`map_record`] maps one wire object onto the canonical record using the
//!    kind's [`WireAliases`] table.
//!
//! Nothing here fails: input that cannot be read yields no records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use recon_core::{CandidateRecord, CoreError, ResourceFingerprint, ResourceKind};
use serde_json::{Map, Value};
use url::Url;

/// Maximum object nesting searched for an embedded collection.
const MAX_ENVELOPE_DEPTH: usize = 3;

/// Keys that conventionally hold a list of records.
const COLLECTION_KEYS: &[&str] = &[
    "data", "items", "results", "records", "value", "$values", "list", "rows",
];

/// Keys that conventionally wrap a single payload.
const ENVELOPE_KEYS: &[&str] = &[
    "data", "result", "value", "item", "record", "payload", "entity",
];

pub(crate) const URL_KEYS: &[&str] = &[
    "url",
    "pdfurl",
    "resulturl",
    "documenturl",
    "fileurl",
    "downloadurl",
    "link",
];

/// Key fragments that mark a field as document-related when hunting for any
/// URL inside a record.
const DOCUMENT_HINTS: &[&str] = &["pdf", "url", "document", "file", "link"];

const PLACEHOLDER_BASE: &str = "http://placeholder.invalid/";

/// Canonical field aliases for one resource kind. All entries are already in
/// canonical form (see [`canonical_key`]).
#[derive(Debug, Clone, Copy)]
pub struct WireAliases {
    pub id: &'static [&'static str],
    pub parent: &'static [&'static str],
    /// Key of an embedded parent object (`"experience": {"id": 5}`).
    pub parent_object: &'static str,
    pub author: &'static [&'static str],
    pub comments: &'static [&'static str],
    pub role: &'static [&'static str],
    pub category: &'static [&'static str],
    pub created_at: &'static [&'static str],
}

const AUTHOR_KEYS: &[&str] = &[
    "authorid",
    "evaluatorid",
    "userid",
    "createdby",
    "createdbyid",
    "ownerid",
];
const COMMENT_KEYS: &[&str] = &["comments", "comment", "observations", "notes", "feedback"];
const ROLE_KEYS: &[&str] = &["role", "rolename", "rolelabel", "evaluatorrole"];
const CATEGORY_KEYS: &[&str] = &[
    "category",
    "categoryname",
    "categorylabel",
    "criterion",
    "criterionname",
];
const CREATED_KEYS: &[&str] = &[
    "createdat",
    "creationdate",
    "createdon",
    "datecreated",
    "created",
    "timestamp",
];

#[must_use]
pub const fn aliases(kind: ResourceKind) -> WireAliases {
    match kind {
        ResourceKind::Evaluation => WireAliases {
            id: &["evaluationid", "id"],
            parent: &["experienceid", "parentid"],
            parent_object: "experience",
            author: AUTHOR_KEYS,
            comments: COMMENT_KEYS,
            role: ROLE_KEYS,
            category: CATEGORY_KEYS,
            created_at: CREATED_KEYS,
        },
        ResourceKind::Experience => WireAliases {
            id: &["experienceid", "id"],
            parent: &["categoryid", "parentid"],
            parent_object: "category",
            author: AUTHOR_KEYS,
            comments: COMMENT_KEYS,
            role: ROLE_KEYS,
            category: CATEGORY_KEYS,
            created_at: CREATED_KEYS,
        },
    }
}

/// Which records a response value carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WireShape<'a> {
    /// A bare array of records.
    Collection(&'a [Value]),
    /// An object wrapping an array of records somewhere below it.
    Envelope(&'a [Value]),
    /// An object that is itself the record.
    Single(&'a Map<String, Value>),
    Unusable,
}

impl<'a> WireShape<'a> {
    /// Classify a value.
    ///
    /// Objects are searched (depth ≤ 3) for an array under a collection-like
    /// key first. An object that carries its own identity fields is a single
    /// record even if it holds other arrays (criteria, documents). Failing
    /// both, the first array of objects found is used.
    #[must_use]
    pub fn classify(value: &'a Value, kind: ResourceKind) -> Self {
        match value {
            Value::Array(items) => Self::Collection(items),
            Value::Object(map) => {
                if let Some(items) = find_collection(map, kind, true) {
                    return Self::Envelope(items);
                }
                if has_identity(map, kind) {
                    return Self::Single(map);
                }
                find_collection(map, kind, false).map_or(Self::Single(map), Self::Envelope)
            }
            _ => Self::Unusable,
        }
    }
}

/// Normalize any backend answer into candidate records.
#[must_use]
pub fn normalize(raw: &Value, kind: ResourceKind) -> Vec<CandidateRecord> {
    let items: &[Value] = match WireShape::classify(raw, kind) {
        WireShape::Collection(items) | WireShape::Envelope(items) => items,
        WireShape::Single(map) => {
            let record = map_record(map, kind);
            return if record.is_empty() {
                Vec::new()
            } else {
                vec![record]
            };
        }
        WireShape::Unusable => return Vec::new(),
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| map_record(obj, kind))
        .filter(|record| !record.is_empty())
        .collect()
}

/// The one record a detail response carries, looking through envelopes
/// (`{"data": {...}}`) and taking the first object of a collection.
#[must_use]
pub fn unwrap_record(body: &Value, kind: ResourceKind) -> Option<&Value> {
    match WireShape::classify(body, kind) {
        WireShape::Collection(items) | WireShape::Envelope(items) => {
            items.iter().find(|item| item.is_object())
        }
        WireShape::Single(map) if !has_identity(map, kind) => ENVELOPE_KEYS
            .iter()
            .filter_map(|key| field(map, &[*key]))
            .find(|inner| inner.is_object())
            .and_then(|inner| unwrap_record(inner, kind))
            .or(Some(body)),
        WireShape::Single(_) => Some(body),
        WireShape::Unusable => None,
    }
}

/// Map one wire object onto the canonical record.
#[must_use]
pub fn map_record(obj: &Map<String, Value>, kind: ResourceKind) -> CandidateRecord {
    let a = aliases(kind);
    let parent_id = field(obj, a.parent).and_then(as_id).or_else(|| {
        field(obj, &[a.parent_object])
            .and_then(Value::as_object)
            .and_then(|parent| field(parent, &["id"]))
            .and_then(as_id)
    });

    CandidateRecord {
        id: field(obj, a.id).and_then(as_id),
        parent_id,
        author_id: field(obj, a.author).and_then(as_id),
        comments: field(obj, a.comments).and_then(as_text),
        role_label: field(obj, a.role).and_then(as_text),
        category_label: field(obj, a.category).and_then(as_text),
        created_at: field(obj, a.created_at).and_then(as_timestamp),
    }
}

/// Build a fingerprint from the payload that was submitted.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] when the payload names no parent.
pub fn fingerprint_from_payload(
    payload: &Value,
    kind: ResourceKind,
) -> Result<ResourceFingerprint, CoreError> {
    let Some(obj) = payload.as_object() else {
        return Err(CoreError::Validation("payload must be a JSON object".into()));
    };
    let record = map_record(obj, kind);
    let parent_id = record.parent_id.ok_or_else(|| {
        CoreError::Validation(format!("payload has no `{}`", kind.parent_key()))
    })?;

    let mut fp = ResourceFingerprint::new(kind, parent_id);
    if let Some(author) = record.author_id {
        fp = fp.with_author(author);
    }
    if let Some(comments) = record.comments {
        fp = fp.with_comments(comments);
    }
    if let Some(role) = record.role_label {
        fp = fp.with_role(role);
    }
    if let Some(category) = record.category_label {
        fp = fp.with_category(category);
    }
    Ok(fp)
}

// ── Identifiers ────────────────────────────────────────────────────

/// Deep search of a mutation body for the identifier of the created record.
///
/// The kind's specific key (`evaluationId`) is accepted at any depth; a
/// generic `id` only at the top level or inside envelope keys, so an
/// embedded parent object (`"experience": {"id": 5}`) is never mistaken for
/// the new record. Specific beats generic, shallower beats deeper. A bare
/// number or numeric string is itself the identifier.
#[must_use]
pub fn extract_identifier(body: &Value, kind: ResourceKind) -> Option<i64> {
    if let Some(id) = as_id(body) {
        return Some(id);
    }
    let specific = canonical_key(kind.id_key());
    let mut best: Option<(u8, usize, i64)> = None;
    let mut frontier: Vec<(&Value, bool)> = vec![(body, true)];

    for depth in 0..=MAX_ENVELOPE_DEPTH {
        let mut next = Vec::new();
        for (value, enveloped) in frontier {
            let obj = match value {
                Value::Object(obj) => obj,
                Value::Array(items) if items.len() == 1 => {
                    next.push((&items[0], enveloped));
                    continue;
                }
                _ => continue,
            };
            for (key, child) in obj {
                let canon = canonical_key(key);
                let rank = if canon == specific {
                    Some(0)
                } else if enveloped && canon == "id" {
                    Some(1)
                } else {
                    None
                };
                if let (Some(rank), Some(id)) = (rank, as_id(child)) {
                    if best.is_none_or(|(r, d, _)| (rank, depth) < (r, d)) {
                        best = Some((rank, depth, id));
                    }
                }
                if child.is_object() || child.is_array() {
                    let child_enveloped = enveloped
                        && (ENVELOPE_KEYS.contains(&canon.as_str()) || canon == kind.as_str());
                    next.push((child, child_enveloped));
                }
            }
        }
        frontier = next;
    }
    best.map(|(_, _, id)| id)
}

/// Identifier carried by a `Location` header: an `id` / `<resource>Id` query
/// parameter, else a trailing numeric path segment.
#[must_use]
pub fn identifier_from_location(hint: &str, kind: ResourceKind) -> Option<i64> {
    let hint = hint.trim();
    if hint.is_empty() {
        return None;
    }
    let url = Url::parse(hint)
        .or_else(|_| Url::parse(PLACEHOLDER_BASE).and_then(|base| base.join(hint)))
        .ok()?;

    let specific = canonical_key(kind.id_key());
    let from_query = url.query_pairs().find_map(|(key, value)| {
        let canon = canonical_key(&key);
        (canon == "id" || canon == specific)
            .then(|| parse_id(&value))
            .flatten()
    });
    from_query.or_else(|| {
        url.path_segments()?
            .rev()
            .find(|segment| !segment.is_empty())
            .and_then(parse_id)
    })
}

// ── URLs ───────────────────────────────────────────────────────────

/// Alias-aware URL lookup in a generation/discovery response: a bare
/// URL-shaped string, a URL under `url`/`pdfUrl`/`resultUrl`/..., or the
/// same one envelope level down (`data.url`).
#[must_use]
pub fn extract_url(value: &Value) -> Option<String> {
    extract_url_at(value, 0)
}

fn extract_url_at(value: &Value, depth: usize) -> Option<String> {
    match value {
        Value::String(s) => looks_like_url(s).then(|| s.trim().to_string()),
        Value::Object(obj) if depth <= 2 => {
            if let Some(url) = field(obj, URL_KEYS)
                .and_then(Value::as_str)
                .filter(|s| looks_like_url(s))
            {
                return Some(url.trim().to_string());
            }
            ENVELOPE_KEYS
                .iter()
                .filter_map(|key| field(obj, &[key]))
                .find_map(|inner| extract_url_at(inner, depth + 1))
        }
        _ => None,
    }
}

/// Any URL-shaped field anywhere in a record, preferring the aliases
/// [`extract_url`] knows, then any field whose key hints at a document.
#[must_use]
pub fn find_url(record: &Value) -> Option<String> {
    extract_url(record).or_else(|| find_hinted_url(record, 0))
}

fn find_hinted_url(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_ENVELOPE_DEPTH + 1 {
        return None;
    }
    match value {
        Value::Object(obj) => {
            for (key, child) in obj {
                let canon = canonical_key(key);
                let hinted = DOCUMENT_HINTS.iter().any(|hint| canon.contains(hint));
                match child {
                    Value::String(s) if hinted && looks_like_url(s) => {
                        return Some(s.trim().to_string());
                    }
                    _ => {}
                }
            }
            obj.values().find_map(|child| find_hinted_url(child, depth + 1))
        }
        Value::Array(items) => items.iter().find_map(|item| find_hinted_url(item, depth + 1)),
        _ => None,
    }
}

/// An absolute http(s) URL with a host, or a root-relative path to a file.
#[must_use]
pub fn looks_like_url(s: &str) -> bool {
    let s = s.trim();
    if s.starts_with('/') && !s.starts_with("//") {
        return s
            .rsplit('/')
            .next()
            .is_some_and(|name| name.contains('.') && !name.ends_with('.'));
    }
    Url::parse(s).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

// ── Field access ───────────────────────────────────────────────────

/// Lowercase with `_`, `-`, and spaces removed: `Experience_Id` → `experienceid`.
#[must_use]
pub fn canonical_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// First present, non-null value among `aliases` (canonical form), in alias
/// order.
fn field<'a>(obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| {
        obj.iter()
            .find(|(key, value)| !value.is_null() && canonical_key(key) == *alias)
            .map(|(_, value)| value)
    })
}

fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().filter(|id| *id > 0),
        Value::String(s) => parse_id(s),
        _ => None,
    }
}

fn parse_id(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => field(obj, &["name", "label", "title", "description"])?.as_str()?,
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s.trim()),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            // Millisecond epochs are already past 10^11 for any date after 1973.
            if raw.unsigned_abs() >= 100_000_000_000 {
                Utc.timestamp_millis_opt(raw).single()
            } else {
                Utc.timestamp_opt(raw, 0).single()
            }
        }
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn has_identity(obj: &Map<String, Value>, kind: ResourceKind) -> bool {
    let a = aliases(kind);
    field(obj, a.id).is_some() || field(obj, a.parent).is_some()
}

/// Breadth-first search (depth ≤ 3) for an array field. With
/// `preferred_only`, only collection-like keys qualify; otherwise any array
/// whose first element is an object does.
fn find_collection<'a>(
    root: &'a Map<String, Value>,
    kind: ResourceKind,
    preferred_only: bool,
) -> Option<&'a [Value]> {
    let plural = kind.plural_key();
    let is_preferred = |canon: &str| COLLECTION_KEYS.contains(&canon) || canon == plural;
    let mut frontier = vec![root];

    for _ in 0..MAX_ENVELOPE_DEPTH {
        let mut next = Vec::new();
        for obj in frontier {
            for (key, value) in obj {
                let canon = canonical_key(key);
                match value {
                    Value::Array(items) if preferred_only && is_preferred(&canon) => {
                        return Some(items);
                    }
                    Value::Array(items)
                        if !preferred_only && items.first().is_some_and(Value::is_object) =>
                    {
                        return Some(items);
                    }
                    Value::Object(inner) => next.push(inner),
                    _ => {}
                }
            }
        }
        frontier = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    const EVAL: ResourceKind = ResourceKind::Evaluation;

    #[test]
    fn bare_array_is_a_collection() {
        let raw = json!([
            {"id": 1, "experienceId": 5},
            {"Id": "2", "ExperienceId": "5"},
            "not a record",
        ]);
        let records = normalize(&raw, EVAL);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, Some(2));
        assert_eq!(records[1].parent_id, Some(5));
    }

    #[rstest]
    #[case(json!({"data": [{"id": 7, "experienceId": 1}]}))]
    #[case(json!({"result": {"items": [{"ID": 7, "experience_id": 1}]}}))]
    #[case(json!({"evaluations": [{"evaluationId": 7, "experienceId": 1}], "total": 1}))]
    #[case(json!({"$id": "1", "$values": [{"id": 7, "ExperienceID": 1}]}))]
    fn envelopes_are_unwrapped(#[case] raw: Value) {
        let records = normalize(&raw, EVAL);
        assert_eq!(records.len(), 1, "{raw}");
        assert_eq!(records[0].id, Some(7));
        assert_eq!(records[0].parent_id, Some(1));
    }

    #[test]
    fn single_record_with_nested_arrays_stays_single() {
        let raw = json!({
            "id": 12,
            "experienceId": 3,
            "criteria": [{"id": 1, "score": 4}, {"id": 2, "score": 5}],
        });
        let records = normalize(&raw, EVAL);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(12));
    }

    #[test]
    fn envelope_without_preferred_key_uses_first_object_array() {
        let raw = json!({"page": 1, "evaluationList": [{"id": 4, "experienceId": 9}]});
        let records = normalize(&raw, EVAL);
        assert_eq!(records[0].id, Some(4));
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!("oops"))]
    #[case(json!(42))]
    #[case(json!({}))]
    #[case(json!([]))]
    fn malformed_input_yields_nothing(#[case] raw: Value) {
        assert!(normalize(&raw, EVAL).is_empty());
    }

    #[rstest]
    #[case(json!(i64::MIN))]
    #[case(json!(i64::MAX))]
    #[case(json!(u64::MAX))]
    #[case(json!(-1e300))]
    fn out_of_range_timestamps_are_dropped(#[case] created_at: Value) {
        let raw = json!([{"id": 1, "experienceId": 5, "createdAt": created_at}]);
        let records = normalize(&raw, EVAL);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(1));
        assert_eq!(records[0].created_at, None);
    }

    #[test]
    fn url_fields_stay_out_of_candidates() {
        let raw = json!([{"id": 2, "experienceId": 5, "pdfUrl": "https://cdn.example.org/2.pdf"}]);
        let expected = CandidateRecord {
            id: Some(2),
            parent_id: Some(5),
            ..Default::default()
        };
        assert_eq!(normalize(&raw, EVAL), vec![expected]);
    }

    #[test]
    fn maps_text_author_and_timestamp_aliases() {
        let raw = json!({
            "evaluationId": 30,
            "experience": {"id": 8, "title": "Garden"},
            "EvaluatorId": 4,
            "Observations": "  Great work ",
            "role": {"id": 2, "name": "Jury"},
            "criterionName": "Impact",
            "created_at": "2024-03-01 10:15:00",
        });
        let records = normalize(&raw, EVAL);
        let r = &records[0];
        assert_eq!(r.id, Some(30));
        assert_eq!(r.parent_id, Some(8));
        assert_eq!(r.author_id, Some(4));
        assert_eq!(r.comments.as_deref(), Some("Great work"));
        assert_eq!(r.role_label.as_deref(), Some("Jury"));
        assert_eq!(r.category_label.as_deref(), Some("Impact"));
        assert_eq!(
            r.created_at.unwrap().to_rfc3339(),
            "2024-03-01T10:15:00+00:00"
        );
    }

    #[test]
    fn experience_kind_uses_its_own_aliases() {
        let raw = json!([{"experienceId": 3, "categoryId": 2}]);
        let records = normalize(&raw, ResourceKind::Experience);
        assert_eq!(records[0].id, Some(3));
        assert_eq!(records[0].parent_id, Some(2));
    }

    #[rstest]
    #[case(json!(41), Some(41))]
    #[case(json!("41"), Some(41))]
    #[case(json!({"id": 41}), Some(41))]
    #[case(json!({"data": {"Id": 41}}), Some(41))]
    #[case(json!({"message": "ok", "result": [{"evaluationId": 41}]}), Some(41))]
    #[case(json!({"id": 1, "meta": {"evaluationId": 41}}), Some(41))]
    #[case(json!({"experience": {"id": 5}}), None)]
    #[case(json!({"id": 0}), None)]
    #[case(json!({"message": "created"}), None)]
    #[case(json!(null), None)]
    fn identifier_extraction(#[case] body: Value, #[case] expected: Option<i64>) {
        assert_eq!(extract_identifier(&body, EVAL), expected, "{body}");
    }

    #[rstest]
    #[case("https://api.example.org/api/Evaluation/77", Some(77))]
    #[case("/api/Evaluation/77/", Some(77))]
    #[case("/api/Evaluation?evaluationId=78", Some(78))]
    #[case("Evaluation/details?id=79&x=1", Some(79))]
    #[case("/api/Evaluation/latest", None)]
    #[case("", None)]
    fn location_hint_parsing(#[case] hint: &str, #[case] expected: Option<i64>) {
        assert_eq!(identifier_from_location(hint, EVAL), expected);
    }

    #[rstest]
    #[case(json!("https://cdn.example.org/e/1.pdf"), Some("https://cdn.example.org/e/1.pdf"))]
    #[case(json!({"pdfUrl": "https://cdn.example.org/e/1.pdf"}), Some("https://cdn.example.org/e/1.pdf"))]
    #[case(json!({"ResultUrl": "https://cdn.example.org/r.pdf"}), Some("https://cdn.example.org/r.pdf"))]
    #[case(json!({"data": {"url": "https://cdn.example.org/d.pdf"}}), Some("https://cdn.example.org/d.pdf"))]
    #[case(json!({"url": "/files/evaluations/1.pdf"}), Some("/files/evaluations/1.pdf"))]
    #[case(json!({"url": "pending"}), None)]
    #[case(json!({"message": "queued"}), None)]
    #[case(json!("not a url"), None)]
    fn url_extraction(#[case] body: Value, #[case] expected: Option<&str>) {
        assert_eq!(extract_url(&body).as_deref(), expected);
    }

    #[test]
    fn find_url_digs_into_documents() {
        let record = json!({
            "id": 3,
            "website": "https://example.org",
            "documents": [{"name": "report", "filePath": "https://cdn.example.org/3.pdf"}],
        });
        assert_eq!(
            find_url(&record).as_deref(),
            Some("https://cdn.example.org/3.pdf")
        );
    }

    #[test]
    fn fingerprint_from_payload_reads_known_fields() {
        let payload = json!({
            "experienceId": 5,
            "evaluatorId": 9,
            "comments": "Solid",
            "roleName": "Mentor",
        });
        let fp = fingerprint_from_payload(&payload, EVAL).unwrap();
        assert_eq!(fp.parent_id, 5);
        assert_eq!(fp.author_id, Some(9));
        assert_eq!(fp.comments.as_deref(), Some("Solid"));
        assert_eq!(fp.role_label.as_deref(), Some("Mentor"));
        assert!(fp.category_label.is_none());
    }

    #[test]
    fn fingerprint_requires_parent() {
        let err = fingerprint_from_payload(&json!({"comments": "x"}), EVAL).unwrap_err();
        assert!(err.to_string().contains("experienceId"));
    }

    #[test]
    fn unwrap_record_looks_through_envelopes() {
        let enveloped = json!({"data": {"id": 4, "pdfUrl": null}});
        assert_eq!(unwrap_record(&enveloped, EVAL), Some(&enveloped["data"]));

        let listed = json!({"items": [{"id": 4}]});
        assert_eq!(unwrap_record(&listed, EVAL), Some(&json!({"id": 4})));

        let plain = json!({"id": 4, "documents": [{"url": "x"}]});
        assert_eq!(unwrap_record(&plain, EVAL), Some(&plain));

        assert_eq!(unwrap_record(&json!("nope"), EVAL), None);
    }

    #[test]
    fn canonical_key_folds_case_and_separators() {
        assert_eq!(canonical_key("Experience_Id"), "experienceid");
        assert_eq!(canonical_key("PDF-Url"), "pdfurl");
    }
}
