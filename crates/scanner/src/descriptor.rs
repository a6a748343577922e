use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Keys that may carry the workflow kind, in lookup order.
pub const WORKFLOW_KIND_KEYS: &[&str] =
    &["workflow", "workflow_kind", "workflowKind", "kind", "type"];

/// Keys that may carry the last-updated timestamp, in lookup order.
pub const LAST_UPDATED_KEYS: &[&str] = &[
    "last_updated",
    "lastUpdated",
    "updated_at",
    "updatedAt",
    "timestamp",
];

/// One workflow state file as found on disk.
///
/// `raw_fields` keeps the producer's key order; phase resolution relies on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStateDescriptor {
    pub workflow_kind: String,
    pub file_path: PathBuf,
    pub relative_path: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub file_modified: Option<DateTime<Utc>>,
    pub raw_fields: Map<String, Value>,
}

impl WorkflowStateDescriptor {
    /// Build a descriptor from raw file contents.
    ///
    /// Returns `None` when the text is not a JSON object or carries no workflow kind.
    pub fn parse(file_path: PathBuf, relative_path: String, raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let Value::Object(raw_fields) = value else {
            return None;
        };
        let workflow_kind = workflow_kind_of(&raw_fields)?;
        let last_updated = last_updated_of(&raw_fields);
        Some(Self {
            workflow_kind,
            file_path,
            relative_path,
            last_updated,
            file_modified: None,
            raw_fields,
        })
    }

    /// Timestamp used for recency comparisons: the declared one, else the file mtime.
    pub fn effective_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated.or(self.file_modified)
    }
}

fn workflow_kind_of(fields: &Map<String, Value>) -> Option<String> {
    WORKFLOW_KIND_KEYS.iter().find_map(|key| {
        fields
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .map(str::to_string)
    })
}

fn last_updated_of(fields: &Map<String, Value>) -> Option<DateTime<Utc>> {
    LAST_UPDATED_KEYS
        .iter()
        .find_map(|key| fields.get(*key).and_then(parse_timestamp))
}

/// Best-effort timestamp parsing across the formats producers are known to write.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let secs = match n.as_i64() {
                Some(secs) => secs,
                None => float_seconds(n.as_f64()?)?,
            };
            Utc.timestamp_opt(secs, 0).single()
        }
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

/// Whole seconds of a float timestamp; out-of-range values are unparsable rather than clamped.
fn float_seconds(secs: f64) -> Option<i64> {
    let in_range = secs.is_finite() && secs >= i64::MIN as f64 && secs < i64::MAX as f64;
    in_range.then(|| secs.trunc() as i64)
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
