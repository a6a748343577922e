use super::super::{CallToolResult, Content};
use crate::tools::context_doc::ContextDocBuilder;
use lens_advisor::AdvisorError;
use lens_protocol::{ErrorEnvelope, ToolNextAction};
use lens_scanner::ScanError;
use lens_search::SearchError;
use lens_store::{KnowledgeError, StoreError};
use serde_json::{json, Value};
use thiserror::Error;

/// Why a tool call failed: the caller's fault, or ours.
#[derive(Debug, Error)]
pub(in crate::tools::dispatch) enum DispatchError {
    #[error("{}", .0.message)]
    InvalidRequest(ErrorEnvelope),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DispatchError {
    pub(in crate::tools::dispatch) fn into_result(self) -> CallToolResult {
        match self {
            DispatchError::InvalidRequest(envelope) => tool_error_envelope(envelope),
            DispatchError::Internal(err) => {
                log::warn!("tool call failed: {err:#}");
                tool_error_envelope(ErrorEnvelope::internal(format!("{err:#}")))
            }
        }
    }
}

impl From<ScanError> for DispatchError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidPath(_) | ScanError::InvalidConfig { .. } => {
                DispatchError::InvalidRequest(
                    ErrorEnvelope::invalid_request(err.to_string())
                        .with_hint("Pass `path` as an existing project directory."),
                )
            }
            ScanError::IoError(_) => DispatchError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(err: StoreError) -> Self {
        DispatchError::Internal(anyhow::Error::new(err))
    }
}

impl From<SearchError> for DispatchError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::EmptyQuery => DispatchError::InvalidRequest(
                ErrorEnvelope::invalid_request("Query must not be empty")
                    .with_hint("Pass the text to find as `query`."),
            ),
            SearchError::InvalidPattern(_) => DispatchError::InvalidRequest(
                ErrorEnvelope::invalid_request(err.to_string())
                    .with_hint("Fix the pattern, or set `regex: false` for a literal search."),
            ),
            SearchError::StoreError(inner) => inner.into(),
        }
    }
}

impl From<KnowledgeError> for DispatchError {
    fn from(err: KnowledgeError) -> Self {
        match err {
            KnowledgeError::UnknownBase { ref available, .. } => {
                let details = json!({ "available": available });
                DispatchError::InvalidRequest(
                    ErrorEnvelope::invalid_request(err.to_string())
                        .with_details(details)
                        .with_next_action(ToolNextAction {
                            tool: "list_knowledge".to_string(),
                            args: json!({}),
                            reason: "list the available knowledge bases".to_string(),
                        }),
                )
            }
            KnowledgeError::PathEscape { .. } => DispatchError::InvalidRequest(
                ErrorEnvelope::invalid_request(err.to_string()).with_hint(
                    "Pass `relative_path` relative to the knowledge base, without '..' or a leading '/'.",
                ),
            ),
            KnowledgeError::IoError(_) => DispatchError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<AdvisorError> for DispatchError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::ScanError(inner) => inner.into(),
            AdvisorError::StoreError(inner) => inner.into(),
        }
    }
}

const MAX_DETAIL_KEYS: usize = 8;
const MAX_DETAIL_CHARS: usize = 200;

fn flatten_detail(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.split_whitespace().collect::<Vec<_>>().join(" "),
        Value::Array(items) => items.iter().map(flatten_detail).collect::<Vec<_>>().join(", "),
        Value::Object(map) => format!("<object keys={}>", map.len()),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_DETAIL_CHARS {
        let mut cut: String = text.chars().take(MAX_DETAIL_CHARS).collect();
        cut.push('…');
        cut
    } else {
        text
    }
}

/// One `details.<key>=<value>` note per key, sorted, at most [`MAX_DETAIL_KEYS`].
fn detail_notes(details: &Value) -> Vec<String> {
    let Value::Object(map) = details else {
        return vec![format!("details={}", flatten_detail(details))];
    };
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    let mut notes: Vec<String> = keys
        .iter()
        .take(MAX_DETAIL_KEYS)
        .map(|key| format!("details.{key}={}", flatten_detail(&map[key.as_str()])))
        .collect();
    if keys.len() > MAX_DETAIL_KEYS {
        notes.push(format!("details.more_keys={}", keys.len() - MAX_DETAIL_KEYS));
    }
    notes
}

pub(in crate::tools::dispatch) fn tool_error_envelope(error: ErrorEnvelope) -> CallToolResult {
    let mut doc = ContextDocBuilder::new();
    doc.push_answer(&format!("error: {}", error.code));
    doc.push_note(&error.message);
    if let Some(hint) = error.hint.as_deref() {
        if !hint.trim().is_empty() {
            doc.push_note(&format!("hint: {hint}"));
        }
    }
    if let Some(details) = error.details.as_ref() {
        for line in detail_notes(details) {
            doc.push_note(&line);
        }
    }
    for action in &error.next_actions {
        doc.push_note(&format!("next: {} ({})", action.tool, action.reason));
    }

    let mut result = CallToolResult::error(vec![Content::text(doc.finish())]);
    result.structured_content = Some(json!({ "error": error }));
    result
}

pub(in crate::tools::dispatch) fn internal_error(message: impl Into<String>) -> CallToolResult {
    tool_error_envelope(ErrorEnvelope::internal(message))
}

pub(in crate::tools::dispatch) fn invalid_request(message: impl Into<String>) -> CallToolResult {
    tool_error_envelope(ErrorEnvelope::invalid_request(message))
}
