use lens_advisor::AdvisorError;
use lens_protocol::{ErrorEnvelope, ToolNextAction};
use lens_scanner::ScanError;
use lens_search::SearchError;
use lens_store::{KnowledgeError, StoreError};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Rendered result of one command: the JSON payload and its human-readable form.
pub struct CommandOutput {
    pub data: Value,
    pub text: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl CommandResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            error: None,
            data,
        }
    }

    pub fn error(error: ErrorEnvelope) -> Self {
        Self {
            status: CommandStatus::Error,
            error: Some(error),
            data: Value::Null,
        }
    }
}

/// A command argument that failed to parse (scope, audit type, ...).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvalidArgument(pub String);

/// Map a command failure onto the shared error envelope.
///
/// Caller mistakes become `invalid_request`; everything else is `internal`.
pub fn classify_error(err: &anyhow::Error) -> ErrorEnvelope {
    if let Some(invalid) = err.downcast_ref::<InvalidArgument>() {
        return ErrorEnvelope::invalid_request(invalid.0.clone());
    }
    if let Some(scan) = err.downcast_ref::<ScanError>() {
        return classify_scan(scan).unwrap_or_else(|| internal(err));
    }
    if let Some(search) = err.downcast_ref::<SearchError>() {
        return match search {
            SearchError::EmptyQuery => ErrorEnvelope::invalid_request("Query must not be empty")
                .with_hint("Pass the text to find as QUERY."),
            SearchError::InvalidPattern(_) => ErrorEnvelope::invalid_request(search.to_string())
                .with_hint("Fix the pattern, or drop --regex for a literal search."),
            SearchError::StoreError(_) => internal(err),
        };
    }
    if let Some(knowledge) = err.downcast_ref::<KnowledgeError>() {
        return match knowledge {
            KnowledgeError::UnknownBase { available, .. } => {
                ErrorEnvelope::invalid_request(knowledge.to_string())
                    .with_details(json!({ "available": available }))
                    .with_next_action(ToolNextAction {
                        tool: "knowledge list".to_string(),
                        args: json!({}),
                        reason: "list the available knowledge bases".to_string(),
                    })
            }
            KnowledgeError::PathEscape { .. } => {
                ErrorEnvelope::invalid_request(knowledge.to_string()).with_hint(
                    "Pass PATH relative to the knowledge base, without '..' or a leading '/'.",
                )
            }
            KnowledgeError::IoError(_) => internal(err),
        };
    }
    if let Some(AdvisorError::ScanError(scan)) = err.downcast_ref::<AdvisorError>() {
        return classify_scan(scan).unwrap_or_else(|| internal(err));
    }
    if err.downcast_ref::<StoreError>().is_some() {
        log::debug!("store failure: {err:#}");
    }
    internal(err)
}

fn classify_scan(err: &ScanError) -> Option<ErrorEnvelope> {
    match err {
        ScanError::InvalidPath(_) => Some(
            ErrorEnvelope::invalid_request(err.to_string())
                .with_hint("Pass --root as an existing project directory."),
        ),
        ScanError::InvalidConfig { .. } => Some(
            ErrorEnvelope::invalid_request(err.to_string())
                .with_hint("Fix or remove the project's .lens.toml."),
        ),
        ScanError::IoError(_) => None,
    }
}

fn internal(err: &anyhow::Error) -> ErrorEnvelope {
    ErrorEnvelope::internal(format!("{err:#}"))
}
