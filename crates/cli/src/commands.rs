//! Command implementations. Each returns the JSON payload the MCP tool would carry as
//! structured content, plus a plain-text rendering for terminals.

use crate::output::{CommandOutput, InvalidArgument};
use anyhow::Result;
use lens_advisor::Advisor;
use lens_scanner::{project_status, LensConfig, StatusRegistry};
use lens_search::{SearchEngine, SearchOptions, SearchScope};
use lens_store::{
    AuditArtifactKind, AuditQuery, AuditStore, Document, DocumentStore, KnowledgeLibrary, Lookup,
};
use serde::Serialize;
use serde_json::json;

pub struct AuditSelection {
    pub artifact_type: String,
    pub subsystem: Option<String>,
    pub severity: Option<String>,
    pub audit: Option<String>,
}

fn output<T: Serialize>(value: &T, text: String) -> Result<CommandOutput> {
    Ok(CommandOutput {
        data: serde_json::to_value(value)?,
        text,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn push_document(text: &mut String, document: &Document) {
    text.push_str(&format!("== {} ({})\n", document.name, document.path));
    text.push_str(&document.content);
    if !document.content.ends_with('\n') {
        text.push('\n');
    }
}

pub fn status(config: &LensConfig) -> Result<CommandOutput> {
    let status = project_status(&config.layout, &StatusRegistry::builtin())?;

    let mut text = format!(
        "workflows: {} (archived runs: {})\n",
        status.workflows.len(),
        status.archived_runs
    );
    for workflow in &status.workflows {
        text.push_str(&format!(
            "{:<12} {:<20} {}\n",
            workflow.workflow_kind,
            workflow.current_phase,
            workflow.completion.as_str()
        ));
        if let Some(command) = workflow.recommended_next_command.as_deref() {
            text.push_str(&format!("  next: {command}\n"));
        }
    }

    let data = json!({
        "root": config.root().to_string_lossy(),
        "workflows": status.workflows,
        "archived_runs": status.archived_runs,
    });
    Ok(CommandOutput { data, text })
}

pub fn doc(config: &LensConfig, name: Option<&str>) -> Result<CommandOutput> {
    let store = DocumentStore::documents(&config.layout);
    let Some(name) = non_empty(name) else {
        let catalog = store.catalog()?;
        let mut text = format!("documents: {}\n", catalog.len());
        for entry in &catalog {
            text.push_str(&format!("{:<24} {}\n", entry.name, entry.description));
        }
        let data = json!({ "found": !catalog.is_empty(), "catalog": catalog });
        return Ok(CommandOutput { data, text });
    };

    match store.get(&name)? {
        Lookup::Found(document) => {
            let mut text = String::new();
            push_document(&mut text, &document);
            let data = json!({ "found": true, "requested": name, "document": document });
            Ok(CommandOutput { data, text })
        }
        Lookup::NotFound { available } => {
            let mut text = format!("not found: {name}\n");
            if available.is_empty() {
                text.push_str("no documents available\n");
            } else {
                text.push_str(&format!("available: {}\n", available.join(", ")));
            }
            let data = json!({ "found": false, "requested": name, "available": available });
            Ok(CommandOutput { data, text })
        }
    }
}

pub fn decisions(
    config: &LensConfig,
    name: Option<&str>,
    topic: Option<&str>,
) -> Result<CommandOutput> {
    let store = DocumentStore::decisions(&config.layout);
    if let Some(name) = non_empty(name) {
        return match store.get(&name)? {
            Lookup::Found(record) => {
                let mut text = String::new();
                push_document(&mut text, &record);
                let data = json!({
                    "found": true,
                    "requested": name,
                    "total": 1,
                    "decisions": [record],
                });
                Ok(CommandOutput { data, text })
            }
            Lookup::NotFound { available } => {
                let mut text = format!("not found: {name}\n");
                if available.is_empty() {
                    text.push_str("no decision records available\n");
                } else {
                    text.push_str(&format!("available: {}\n", available.join(", ")));
                }
                let data = json!({
                    "found": false,
                    "requested": name,
                    "total": 0,
                    "decisions": [],
                    "available": available,
                });
                Ok(CommandOutput { data, text })
            }
        };
    }

    let topic = non_empty(topic);
    let records = store.filter_by_topic(topic.as_deref())?;

    let mut text = format!("decisions: {}\n", records.len());
    for record in &records {
        text.push('\n');
        push_document(&mut text, record);
    }
    let data = json!({
        "found": !records.is_empty(),
        "topic": topic,
        "total": records.len(),
        "decisions": records,
    });
    Ok(CommandOutput { data, text })
}

pub fn audit(config: &LensConfig, selection: AuditSelection) -> Result<CommandOutput> {
    let kind = selection
        .artifact_type
        .parse::<AuditArtifactKind>()
        .map_err(InvalidArgument)?;
    let query = AuditQuery {
        kind,
        subsystem: non_empty(selection.subsystem.as_deref()),
        severity: non_empty(selection.severity.as_deref()),
        audit: non_empty(selection.audit.as_deref()),
    };
    let artifact = AuditStore::new(&config.layout).artifact(&query)?;

    let mut text = format!("audit {} ({}): ", artifact.kind, artifact.audit);
    if artifact.found {
        text.push_str(&format!("{} file(s)\n", artifact.files.len()));
    } else {
        text.push_str("not found\n");
    }
    for file in &artifact.files {
        match file.severity_hits {
            Some(hits) => {
                text.push_str(&format!("== {} (severity hits: {hits})\n", file.path));
            }
            None => {
                text.push_str(&format!("== {}\n", file.path));
            }
        }
        if let Some(content) = file.content.as_deref() {
            text.push_str(content);
            if !content.ends_with('\n') {
                text.push('\n');
            }
        }
    }
    if !artifact.found && !artifact.available.is_empty() {
        text.push_str(&format!("available: {}\n", artifact.available.join(", ")));
    }
    output(&artifact, text)
}

pub fn search(
    config: &LensConfig,
    query: &str,
    scope: &str,
    regex: bool,
    max_results: Option<usize>,
) -> Result<CommandOutput> {
    let scope = scope.parse::<SearchScope>().map_err(InvalidArgument)?;
    let mut options = SearchOptions::default().with_scope(scope).with_regex(regex);
    if let Some(max_results) = max_results {
        options = options.with_max_results(max_results);
    }
    let outcome = SearchEngine::new(config.layout.clone()).search(query, &options)?;

    let mut text = String::new();
    for hit in &outcome.hits {
        text.push_str(&format!("{}:{}: {}\n", hit.path, hit.line, hit.context));
    }
    text.push_str(&format!(
        "{} matching artifact(s) in scope {}\n",
        outcome.total_hits, outcome.scope
    ));
    if outcome.truncated {
        text.push_str(&format!(
            "showing the first {}; raise --max-results or narrow --scope\n",
            outcome.hits.len()
        ));
    }
    output(&outcome, text)
}

pub fn suggest(config: &LensConfig) -> Result<CommandOutput> {
    let suggestions =
        Advisor::new(config.stale_days).suggest(&config.layout, &StatusRegistry::builtin())?;

    let mut text = String::new();
    for suggestion in &suggestions {
        text.push_str(&format!("[{}] {}\n", suggestion.priority, suggestion.message));
        text.push_str(&format!("  why: {}\n", suggestion.reason));
        if let Some(command) = suggestion.command.as_deref() {
            text.push_str(&format!("  run: {command}\n"));
        }
    }
    let data = json!({ "suggestions": suggestions });
    Ok(CommandOutput { data, text })
}

pub fn knowledge_list(config: &LensConfig, id: Option<&str>) -> Result<CommandOutput> {
    let bases = KnowledgeLibrary::new(config.knowledge_dir.clone()).list(non_empty(id).as_deref())?;

    let mut text = format!("knowledge bases: {}\n", bases.len());
    for base in &bases {
        let version = base.version.as_deref().unwrap_or("-");
        text.push_str(&format!(
            "{:<20} {:<8} {} ({} files)\n",
            base.id,
            version,
            base.name,
            base.files.len()
        ));
        if let Some(description) = base.description.as_deref() {
            text.push_str(&format!("  {description}\n"));
        }
    }
    let data = json!({ "knowledge_bases": bases });
    Ok(CommandOutput { data, text })
}

pub fn knowledge_read(
    config: &LensConfig,
    id: &str,
    relative_path: Option<&str>,
) -> Result<CommandOutput> {
    let library = KnowledgeLibrary::new(config.knowledge_dir.clone());
    match library.read(id, non_empty(relative_path).as_deref())? {
        Lookup::Found(file) => {
            let mut text = file.content.clone();
            if !text.ends_with('\n') {
                text.push('\n');
            }
            let data = json!({ "found": true, "file": file });
            Ok(CommandOutput { data, text })
        }
        Lookup::NotFound { available } => {
            let text = format!("not found\navailable: {}\n", available.join(", "));
            let data = json!({ "found": false, "available": available });
            Ok(CommandOutput { data, text })
        }
    }
}
