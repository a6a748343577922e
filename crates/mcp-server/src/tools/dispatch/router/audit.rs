use super::super::{
    finish_with, run_blocking, ArtifactLensService, CallToolResult, ContextDocBuilder,
    GetAuditArtifactRequest, McpError,
};
use super::error::invalid_request;
use lens_store::{AuditArtifactKind, AuditQuery, AuditStore};

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(in crate::tools::dispatch) async fn get_audit_artifact(
    service: &ArtifactLensService,
    request: GetAuditArtifactRequest,
) -> Result<CallToolResult, McpError> {
    let kind = match non_empty(request.artifact_type) {
        Some(raw) => match raw.parse::<AuditArtifactKind>() {
            Ok(kind) => kind,
            Err(message) => return Ok(invalid_request(message)),
        },
        None => AuditArtifactKind::default(),
    };
    let config = match service.config_for(request.path.as_deref()) {
        Ok(config) => config,
        Err(err) => return Ok(err.into_result()),
    };

    let query = AuditQuery {
        kind,
        subsystem: non_empty(request.subsystem),
        severity: non_empty(request.severity),
        audit: non_empty(request.audit),
    };
    let store = AuditStore::new(&config.layout);
    let artifact = match run_blocking(move || Ok(store.artifact(&query)?)).await {
        Ok(artifact) => artifact,
        Err(result) => return Ok(result),
    };

    let mut doc = ContextDocBuilder::new();
    let mut answer = format!("audit {} ({}): ", artifact.kind, artifact.audit);
    if artifact.found {
        answer.push_str(&format!("{} file(s)", artifact.files.len()));
    } else {
        answer.push_str("not found");
    }
    doc.push_answer(&answer);
    if let Some(subsystem) = artifact.subsystem.as_deref() {
        doc.push_note(&format!("subsystem={subsystem}"));
    }
    if let Some(severity) = artifact.severity.as_deref() {
        doc.push_note(&format!("severity={severity}"));
    }
    for file in &artifact.files {
        let label = match file.severity_hits {
            Some(hits) => format!("{} (severity_hits={hits})", file.name),
            None => file.name.clone(),
        };
        doc.push_ref_header(&file.path, 1, Some(&label));
        if let Some(content) = file.content.as_deref() {
            doc.push_block_smart(content);
        }
    }
    if !artifact.found {
        if artifact.available.is_empty() {
            doc.push_note("no alternatives available");
        } else {
            doc.push_note(&format!("available: {}", artifact.available.join(", ")));
        }
    }
    Ok(finish_with(doc, &artifact))
}
