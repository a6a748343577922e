use super::super::{
    finish_with, run_blocking, ArtifactLensService, CallToolResult, ContextDocBuilder, McpError,
    ProjectStatusRequest, ProjectStatusResult,
};
use lens_scanner::project_status as scan_project_status;

pub(in crate::tools::dispatch) async fn project_status(
    service: &ArtifactLensService,
    request: ProjectStatusRequest,
) -> Result<CallToolResult, McpError> {
    let config = match service.config_for(request.path.as_deref()) {
        Ok(config) => config,
        Err(err) => return Ok(err.into_result()),
    };
    let registry = service.registry();
    let root = config.root().to_string_lossy().into_owned();
    let status = match run_blocking(move || Ok(scan_project_status(&config.layout, &registry)?))
        .await
    {
        Ok(status) => status,
        Err(result) => return Ok(result),
    };

    let mut doc = ContextDocBuilder::new();
    doc.push_answer(&format!(
        "workflows: {} (archived_runs={})",
        status.workflows.len(),
        status.archived_runs
    ));
    if status.workflows.is_empty() {
        doc.push_note("no workflow state files found");
    }
    for workflow in &status.workflows {
        doc.push_ref_header(&workflow.state_file, 1, Some(&workflow.workflow_kind));
        doc.push_note(&format!(
            "phase={} completion={}",
            workflow.current_phase,
            workflow.completion.as_str()
        ));
        if !workflow.phase_detail.is_empty() {
            let detail = workflow
                .phase_detail
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            doc.push_note(&detail);
        }
        if let Some(updated) = workflow.last_updated {
            doc.push_note(&format!("last_updated={}", updated.to_rfc3339()));
        }
        if let Some(command) = workflow.recommended_next_command.as_deref() {
            doc.push_note(&format!("next: {command}"));
        }
    }

    let result = ProjectStatusResult {
        root,
        workflows: status.workflows,
        archived_runs: status.archived_runs,
    };
    Ok(finish_with(doc, &result))
}
