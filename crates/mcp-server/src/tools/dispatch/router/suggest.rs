use super::super::{
    finish_with, run_blocking, ArtifactLensService, CallToolResult, ContextDocBuilder, McpError,
    SuggestNextActionRequest, SuggestNextActionResult,
};
use lens_advisor::Advisor;

pub(in crate::tools::dispatch) async fn suggest_next_action(
    service: &ArtifactLensService,
    request: SuggestNextActionRequest,
) -> Result<CallToolResult, McpError> {
    let config = match service.config_for(request.path.as_deref()) {
        Ok(config) => config,
        Err(err) => return Ok(err.into_result()),
    };
    let registry = service.registry();
    let advisor = Advisor::new(config.stale_days);
    let suggestions =
        match run_blocking(move || Ok(advisor.suggest(&config.layout, &registry)?)).await {
            Ok(suggestions) => suggestions,
            Err(result) => return Ok(result),
        };

    let mut doc = ContextDocBuilder::new();
    match suggestions.first() {
        Some(top) => doc.push_answer(&format!("[{}] {}", top.priority, top.message)),
        None => doc.push_answer("nothing to do"),
    }
    for suggestion in &suggestions {
        doc.push_note(&format!(
            "[{}] {}: {} ({})",
            suggestion.priority, suggestion.rule, suggestion.message, suggestion.reason
        ));
        if let Some(command) = suggestion.command.as_deref() {
            doc.push_note(&format!("next: {command}"));
        }
    }

    let result = SuggestNextActionResult { suggestions };
    Ok(finish_with(doc, &result))
}
