use super::super::{
    finish_with, run_blocking, ArtifactLensService, CallToolResult, ContextDocBuilder, McpError,
    SearchRequest,
};
use super::error::invalid_request;
use lens_search::{SearchEngine, SearchError, SearchOptions, SearchScope};

pub(in crate::tools::dispatch) async fn search(
    service: &ArtifactLensService,
    request: SearchRequest,
) -> Result<CallToolResult, McpError> {
    // Reject before touching the file system.
    if request.query.trim().is_empty() {
        return Ok(super::error::DispatchError::from(SearchError::EmptyQuery).into_result());
    }
    let scope = match request.scope.as_deref() {
        Some(raw) => match raw.parse::<SearchScope>() {
            Ok(scope) => scope,
            Err(message) => return Ok(invalid_request(message)),
        },
        None => SearchScope::All,
    };
    let config = match service.config_for(request.path.as_deref()) {
        Ok(config) => config,
        Err(err) => return Ok(err.into_result()),
    };

    let mut options = SearchOptions::default()
        .with_scope(scope)
        .with_regex(request.regex.unwrap_or(false));
    if let Some(max_results) = request.max_results {
        options = options.with_max_results(max_results);
    }
    let engine = SearchEngine::new(config.layout.clone());
    let query = request.query;
    let outcome = match run_blocking(move || Ok(engine.search(&query, &options)?)).await {
        Ok(outcome) => outcome,
        Err(result) => return Ok(result),
    };

    let mut doc = ContextDocBuilder::new();
    doc.push_answer(&format!(
        "hits: {} scope={} query={}",
        outcome.hits.len(),
        outcome.scope,
        outcome.query
    ));
    for hit in &outcome.hits {
        doc.push_ref_header(
            &hit.path,
            hit.line,
            Some(&format!("{}:{} ({} line(s))", hit.scope, hit.name, hit.occurrences)),
        );
        doc.push_block_smart(&hit.context);
    }
    if outcome.truncated {
        doc.push_note(&format!(
            "truncated: showing {} of {} matching artifacts; raise max_results or narrow the scope",
            outcome.hits.len(),
            outcome.total_hits
        ));
    }
    Ok(finish_with(doc, &outcome))
}
