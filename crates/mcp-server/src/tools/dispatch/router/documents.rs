use super::super::{
    finish_with, run_blocking, ArtifactLensService, CallToolResult, ContextDocBuilder,
    GetDecisionsRequest, GetDecisionsResult, GetDocumentRequest, GetDocumentResult, McpError,
};
use lens_store::{Document, DocumentStore, Lookup};

fn push_document(doc: &mut ContextDocBuilder, document: &Document) {
    doc.push_ref_header(&document.path, 1, Some(&document.name));
    doc.push_block_smart(&document.content);
}

/// One document by name, or the catalog when no name is given.
pub(in crate::tools::dispatch) async fn get_document(
    service: &ArtifactLensService,
    request: GetDocumentRequest,
) -> Result<CallToolResult, McpError> {
    let config = match service.config_for(request.path.as_deref()) {
        Ok(config) => config,
        Err(err) => return Ok(err.into_result()),
    };
    let name = request
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let store = DocumentStore::documents(&config.layout);
    let result = match name {
        None => {
            let catalog = match run_blocking(move || Ok(store.catalog()?)).await {
                Ok(catalog) => catalog,
                Err(result) => return Ok(result),
            };
            GetDocumentResult {
                found: !catalog.is_empty(),
                requested: None,
                document: None,
                catalog: Some(catalog),
                available: Vec::new(),
            }
        }
        Some(name) => {
            let wanted = name.clone();
            let lookup = match run_blocking(move || Ok(store.get(&wanted)?)).await {
                Ok(lookup) => lookup,
                Err(result) => return Ok(result),
            };
            match lookup {
                Lookup::Found(document) => GetDocumentResult {
                    found: true,
                    requested: Some(name),
                    document: Some(document),
                    catalog: None,
                    available: Vec::new(),
                },
                Lookup::NotFound { available } => GetDocumentResult {
                    found: false,
                    requested: Some(name),
                    document: None,
                    catalog: None,
                    available,
                },
            }
        }
    };

    let mut doc = ContextDocBuilder::new();
    if let Some(document) = result.document.as_ref() {
        doc.push_answer(&format!("document: {}", document.name));
        push_document(&mut doc, document);
    } else if let Some(catalog) = result.catalog.as_ref() {
        doc.push_answer(&format!("documents: {}", catalog.len()));
        for entry in catalog {
            let label = if entry.description.is_empty() {
                entry.name.clone()
            } else {
                format!("{} - {}", entry.name, entry.description)
            };
            doc.push_ref_header(&entry.path, 1, Some(&label));
        }
    } else {
        doc.push_answer(&format!(
            "not found: {}",
            result.requested.as_deref().unwrap_or_default()
        ));
        if result.available.is_empty() {
            doc.push_note("no documents available");
        } else {
            doc.push_note(&format!("available: {}", result.available.join(", ")));
        }
    }
    Ok(finish_with(doc, &result))
}

pub(in crate::tools::dispatch) async fn get_decisions(
    service: &ArtifactLensService,
    request: GetDecisionsRequest,
) -> Result<CallToolResult, McpError> {
    let config = match service.config_for(request.path.as_deref()) {
        Ok(config) => config,
        Err(err) => return Ok(err.into_result()),
    };
    let name = request
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    let topic = request
        .topic
        .map(|topic| topic.trim().to_string())
        .filter(|topic| !topic.is_empty());

    let store = DocumentStore::decisions(&config.layout);
    let (wanted, filter) = (name.clone(), topic.clone());
    let (decisions, available) = match run_blocking(move || match wanted {
        Some(wanted) => Ok(match store.get(&wanted)? {
            Lookup::Found(record) => (vec![record], Vec::new()),
            Lookup::NotFound { available } => (Vec::new(), available),
        }),
        None => Ok((store.filter_by_topic(filter.as_deref())?, Vec::new())),
    })
    .await
    {
        Ok(found) => found,
        Err(result) => return Ok(result),
    };

    let mut doc = ContextDocBuilder::new();
    match (name.as_deref(), topic.as_deref()) {
        (Some(name), _) if decisions.is_empty() => {
            doc.push_answer(&format!("not found: {name}"));
            if available.is_empty() {
                doc.push_note("no decision records available");
            } else {
                doc.push_note(&format!("available: {}", available.join(", ")));
            }
        }
        (Some(_), _) => doc.push_answer("decisions: 1"),
        (None, Some(topic)) => {
            doc.push_answer(&format!("decisions: {} (topic={topic})", decisions.len()))
        }
        (None, None) => doc.push_answer(&format!("decisions: {}", decisions.len())),
    }
    for (idx, record) in decisions.iter().enumerate() {
        if idx > 0 {
            doc.push_blank();
        }
        push_document(&mut doc, record);
    }

    let result = GetDecisionsResult {
        found: !decisions.is_empty(),
        requested: name,
        topic,
        total: decisions.len(),
        decisions,
        available,
    };
    Ok(finish_with(doc, &result))
}
