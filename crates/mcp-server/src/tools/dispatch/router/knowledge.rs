use super::super::{
    finish_with, run_blocking, ArtifactLensService, CallToolResult, ContextDocBuilder,
    ListKnowledgeRequest, ListKnowledgeResult, McpError, ReadKnowledgeRequest,
    ReadKnowledgeResult,
};
use lens_store::{KnowledgeLibrary, Lookup};

pub(in crate::tools::dispatch) async fn list_knowledge(
    service: &ArtifactLensService,
    request: ListKnowledgeRequest,
) -> Result<CallToolResult, McpError> {
    let library = KnowledgeLibrary::new(service.config.knowledge_dir.clone());
    let id = request.knowledge_base_id;
    let bases = match run_blocking(move || Ok(library.list(id.as_deref())?)).await {
        Ok(bases) => bases,
        Err(result) => return Ok(result),
    };

    let mut doc = ContextDocBuilder::new();
    doc.push_answer(&format!("knowledge bases: {}", bases.len()));
    for base in &bases {
        let mut label = base.name.clone();
        if let Some(version) = base.version.as_deref() {
            label.push_str(&format!(" v{version}"));
        }
        let anchor = match base.index.as_deref() {
            Some(index) => format!("{}/{index}", base.id),
            None => base.id.clone(),
        };
        doc.push_ref_header(&anchor, 1, Some(&label));
        if let Some(description) = base.description.as_deref() {
            doc.push_note(description);
        }
        doc.push_note(&format!("files={}", base.files.len()));
    }

    let result = ListKnowledgeResult {
        knowledge_bases: bases,
    };
    Ok(finish_with(doc, &result))
}

pub(in crate::tools::dispatch) async fn read_knowledge(
    service: &ArtifactLensService,
    request: ReadKnowledgeRequest,
) -> Result<CallToolResult, McpError> {
    let library = KnowledgeLibrary::new(service.config.knowledge_dir.clone());
    let id = request.knowledge_base_id;
    let relative = request.relative_path;
    let lookup = match run_blocking(move || Ok(library.read(&id, relative.as_deref())?)).await {
        Ok(lookup) => lookup,
        Err(result) => return Ok(result),
    };

    let mut doc = ContextDocBuilder::new();
    let result = match lookup {
        Lookup::Found(file) => {
            doc.push_answer(&format!(
                "knowledge: {}/{}",
                file.knowledge_base_id, file.relative_path
            ));
            doc.push_ref_header(
                &format!("{}/{}", file.knowledge_base_id, file.relative_path),
                1,
                None,
            );
            doc.push_block_smart(&file.content);
            ReadKnowledgeResult {
                found: true,
                file: Some(file),
                available: Vec::new(),
            }
        }
        Lookup::NotFound { available } => {
            doc.push_answer("not found");
            doc.push_note(&format!("available: {}", available.join(", ")));
            ReadKnowledgeResult {
                found: false,
                file: None,
                available,
            }
        }
    };
    Ok(finish_with(doc, &result))
}
