mod support;

use anyhow::Result;
use serde_json::json;
use std::path::Path;
use support::{call, start, structured, text, write};

fn seed_knowledge(dir: &Path) -> Result<()> {
    write(
        dir,
        "security/manifest.json",
        r#"{"name":"Security patterns","version":"1.0.0","description":"Common vulnerability classes"}"#,
    )?;
    write(dir, "security/index.md", "# Security patterns\n")?;
    write(dir, "security/access-control.md", "# Access control\n")?;
    Ok(())
}

#[tokio::test]
async fn empty_project_reports_no_workflows() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("project");
    std::fs::create_dir_all(root.join("src"))?;
    write(&root, "README.md", "# demo\n")?;
    let client = start(&root, &tmp.path().join("knowledge")).await?;

    let result = call(&client, "project_status", json!({})).await?;
    assert_ne!(result.is_error, Some(true));
    assert!(text(&result)?.contains("A: workflows: 0 (archived_runs=0)"));
    let value = structured(&result)?;
    assert_eq!(value["workflows"], json!([]));
    assert_eq!(value["archived_runs"], 0);

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn in_progress_phase_is_current_and_results_are_stable() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("project");
    write(
        &root,
        ".docs/state.json",
        r#"{"workflow":"docs","last_updated":"2024-05-01T08:00:00Z","phases":{"survey":{"status":"complete"},"interview":{"status":"in_progress"}}}"#,
    )?;
    let client = start(&root, &tmp.path().join("knowledge")).await?;

    let first = call(&client, "project_status", json!({})).await?;
    let workflow = &structured(&first)?["workflows"][0];
    assert_eq!(workflow["workflow_kind"], "docs");
    assert_eq!(workflow["current_phase"], "interview");
    assert_eq!(workflow["completion"], "in_progress");
    assert_eq!(
        workflow["recommended_next_command"],
        "docs continue --phase interview: answer the open questions"
    );

    let second = call(&client, "project_status", json!({})).await?;
    assert_eq!(text(&first)?, text(&second)?);
    assert_eq!(structured(&first)?, structured(&second)?);

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn critical_unresolved_findings_lead_suggestions() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("project");
    write(
        &root,
        ".audit/report.md",
        "# Audit\n- CRITICAL: signer check missing (unresolved)\n- CRITICAL: overflow in mint\n",
    )?;
    std::fs::create_dir_all(root.join("programs"))?;
    let client = start(&root, &tmp.path().join("knowledge")).await?;

    let result = call(&client, "suggest_next_action", json!({})).await?;
    let suggestions = &structured(&result)?["suggestions"];
    assert_eq!(suggestions[0]["priority"], "critical");
    assert_eq!(suggestions[0]["rule"], "unresolved_audit_findings");
    assert!(suggestions[0]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("1 unresolved"));
    assert!(text(&result)?.starts_with("[CONTENT]\nA: [critical]"));

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn document_search_returns_containing_line() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("project");
    write(
        &root,
        "docs/architecture.md",
        "# Architecture\n\nCalls go through token_program first.\n",
    )?;
    write(&root, "docs/decisions/0001-token.md", "# token_program owns mints\n")?;
    let client = start(&root, &tmp.path().join("knowledge")).await?;

    let result = call(
        &client,
        "search",
        json!({"query": "token_program", "scope": "documents"}),
    )
    .await?;
    let hits = structured(&result)?["hits"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["path"], "docs/architecture.md");
    assert_eq!(hits[0]["line"], 3);
    assert_eq!(hits[0]["context"], "Calls go through token_program first.");
    assert!(text(&result)?.contains("R: docs/architecture.md:3"));

    let none = call(&client, "search", json!({"query": "no_such_symbol"})).await?;
    assert_eq!(structured(&none)?["hits"], json!([]));

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn blank_query_is_an_invalid_request() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("project");
    std::fs::create_dir_all(&root)?;
    let client = start(&root, &tmp.path().join("knowledge")).await?;

    let result = call(&client, "search", json!({"query": "   "})).await?;
    assert_eq!(result.is_error, Some(true));
    assert_eq!(structured(&result)?["error"]["code"], "invalid_request");

    let result = call(&client, "search", json!({"query": "(", "regex": true})).await?;
    assert_eq!(result.is_error, Some(true));
    assert_eq!(structured(&result)?["error"]["code"], "invalid_request");

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn documents_decisions_and_audit_artifacts() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("project");
    write(&root, "docs/architecture.md", "# Architecture\nLayers.\n")?;
    write(&root, "docs/decisions/0001-use-postgres.md", "# Use Postgres\n")?;
    write(&root, ".audit/findings/001.md", "Severity: High\n")?;
    let client = start(&root, &tmp.path().join("knowledge")).await?;

    let catalog = call(&client, "get_document", json!({})).await?;
    assert_eq!(
        structured(&catalog)?["catalog"][0]["description"],
        "Architecture"
    );

    let doc = call(&client, "get_document", json!({"name": "ARCH"})).await?;
    assert_eq!(structured(&doc)?["document"]["name"], "architecture");

    let missing = call(&client, "get_document", json!({"name": "deploy"})).await?;
    assert_ne!(missing.is_error, Some(true));
    assert_eq!(structured(&missing)?["found"], false);
    assert_eq!(structured(&missing)?["available"], json!(["architecture"]));

    let decisions = call(&client, "get_decisions", json!({"topic": "postgres"})).await?;
    assert_eq!(structured(&decisions)?["total"], 1);

    let named = call(&client, "get_decisions", json!({"name": "POSTGRES"})).await?;
    let value = structured(&named)?;
    assert_eq!(value["found"], true);
    assert_eq!(value["decisions"][0]["name"], "0001-use-postgres");

    let unknown = call(&client, "get_decisions", json!({"name": "kafka"})).await?;
    assert_ne!(unknown.is_error, Some(true));
    let value = structured(&unknown)?;
    assert_eq!(value["total"], 0);
    assert_eq!(value["available"], json!(["0001-use-postgres"]));

    let findings = call(
        &client,
        "get_audit_artifact",
        json!({"type": "findings", "severity": "high"}),
    )
    .await?;
    let value = structured(&findings)?;
    assert_eq!(value["found"], true);
    assert_eq!(value["files"][0]["severity_hits"], 1);

    let report = call(&client, "get_audit_artifact", json!({})).await?;
    assert_eq!(structured(&report)?["found"], false);

    let bad = call(&client, "get_audit_artifact", json!({"type": "summary"})).await?;
    assert_eq!(bad.is_error, Some(true));

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn path_argument_overrides_the_configured_root() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let default_root = tmp.path().join("default");
    let other = tmp.path().join("other");
    std::fs::create_dir_all(&default_root)?;
    write(&other, ".audit/state.json", r#"{"workflow_kind":"audit"}"#)?;
    let client = start(&default_root, &tmp.path().join("knowledge")).await?;

    let result = call(
        &client,
        "project_status",
        json!({"path": other.to_string_lossy()}),
    )
    .await?;
    assert_eq!(structured(&result)?["workflows"][0]["workflow_kind"], "audit");

    let missing = call(
        &client,
        "project_status",
        json!({"path": tmp.path().join("nope").to_string_lossy()}),
    )
    .await?;
    assert_eq!(missing.is_error, Some(true));
    assert_eq!(structured(&missing)?["error"]["code"], "invalid_request");

    client.cancel().await?;
    Ok(())
}

#[tokio::test]
async fn knowledge_reads_stay_inside_the_base() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().join("project");
    std::fs::create_dir_all(&root)?;
    let knowledge = tmp.path().join("knowledge");
    seed_knowledge(&knowledge)?;
    write(tmp.path(), "secret.txt", "top secret")?;
    let client = start(&root, &knowledge).await?;

    let listing = call(&client, "list_knowledge", json!({})).await?;
    let bases = &structured(&listing)?["knowledge_bases"];
    assert_eq!(bases[0]["id"], "security");
    assert_eq!(bases[0]["version"], "1.0.0");
    assert_eq!(bases[0]["files"], json!(["access-control.md", "index.md"]));

    let index = call(
        &client,
        "read_knowledge",
        json!({"knowledge_base_id": "security"}),
    )
    .await?;
    assert_eq!(
        structured(&index)?["file"]["content"],
        "# Security patterns\n"
    );

    for path in ["../../secret.txt", "/etc/passwd"] {
        let escaped = call(
            &client,
            "read_knowledge",
            json!({"knowledge_base_id": "security", "relative_path": path}),
        )
        .await?;
        assert_eq!(escaped.is_error, Some(true), "{path}");
        assert_eq!(structured(&escaped)?["error"]["code"], "invalid_request");
        assert!(!text(&escaped)?.contains("top secret"));
    }

    let unknown = call(
        &client,
        "read_knowledge",
        json!({"knowledge_base_id": "../project"}),
    )
    .await?;
    assert_eq!(unknown.is_error, Some(true));
    assert!(text(&unknown)?.contains("next: list_knowledge"));

    client.cancel().await?;
    Ok(())
}
