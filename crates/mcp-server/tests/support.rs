#![allow(dead_code)]

use anyhow::{Context, Result};
use rmcp::model::{CallToolRequestParam, CallToolResult};
use rmcp::service::{RoleClient, RunningService, ServiceExt};
use rmcp::transport::TokioChildProcess;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

pub type Client = RunningService<RoleClient, ()>;

pub fn locate_lens_mcp_bin() -> Result<PathBuf> {
    if let Some(path) = option_env!("CARGO_BIN_EXE_lens-mcp") {
        return Ok(PathBuf::from(path));
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(target_profile_dir) = exe.parent().and_then(|p| p.parent()) {
            let candidate = target_profile_dir.join("lens-mcp");
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir
        .ancestors()
        .nth(2)
        .context("failed to resolve repo root from CARGO_MANIFEST_DIR")?;
    for rel in ["target/debug/lens-mcp", "target/release/lens-mcp"] {
        let candidate = repo_root.join(rel);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("failed to locate lens-mcp binary; build with: cargo build -p lens-mcp")
}

/// Start the server with `root` as its project root and `knowledge` as its knowledge dir.
pub async fn start(root: &Path, knowledge: &Path) -> Result<Client> {
    let bin = locate_lens_mcp_bin()?;
    let mut cmd = Command::new(bin);
    cmd.env("LENS_ROOT", root);
    cmd.env("LENS_KNOWLEDGE_DIR", knowledge);
    cmd.env_remove("LENS_PROJECT_ROOT");
    cmd.env_remove("LENS_CONFIG");
    cmd.env_remove("LENS_STALE_DAYS");
    cmd.env("RUST_LOG", "warn");

    let transport = TokioChildProcess::new(cmd).context("spawn mcp server")?;
    let service = tokio::time::timeout(Duration::from_secs(10), ().serve(transport))
        .await
        .context("timeout starting MCP server")??;
    Ok(service)
}

pub async fn call(client: &Client, tool: &str, args: serde_json::Value) -> Result<CallToolResult> {
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        client.call_tool(CallToolRequestParam {
            name: tool.to_string().into(),
            arguments: args.as_object().cloned(),
        }),
    )
    .await
    .with_context(|| format!("timeout calling {tool}"))??;
    Ok(result)
}

pub fn text(result: &CallToolResult) -> Result<&str> {
    result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.as_str())
        .context("missing text output")
}

pub fn structured(result: &CallToolResult) -> Result<&serde_json::Value> {
    result
        .structured_content
        .as_ref()
        .context("missing structured content")
}

pub fn write(root: &Path, rel: &str, content: &str) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("mkdir {}", parent.display()))?;
    }
    std::fs::write(&path, content).with_context(|| format!("write {}", path.display()))
}
