//! Artifact Lens MCP Server
//!
//! Exposes workflow status, generated documents, audit artifacts, search, and
//! next-action suggestions to AI agents over the MCP protocol (stdio).
//!
//! ## Tools
//!
//! - `project_status` - Normalized status of every workflow found in the project
//! - `get_document` / `get_decisions` - Generated documents and decision records
//! - `get_audit_artifact` - Audit report, findings, subsystems, state, or file list
//! - `search` - Case-sensitive search across documents, decisions, and audit files
//! - `suggest_next_action` - Priority-sorted suggestions
//! - `list_knowledge` / `read_knowledge` - Bundled knowledge bases
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "artifact-lens": {
//!       "command": "lens-mcp"
//!     }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use lens_scanner::LensConfig;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

mod tools;

pub use tools::ArtifactLensService;

pub async fn main_entry() -> Result<()> {
    // stdout carries MCP frames
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = LensConfig::from_env(None).context("failed to resolve configuration")?;
    log::info!(
        "Starting Artifact Lens MCP server (root: {}, knowledge: {})",
        config.root().display(),
        config.knowledge_dir.display()
    );

    let service = ArtifactLensService::new(config);
    let server = service
        .serve(stdio())
        .await
        .context("failed to start MCP transport")?;

    server.waiting().await?;

    log::info!("Artifact Lens MCP server stopped");
    Ok(())
}
