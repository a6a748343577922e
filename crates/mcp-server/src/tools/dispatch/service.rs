use super::{router, ArtifactLensService};
use crate::tools::catalog;
use lens_scanner::{LensConfig, StatusRegistry};
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool_handler, ServerHandler};
use std::sync::Arc;

impl ArtifactLensService {
    pub fn new(config: LensConfig) -> Self {
        Self::with_registry(config, StatusRegistry::builtin())
    }

    /// Service with a custom workflow registry (additional kinds or strategies).
    pub fn with_registry(config: LensConfig, registry: StatusRegistry) -> Self {
        Self {
            tool_router: router::build_tool_router(),
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }
}

#[tool_handler]
impl ServerHandler for ArtifactLensService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(catalog::tool_instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
