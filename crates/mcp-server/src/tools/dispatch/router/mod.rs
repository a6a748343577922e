// Per-tool dispatch functions used by the MCP tool router.

pub(super) mod audit;
pub(super) mod documents;
pub(super) mod error;
pub(super) mod knowledge;
pub(super) mod search;
pub(super) mod status;
pub(super) mod suggest;

mod tool_router;

pub(super) fn build_tool_router() -> rmcp::handler::server::tool::ToolRouter<super::ArtifactLensService>
{
    tool_router::build_tool_router()
}
