use lens_scanner::NormalizedStatus;
use rmcp::schemars;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ProjectStatusRequest {
    /// Project directory path
    #[schemars(
        description = "Project directory path (default: LENS_ROOT/LENS_PROJECT_ROOT, else the server's working directory)"
    )]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectStatusResult {
    pub root: String,
    pub workflows: Vec<NormalizedStatus>,
    pub archived_runs: usize,
}
