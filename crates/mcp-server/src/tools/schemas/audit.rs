use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct GetAuditArtifactRequest {
    /// Artifact type
    #[serde(rename = "type")]
    #[schemars(description = "Artifact type: report (default), findings, subsystem, state, or list")]
    pub artifact_type: Option<String>,

    /// Subsystem name (for type=subsystem)
    #[schemars(description = "Subsystem name for type=subsystem; omit to list subsystems")]
    pub subsystem: Option<String>,

    /// Severity keyword filter
    #[schemars(
        description = "Keep only findings/subsystem files mentioning this severity keyword (case-insensitive), e.g. critical, high"
    )]
    pub severity: Option<String>,

    /// Archived audit id
    #[schemars(description = "Archived audit id (default: the current audit run)")]
    pub audit: Option<String>,

    /// Project directory path
    #[schemars(description = "Project directory path (defaults to the configured root)")]
    pub path: Option<String>,
}
