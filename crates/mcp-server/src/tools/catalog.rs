use lens_protocol::TOOL_SURFACE_VERSION;

#[derive(Clone, Copy, Debug)]
pub(crate) struct ToolDescriptor {
    pub(crate) name: &'static str,
    pub(crate) summary: &'static str,
}

pub(crate) const TOOL_CATALOG: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "project_status",
        summary: "Workflows found in the project: phase, completion, next command.",
    },
    ToolDescriptor {
        name: "suggest_next_action",
        summary: "Priority-sorted next actions (best first call).",
    },
    ToolDescriptor {
        name: "get_document",
        summary: "One generated document by name, or the catalog when name is omitted.",
    },
    ToolDescriptor {
        name: "get_decisions",
        summary: "Decision records, optionally filtered by topic.",
    },
    ToolDescriptor {
        name: "get_audit_artifact",
        summary: "Audit report/findings/subsystem/state/list for the current or an archived audit.",
    },
    ToolDescriptor {
        name: "search",
        summary: "Case-sensitive search across documents, decisions, and audit files.",
    },
    ToolDescriptor {
        name: "list_knowledge",
        summary: "Bundled knowledge bases (metadata only).",
    },
    ToolDescriptor {
        name: "read_knowledge",
        summary: "One knowledge base file, or its index.",
    },
];

pub(crate) fn tool_instructions() -> String {
    let mut out = format!(
        "Artifact Lens (tool surface v{TOOL_SURFACE_VERSION}) reads the artifacts that documentation, audit, and verification workflows leave in a project. Every tool is read-only; pass `path` to target another project root.\n\nTools:\n"
    );
    for tool in TOOL_CATALOG {
        out.push_str(&format!("- {}: {}\n", tool.name, tool.summary));
    }
    out
}
