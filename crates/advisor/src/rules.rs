use crate::facts::ProjectFacts;
use chrono::Duration;
use lens_protocol::Priority;
use lens_scanner::Completion;
use serde::Serialize;

pub const SEVERITY_MARKERS: &[&str] = &["CRITICAL", "HIGH"];
pub const UNRESOLVED_PATTERNS: &[&str] = &["unresolved", "not fixed", "open issue", "status: open"];
pub const NOTHING_TO_DO: &str = "nothing_to_do";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub rule: &'static str,
    pub priority: Priority,
    pub message: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Suggestion {
    fn new(
        rule: &'static str,
        priority: Priority,
        message: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            priority,
            message: message.into(),
            reason: reason.into(),
            command: None,
        }
    }

    fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

/// A rule inspects facts and emits zero or more suggestions. Rules never see each other.
pub type Rule = fn(&RuleContext, &ProjectFacts) -> Vec<Suggestion>;

#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    pub stale_after: Duration,
}

/// Evaluation order. Ties in priority keep this order.
pub const RULES: &[(&str, Rule)] = &[
    ("unresolved_audit_findings", unresolved_audit_findings),
    ("undocumented_source", undocumented_source),
    ("stale_documentation", stale_documentation),
    ("archived_without_current_run", archived_without_current_run),
    ("resume_workflow", resume_workflow),
    ("missing_decisions", missing_decisions),
];

fn unresolved_audit_findings(_: &RuleContext, facts: &ProjectFacts) -> Vec<Suggestion> {
    let Some(report) = facts.audit_report.as_deref() else {
        return Vec::new();
    };
    let markers = severity_markers(report);
    let unresolved = count_unresolved(report);
    if unresolved == 0 || markers.iter().all(|(_, n)| *n == 0) {
        return Vec::new();
    }
    let critical = markers
        .iter()
        .find(|(marker, _)| *marker == "CRITICAL")
        .map_or(0, |(_, n)| *n);
    let high = markers
        .iter()
        .find(|(marker, _)| *marker == "HIGH")
        .map_or(0, |(_, n)| *n);
    let priority = if critical > 0 {
        Priority::Critical
    } else {
        Priority::High
    };
    vec![Suggestion::new(
        "unresolved_audit_findings",
        priority,
        format!("Address {unresolved} unresolved audit finding(s) before shipping"),
        format!(
            "The current audit report has {critical} CRITICAL and {high} HIGH marker(s) and {unresolved} unresolved mention(s)"
        ),
    )
    .with_command("audit fix: address unresolved findings, then re-run the audit")]
}

fn undocumented_source(_: &RuleContext, facts: &ProjectFacts) -> Vec<Suggestion> {
    if facts.source_dirs.is_empty() || facts.document_count > 0 {
        return Vec::new();
    }
    vec![Suggestion::new(
        "undocumented_source",
        Priority::High,
        "Generate documentation for this project",
        format!(
            "Source directories exist ({}) but no documents were found",
            facts.source_dirs.join(", ")
        ),
    )
    .with_command("docs start: begin with the survey phase")]
}

fn stale_documentation(ctx: &RuleContext, facts: &ProjectFacts) -> Vec<Suggestion> {
    let (Some(newest_doc), Some(latest_update)) =
        (facts.newest_document, facts.latest_workflow_update)
    else {
        return Vec::new();
    };
    if facts.document_count == 0 || latest_update - newest_doc <= ctx.stale_after {
        return Vec::new();
    }
    let lag_days = (latest_update - newest_doc).num_days();
    vec![Suggestion::new(
        "stale_documentation",
        Priority::Medium,
        "Refresh documentation to reflect recent workflow activity",
        format!(
            "The newest document is {lag_days} day(s) older than the latest workflow update (threshold {} day(s))",
            ctx.stale_after.num_days()
        ),
    )
    .with_command("docs refresh: regenerate documents after code changes")]
}

fn archived_without_current_run(_: &RuleContext, facts: &ProjectFacts) -> Vec<Suggestion> {
    if facts.archived_runs == 0 || !facts.workflows.is_empty() {
        return Vec::new();
    }
    vec![Suggestion::new(
        "archived_without_current_run",
        Priority::Medium,
        "Start a new workflow run",
        format!(
            "{} archived run(s) exist but no workflow is currently active",
            facts.archived_runs
        ),
    )]
}

fn resume_workflow(_: &RuleContext, facts: &ProjectFacts) -> Vec<Suggestion> {
    facts
        .workflows
        .iter()
        .filter(|status| status.completion == Completion::InProgress)
        .filter_map(|status| {
            let command = status.recommended_next_command.as_deref()?;
            Some(
                Suggestion::new(
                    "resume_workflow",
                    Priority::Medium,
                    format!(
                        "Resume the {} workflow at phase '{}'",
                        status.workflow_kind, status.current_phase
                    ),
                    format!("{} is in progress", status.state_file),
                )
                .with_command(command),
            )
        })
        .collect()
}

fn missing_decisions(_: &RuleContext, facts: &ProjectFacts) -> Vec<Suggestion> {
    if facts.document_count == 0 || facts.decision_count > 0 {
        return Vec::new();
    }
    vec![Suggestion::new(
        "missing_decisions",
        Priority::Info,
        "Record architecture decisions alongside the documentation",
        "Documents exist but no decision records were found",
    )]
}

/// Suggestion emitted when no rule fires.
pub fn nothing_to_do() -> Suggestion {
    Suggestion::new(
        NOTHING_TO_DO,
        Priority::Info,
        "Nothing to do: artifacts are up to date",
        "No rule matched the current project state",
    )
}

/// Upper-case marker tokens, counted as whole words.
pub fn severity_markers(text: &str) -> Vec<(&'static str, usize)> {
    SEVERITY_MARKERS
        .iter()
        .map(|marker| {
            let count = text
                .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .filter(|token| token == marker)
                .count();
            (*marker, count)
        })
        .collect()
}

/// Case-insensitive occurrences of every unresolved pattern.
pub fn count_unresolved(text: &str) -> usize {
    let lower = text.to_lowercase();
    UNRESOLVED_PATTERNS
        .iter()
        .map(|pattern| lower.matches(pattern).count())
        .sum()
}
