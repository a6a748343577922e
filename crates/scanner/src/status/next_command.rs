use super::strategy::{Completion, PhaseState};
use Completion::{Complete, InProgress, NotStarted};

/// Matches any phase in a [`NextCommandRow`].
pub const ANY_PHASE: &str = "*";

#[derive(Debug, Clone, Copy)]
pub struct NextCommandRow {
    pub kind: &'static str,
    pub phase: &'static str,
    pub completion: Completion,
    pub command: &'static str,
}

const fn row(
    kind: &'static str,
    phase: &'static str,
    completion: Completion,
    command: &'static str,
) -> NextCommandRow {
    NextCommandRow {
        kind,
        phase,
        completion,
        command,
    }
}

/// Next-step instructions keyed by `(kind, phase, completion)`.
///
/// Exact phase rows are listed before the `*` row of the same kind and completion.
#[rustfmt::skip]
pub const NEXT_COMMANDS: &[NextCommandRow] = &[
    row("docs", "*", NotStarted, "docs start: begin with the survey phase"),
    row("docs", "survey", InProgress, "docs continue --phase survey: finish the codebase survey"),
    row("docs", "survey", Complete, "docs continue --phase interview: start the interview"),
    row("docs", "interview", InProgress, "docs continue --phase interview: answer the open questions"),
    row("docs", "interview", Complete, "docs continue --phase synthesis: synthesize interview notes"),
    row("docs", "synthesis", InProgress, "docs continue --phase synthesis: finish the synthesis"),
    row("docs", "synthesis", Complete, "docs continue --phase drafting: draft the documents"),
    row("docs", "drafting", InProgress, "docs continue --phase drafting: finish the remaining drafts"),
    row("docs", "drafting", Complete, "docs continue --phase review: review the drafts"),
    row("docs", "review", InProgress, "docs continue --phase review: resolve review comments"),
    row("docs", "*", Complete, "docs refresh: regenerate documents after code changes"),
    row("audit", "*", NotStarted, "audit start: begin reconnaissance"),
    row("audit", "reconnaissance", InProgress, "audit continue --phase reconnaissance: map the attack surface"),
    row("audit", "reconnaissance", Complete, "audit continue --phase analysis: analyze each subsystem"),
    row("audit", "analysis", InProgress, "audit continue --phase analysis: finish the remaining subsystems"),
    row("audit", "analysis", Complete, "audit continue --phase findings: consolidate findings"),
    row("audit", "findings", InProgress, "audit continue --phase findings: finish writing findings"),
    row("audit", "findings", Complete, "audit continue --phase verification: verify findings"),
    row("audit", "verification", InProgress, "audit continue --phase verification: verify the remaining findings"),
    row("audit", "verification", Complete, "audit continue --phase report: write the audit report"),
    row("audit", "report", InProgress, "audit continue --phase report: finish the audit report"),
    row("audit", "*", Complete, "audit fix: address unresolved findings, then re-run the audit"),
    row("verify", "*", NotStarted, "verify start: plan the verification harness"),
    row("verify", "planning", InProgress, "verify continue --phase planning: finish the plan"),
    row("verify", "planning", Complete, "verify continue --phase harness: generate the harness"),
    row("verify", "harness", InProgress, "verify continue --phase harness: finish the harness"),
    row("verify", "harness", Complete, "verify continue --phase properties: write properties"),
    row("verify", "properties", InProgress, "verify continue --phase properties: finish the properties"),
    row("verify", "properties", Complete, "verify continue --phase execution: run the harness"),
    row("verify", "execution", InProgress, "verify continue --phase execution: wait for the run to finish"),
    row("verify", "execution", Complete, "verify continue --phase triage: triage failures"),
    row("verify", "triage", InProgress, "verify continue --phase triage: triage the remaining failures"),
    row("verify", "*", Complete, "verify rerun: re-run after fixes land"),
];

/// Look up the next instruction. Kinds or keys absent from the table yield `None`.
pub fn next_command(kind: &str, phase: &str, completion: Completion) -> Option<&'static str> {
    let mut wildcard = None;
    for row in NEXT_COMMANDS
        .iter()
        .filter(|row| row.kind == kind && row.completion == completion)
    {
        if row.phase == phase {
            return Some(row.command);
        }
        if row.phase == ANY_PHASE && wildcard.is_none() {
            wildcard = Some(row.command);
        }
    }
    wildcard
}

/// Completion used for the table lookup: the state of the current phase itself.
///
/// A workflow is `InProgress` overall while its current phase is already `Complete`
/// (e.g. `survey` done, nothing started after it).
pub fn lookup_completion(
    overall: Completion,
    current_phase_state: Option<PhaseState>,
) -> Completion {
    match (overall, current_phase_state) {
        (Completion::Complete, _) => Completion::Complete,
        (_, Some(PhaseState::InProgress)) => Completion::InProgress,
        (_, Some(PhaseState::Complete)) => Completion::Complete,
        _ => Completion::NotStarted,
    }
}
