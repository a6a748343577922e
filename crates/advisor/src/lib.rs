//! # Lens Advisor
//!
//! Suggests the next action for a project. Facts are gathered once
//! ([`ProjectFacts::gather`]), then every rule in [`RULES`] runs independently;
//! results are stably sorted by [`Priority`].

mod error;
mod facts;
mod rules;

pub use error::{AdvisorError, Result};
pub use facts::ProjectFacts;
pub use lens_protocol::Priority;
pub use rules::{
    count_unresolved, nothing_to_do, severity_markers, Rule, RuleContext, Suggestion,
    NOTHING_TO_DO, RULES, SEVERITY_MARKERS, UNRESOLVED_PATTERNS,
};

use chrono::Duration;
use lens_scanner::{ProjectLayout, StatusRegistry, DEFAULT_STALE_DAYS};

#[derive(Debug, Clone, Copy)]
pub struct Advisor {
    context: RuleContext,
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_DAYS)
    }
}

impl Advisor {
    pub fn new(stale_days: u64) -> Self {
        let days = i64::try_from(stale_days).unwrap_or(i64::MAX);
        Self {
            context: RuleContext {
                stale_after: Duration::try_days(days).unwrap_or(Duration::MAX),
            },
        }
    }

    /// Evaluate every rule; never empty.
    pub fn evaluate(&self, facts: &ProjectFacts) -> Vec<Suggestion> {
        let mut suggestions: Vec<Suggestion> = RULES
            .iter()
            .flat_map(|(name, rule)| {
                let fired = rule(&self.context, facts);
                if !fired.is_empty() {
                    log::debug!("rule {name} fired {} suggestion(s)", fired.len());
                }
                fired
            })
            .collect();
        suggestions.sort_by_key(|s| s.priority);
        if suggestions.is_empty() {
            suggestions.push(nothing_to_do());
        }
        suggestions
    }

    pub fn suggest(
        &self,
        layout: &ProjectLayout,
        registry: &StatusRegistry,
    ) -> Result<Vec<Suggestion>> {
        let facts = ProjectFacts::gather(layout, registry)?;
        Ok(self.evaluate(&facts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn suggest(root: &Path) -> Vec<Suggestion> {
        Advisor::default()
            .suggest(&ProjectLayout::new(root), &StatusRegistry::builtin())
            .unwrap()
    }

    #[test]
    fn critical_findings_come_first() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(
            root,
            ".audit/report.md",
            "# Audit\n- CRITICAL: reentrancy in withdraw (unresolved)\n- CRITICAL: unchecked mint\n",
        );
        fs::create_dir_all(root.join("src")).unwrap();

        let suggestions = suggest(root);
        assert_eq!(suggestions[0].rule, "unresolved_audit_findings");
        assert_eq!(suggestions[0].priority, Priority::Critical);
        assert!(suggestions[0].message.contains("1 unresolved"));
        assert_eq!(suggestions[1].rule, "undocumented_source");
        assert_eq!(suggestions[1].priority, Priority::High);
    }

    #[test]
    fn high_markers_only_yield_high_priority() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), ".audit/report.md", "HIGH: overflow, not fixed\n");
        let suggestions = suggest(tmp.path());
        assert_eq!(suggestions[0].priority, Priority::High);
    }

    #[test]
    fn resolved_report_does_not_fire() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), ".audit/report.md", "CRITICAL: fixed in abc123\n");
        let suggestions = suggest(tmp.path());
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].rule, NOTHING_TO_DO);
    }

    #[test]
    fn empty_project_has_nothing_to_do() {
        let tmp = tempfile::tempdir().unwrap();
        let suggestions = suggest(tmp.path());
        assert_eq!(suggestions, vec![nothing_to_do()]);
    }

    #[test]
    fn archives_without_active_run_and_missing_decisions() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join(".docs/archive/run-1")).unwrap();
        write(root, "docs/guide.md", "# Guide\n");
        let rules: Vec<&str> = suggest(root).iter().map(|s| s.rule).collect();
        assert_eq!(rules, vec!["archived_without_current_run", "missing_decisions"]);
    }

    #[test]
    fn in_progress_workflow_suggests_resuming() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            ".docs/state.json",
            r#"{"workflow":"docs","phases":{"survey":"complete","interview":"in_progress"}}"#,
        );
        let suggestions = suggest(tmp.path());
        assert_eq!(suggestions[0].rule, "resume_workflow");
        assert_eq!(
            suggestions[0].command.as_deref(),
            Some("docs continue --phase interview: answer the open questions")
        );
    }

    fn facts_with_lag(days: i64) -> ProjectFacts {
        let doc_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ProjectFacts {
            document_count: 1,
            decision_count: 1,
            newest_document: Some(doc_time),
            latest_workflow_update: Some(doc_time + Duration::days(days)),
            ..ProjectFacts::default()
        }
    }

    #[test]
    fn staleness_uses_threshold() {
        let advisor = Advisor::new(7);
        assert_eq!(advisor.evaluate(&facts_with_lag(7))[0].rule, NOTHING_TO_DO);
        let stale = advisor.evaluate(&facts_with_lag(10));
        assert_eq!(stale[0].rule, "stale_documentation");
        assert_eq!(stale[0].priority, Priority::Medium);
        assert!(stale[0].reason.contains("10 day(s)"));

        assert_eq!(
            Advisor::new(30).evaluate(&facts_with_lag(10))[0].rule,
            NOTHING_TO_DO
        );
    }

    #[test]
    fn suggestions_are_sorted_by_priority() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "docs/guide.md", "# Guide\n");
        write(root, ".audit/report.md", "HIGH: open issue in parser\n");
        let suggestions = suggest(root);
        let priorities: Vec<Priority> = suggestions.iter().map(|s| s.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(suggestions.last().unwrap().rule, "missing_decisions");
    }

    #[test]
    fn repeated_calls_are_identical() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), ".audit/report.md", "CRITICAL unresolved\n");
        let first = serde_json::to_string(&suggest(tmp.path())).unwrap();
        let second = serde_json::to_string(&suggest(tmp.path())).unwrap();
        assert_eq!(first, second);
    }
}
