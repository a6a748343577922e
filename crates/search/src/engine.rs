use crate::error::{Result, SearchError};
use crate::scope::SearchScope;
use lens_scanner::ProjectLayout;
use lens_store::{AuditStore, DocumentStore};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

pub const MAX_RESULTS_LIMIT: usize = 500;
const MAX_MATCHES_PER_HIT: usize = 5;
const MAX_LINE_CHARS: usize = 240;

/// Defaults: scope `all`, literal match, every matching artifact returned.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub scope: SearchScope,
    pub regex: bool,
    /// Cap on returned hits; `None` returns all of them.
    pub max_results: Option<usize>,
}

impl SearchOptions {
    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_regex(mut self, regex: bool) -> Self {
        self.regex = regex;
        self
    }

    /// Clamped to `1..=MAX_RESULTS_LIMIT`.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results.clamp(1, MAX_RESULTS_LIMIT));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMatch {
    pub line: usize,
    pub text: String,
}

/// One matching artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub scope: SearchScope,
    pub name: String,
    pub path: String,
    pub line: usize,
    pub context: String,
    pub occurrences: usize,
    pub matches: Vec<LineMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub scope: SearchScope,
    pub regex: bool,
    pub hits: Vec<SearchHit>,
    pub total_hits: usize,
    pub truncated: bool,
}

struct Candidate {
    scope: SearchScope,
    name: String,
    path: String,
    content: String,
}

enum Matcher {
    Literal(String),
    Pattern(Regex),
}

impl Matcher {
    fn new(query: &str, regex: bool) -> Result<Self> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if regex {
            // `^`/`$` keep their per-line meaning over whole-file content.
            let pattern = RegexBuilder::new(query).multi_line(true).build()?;
            Ok(Matcher::Pattern(pattern))
        } else {
            Ok(Matcher::Literal(query.to_string()))
        }
    }

    /// Byte offsets where a match starts, in order.
    fn match_starts(&self, content: &str) -> Vec<usize> {
        match self {
            Matcher::Literal(needle) => content
                .match_indices(needle.as_str())
                .map(|(start, _)| start)
                .collect(),
            Matcher::Pattern(re) => re.find_iter(content).map(|m| m.start()).collect(),
        }
    }
}

/// Case-sensitive search over the text artifacts of one project.
pub struct SearchEngine {
    layout: ProjectLayout,
}

impl SearchEngine {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchOutcome> {
        let matcher = Matcher::new(query, options.regex)?;

        let mut hits = Vec::new();
        for category in options.scope.categories() {
            for candidate in self.candidates(category)? {
                if let Some(hit) = match_candidate(&matcher, candidate) {
                    hits.push(hit);
                }
            }
        }
        hits.sort_by(|a, b| {
            a.scope
                .as_str()
                .cmp(b.scope.as_str())
                .then_with(|| a.path.cmp(&b.path))
        });

        let total_hits = hits.len();
        let truncated = match options.max_results {
            Some(cap) => {
                let cap = cap.clamp(1, MAX_RESULTS_LIMIT);
                hits.truncate(cap);
                total_hits > cap
            }
            None => false,
        };
        log::debug!(
            "search {:?} in {}: {total_hits} hit(s)",
            query,
            options.scope
        );
        Ok(SearchOutcome {
            query: query.to_string(),
            scope: options.scope,
            regex: options.regex,
            hits,
            total_hits,
            truncated,
        })
    }

    fn candidates(&self, category: SearchScope) -> Result<Vec<Candidate>> {
        let documents = |store: DocumentStore| -> Result<Vec<Candidate>> {
            Ok(store
                .list()?
                .into_iter()
                .map(|doc| Candidate {
                    scope: category,
                    name: doc.name,
                    path: doc.path,
                    content: doc.content,
                })
                .collect())
        };
        match category {
            SearchScope::Documents => documents(DocumentStore::documents(&self.layout)),
            SearchScope::Decisions => documents(DocumentStore::decisions(&self.layout)),
            SearchScope::Audit => Ok(AuditStore::new(&self.layout)
                .current_files()?
                .into_iter()
                .map(|file| Candidate {
                    scope: category,
                    name: file.name,
                    path: file.path,
                    content: file.content.unwrap_or_default(),
                })
                .collect()),
            SearchScope::All => Ok(Vec::new()),
        }
    }
}

/// Matches run over the whole content, so a query may span lines. Each match is
/// attributed to the line it starts on.
fn match_candidate(matcher: &Matcher, candidate: Candidate) -> Option<SearchHit> {
    let content = candidate.content.as_str();
    let mut matches = Vec::new();
    let mut occurrences = 0usize;
    let mut line = 1usize;
    let mut scanned = 0usize;
    let mut last_line = 0usize;
    for start in matcher.match_starts(content) {
        line += content[scanned..start].matches('\n').count();
        scanned = start;
        if line == last_line {
            continue;
        }
        last_line = line;
        occurrences += 1;
        if matches.len() < MAX_MATCHES_PER_HIT {
            matches.push(LineMatch {
                line,
                text: clip(line_at(content, start).trim_end()),
            });
        }
    }
    let first = matches.first()?.clone();
    Some(SearchHit {
        scope: candidate.scope,
        name: candidate.name,
        path: candidate.path,
        line: first.line,
        context: first.text,
        occurrences,
        matches,
    })
}

/// The full line containing byte offset `at`.
fn line_at(content: &str, at: usize) -> &str {
    let begin = content[..at].rfind('\n').map_or(0, |idx| idx + 1);
    let end = content[at..].find('\n').map_or(content.len(), |idx| at + idx);
    &content[begin..end]
}

fn clip(line: &str) -> String {
    if line.chars().count() <= MAX_LINE_CHARS {
        return line.to_string();
    }
    let mut out: String = line.chars().take(MAX_LINE_CHARS).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> (tempfile::TempDir, SearchEngine) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(
            root,
            "docs/architecture.md",
            "# Architecture\n\nThe token_program owns mint authority.   \nSee below.\n",
        );
        write(root, "docs/overview.md", "# Overview\nNothing relevant.\n");
        write(
            root,
            "docs/decisions/0001-token.md",
            "# Token design\ntoken_program is upgradeable\n",
        );
        write(
            root,
            ".audit/report.md",
            "token_program: CRITICAL\nsecond token_program line\n",
        );
        write(root, ".audit/archive/old/report.md", "token_program archived\n");
        let engine = SearchEngine::new(ProjectLayout::new(root));
        (tmp, engine)
    }

    #[test]
    fn documents_scope_finds_single_hit_with_context() {
        let (_tmp, engine) = fixture();
        let outcome = engine
            .search(
                "token_program",
                &SearchOptions::default().with_scope(SearchScope::Documents),
            )
            .unwrap();
        assert_eq!(outcome.hits.len(), 1);
        let hit = &outcome.hits[0];
        assert_eq!(hit.name, "architecture");
        assert_eq!(hit.path, "docs/architecture.md");
        assert_eq!(hit.line, 3);
        assert_eq!(hit.context, "The token_program owns mint authority.");
        assert_eq!(hit.occurrences, 1);
    }

    #[test]
    fn no_match_is_empty() {
        let (_tmp, engine) = fixture();
        let outcome = engine
            .search("nonexistent_xyz", &SearchOptions::default())
            .unwrap();
        assert!(outcome.hits.is_empty());
        assert!(!outcome.truncated);
    }

    #[test]
    fn all_scope_is_sorted_and_skips_archives() {
        let (_tmp, engine) = fixture();
        let outcome = engine
            .search("token_program", &SearchOptions::default())
            .unwrap();
        let keys: Vec<(&str, &str)> = outcome
            .hits
            .iter()
            .map(|h| (h.scope.as_str(), h.path.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("audit", ".audit/report.md"),
                ("decisions", "docs/decisions/0001-token.md"),
                ("documents", "docs/architecture.md"),
            ]
        );
        assert_eq!(outcome.hits[0].occurrences, 2);
        assert_eq!(outcome.hits[0].matches.len(), 2);
    }

    #[test]
    fn match_is_case_sensitive() {
        let (_tmp, engine) = fixture();
        let outcome = engine
            .search("TOKEN_PROGRAM", &SearchOptions::default())
            .unwrap();
        assert!(outcome.hits.is_empty());
    }

    #[test]
    fn blank_query_is_rejected() {
        let (_tmp, engine) = fixture();
        for query in ["", "   ", "\t\n"] {
            assert!(matches!(
                engine.search(query, &SearchOptions::default()),
                Err(SearchError::EmptyQuery)
            ));
        }
    }

    #[test]
    fn regex_mode_and_invalid_pattern() {
        let (_tmp, engine) = fixture();
        let outcome = engine
            .search(
                r"CRITICAL|upgrade\w+",
                &SearchOptions::default().with_regex(true),
            )
            .unwrap();
        assert_eq!(outcome.hits.len(), 2);
        assert!(matches!(
            engine.search("(", &SearchOptions::default().with_regex(true)),
            Err(SearchError::InvalidPattern(_))
        ));
    }

    #[test]
    fn max_results_truncates() {
        let (_tmp, engine) = fixture();
        let outcome = engine
            .search("token_program", &SearchOptions::default().with_max_results(1))
            .unwrap();
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.total_hits, 3);
        assert!(outcome.truncated);
        assert_eq!(SearchOptions::default().with_max_results(0).max_results, Some(1));
        assert_eq!(
            SearchOptions::default().with_max_results(10_000).max_results,
            Some(MAX_RESULTS_LIMIT)
        );
    }

    #[test]
    fn default_options_return_every_category() {
        let tmp = tempfile::tempdir().unwrap();
        for idx in 0..60 {
            write(tmp.path(), &format!(".audit/findings/f{idx:02}.md"), "x marks it\n");
        }
        write(tmp.path(), "docs/a.md", "x here too\n");
        let engine = SearchEngine::new(ProjectLayout::new(tmp.path()));

        let all = engine.search("x", &SearchOptions::default()).unwrap();
        assert_eq!(all.hits.len(), 61);
        assert_eq!(all.total_hits, 61);
        assert!(!all.truncated);

        let documents = engine
            .search("x", &SearchOptions::default().with_scope(SearchScope::Documents))
            .unwrap();
        assert_eq!(documents.hits.len(), 1);
        assert!(all.hits.contains(&documents.hits[0]));
    }

    #[test]
    fn query_may_span_lines() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "docs/a.md", "intro\nline1\nline2\nline1\n");
        let engine = SearchEngine::new(ProjectLayout::new(tmp.path()));

        let outcome = engine
            .search("line1\nline2", &SearchOptions::default())
            .unwrap();
        assert_eq!(outcome.hits.len(), 1);
        let hit = &outcome.hits[0];
        assert_eq!(hit.line, 2);
        assert_eq!(hit.context, "line1");
        assert_eq!(hit.occurrences, 1);

        let repeated = engine.search("line1", &SearchOptions::default()).unwrap();
        let lines: Vec<usize> = repeated.hits[0].matches.iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![2, 4]);
        assert_eq!(repeated.hits[0].occurrences, 2);
    }

    #[test]
    fn regex_anchors_match_per_line() {
        let (_tmp, engine) = fixture();
        let outcome = engine
            .search("^second", &SearchOptions::default().with_regex(true))
            .unwrap();
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.hits[0].line, 2);
    }

    #[test]
    fn missing_project_has_no_hits() {
        let tmp = tempfile::tempdir().unwrap();
        let engine = SearchEngine::new(ProjectLayout::new(tmp.path().join("gone")));
        let outcome = engine.search("anything", &SearchOptions::default()).unwrap();
        assert!(outcome.hits.is_empty());
    }

    proptest! {
        #[test]
        fn proptest_scoped_results_are_subset_of_all(
            needle in prop_oneof![
                Just("token_program".to_string()),
                Just("CRITICAL".to_string()),
                Just("#".to_string()),
                "[a-z]{1,4}",
            ],
        ) {
            let (_tmp, engine) = fixture();
            let options = SearchOptions::default();
            let all = engine.search(&needle, &options).unwrap();
            for scope in SearchScope::CATEGORIES {
                let scoped = engine.search(&needle, &options.clone().with_scope(scope)).unwrap();
                for hit in &scoped.hits {
                    prop_assert!(all.hits.contains(hit), "{:?} missing from all", hit.path);
                }
            }
        }
    }
}
