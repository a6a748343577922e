use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which artifact categories a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    Documents,
    Audit,
    Decisions,
    #[default]
    All,
}

impl SearchScope {
    /// The concrete categories, in result order.
    pub const CATEGORIES: [SearchScope; 3] = [
        SearchScope::Audit,
        SearchScope::Decisions,
        SearchScope::Documents,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchScope::Documents => "documents",
            SearchScope::Audit => "audit",
            SearchScope::Decisions => "decisions",
            SearchScope::All => "all",
        }
    }

    pub fn categories(self) -> Vec<SearchScope> {
        match self {
            SearchScope::All => Self::CATEGORIES.to_vec(),
            scope => vec![scope],
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "documents" | "docs" => Ok(SearchScope::Documents),
            "audit" => Ok(SearchScope::Audit),
            "decisions" => Ok(SearchScope::Decisions),
            "all" | "" => Ok(SearchScope::All),
            other => Err(format!(
                "unknown scope '{other}' (expected documents, audit, decisions, or all)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scopes_leniently() {
        assert_eq!("Docs".parse::<SearchScope>(), Ok(SearchScope::Documents));
        assert_eq!(" audit ".parse::<SearchScope>(), Ok(SearchScope::Audit));
        assert_eq!("".parse::<SearchScope>(), Ok(SearchScope::All));
        assert!("code".parse::<SearchScope>().is_err());
    }

    #[test]
    fn all_expands_to_every_category() {
        assert_eq!(SearchScope::All.categories().len(), 3);
        assert_eq!(SearchScope::Decisions.categories(), vec![SearchScope::Decisions]);
    }
}
