//! Case-sensitive full-text search over generated artifacts.
//!
//! Categories (`documents`, `decisions`, `audit`) are disjoint, so any scoped
//! result set is a subset of the `all` result set.

mod engine;
mod error;
mod scope;

pub use engine::{
    LineMatch, SearchEngine, SearchHit, SearchOptions, SearchOutcome, MAX_RESULTS_LIMIT,
};
pub use error::{Result, SearchError};
pub use scope::SearchScope;
