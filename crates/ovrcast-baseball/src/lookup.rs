// Single-player lookup.

use ovrcast_core::parse::join_key;
use serde::Serialize;

use crate::evaluation::{evaluate, PlayerReport};
use crate::reconcile::MarketBook;
use crate::stats::SeasonStats;

/// How a query name is compared against record names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatch {
    /// Byte-for-byte after trimming the query.
    Exact,
    /// Case-insensitive, the same rule as cross-source joins.
    #[default]
    CaseInsensitive,
}

impl NameMatch {
    fn matches(&self, record_name: &str, query: &str) -> bool {
        match self {
            NameMatch::Exact => record_name == query.trim(),
            NameMatch::CaseInsensitive => join_key(record_name) == join_key(query),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    NotFound {
        query: String,
    },
    /// One report per matching row, batters first. A name present in both
    /// tables yields two independent reports.
    Found {
        query: String,
        reports: Vec<PlayerReport>,
    },
}

impl LookupOutcome {
    pub fn query(&self) -> &str {
        match self {
            LookupOutcome::NotFound { query } | LookupOutcome::Found { query, .. } => query,
        }
    }

    pub fn reports(&self) -> &[PlayerReport] {
        match self {
            LookupOutcome::NotFound { .. } => &[],
            LookupOutcome::Found { reports, .. } => reports,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found { .. })
    }
}

/// Evaluate every record whose name matches `name`.
pub fn lookup(name: &str, season: &SeasonStats, book: &MarketBook, mode: NameMatch) -> LookupOutcome {
    let query = name.trim().to_string();
    let reports: Vec<PlayerReport> = season
        .records()
        .filter(|r| mode.matches(&r.name, name))
        .map(|r| evaluate(r, book))
        .collect();

    if reports.is_empty() {
        LookupOutcome::NotFound { query }
    } else {
        LookupOutcome::Found { query, reports }
    }
}

/// Look up several names, one outcome per name in input order. Blank names
/// are ignored.
pub fn lookup_many<'a, I>(names: I, season: &SeasonStats, book: &MarketBook, mode: NameMatch) -> Vec<LookupOutcome>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .map(|n| lookup(n, season, book, mode))
        .collect()
}
