// Season statistics records and CSV loading.
//
// Reads FanGraphs-style exports (the column names pybaseball returns). The set
// of columns varies by export, so rows are read as name → text maps and every
// numeric cell is kept under its source column name. Cells that do not parse
// are left out of the record; the normalizer decides what absence means.

use ovrcast_core::parse::parse_stat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Player role. Each archetype has its own feature set and formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Batter,
    Pitcher,
}

impl Archetype {
    pub fn display_str(&self) -> &'static str {
        match self {
            Archetype::Batter => "Batter",
            Archetype::Pitcher => "Pitcher",
        }
    }

    /// Columns holding the eligibility counter: plate appearances for
    /// batters, innings pitched for pitchers.
    pub fn eligibility_columns(&self) -> &'static [&'static str] {
        match self {
            Archetype::Batter => &["PA"],
            Archetype::Pitcher => &["IP"],
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// Raw numeric fields keyed by source column name.
pub type RawStats = BTreeMap<String, f64>;

/// One season row for one player in one archetype.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub team: String,
    pub archetype: Archetype,
    /// Plate appearances or innings pitched. Only used for batch filtering.
    pub eligibility: f64,
    pub stats: RawStats,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, team: impl Into<String>, archetype: Archetype) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            archetype,
            eligibility: 0.0,
            stats: RawStats::new(),
        }
    }

    pub fn with_eligibility(mut self, eligibility: f64) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn with_stat(mut self, column: impl Into<String>, value: f64) -> Self {
        self.stats.insert(column.into(), value);
        self
    }
}

/// Both record sets for one season, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonStats {
    pub season: u16,
    pub batters: Vec<PlayerRecord>,
    pub pitchers: Vec<PlayerRecord>,
}

impl SeasonStats {
    /// All records, batters first, then pitchers.
    pub fn records(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.batters.iter().chain(self.pitchers.iter())
    }

    pub fn len(&self) -> usize {
        self.batters.len() + self.pitchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batters.is_empty() && self.pitchers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Column handling
// ---------------------------------------------------------------------------

const NAME_COLUMNS: &[&str] = &["Name", "PlayerName", "Player"];
const TEAM_COLUMNS: &[&str] = &["Team", "Tm"];

/// Identity and bookkeeping columns that are never statistics.
const NON_STAT_COLUMNS: &[&str] = &["Name", "PlayerName", "Player", "Team", "Tm", "Season", "IDfg", "playerid"];

fn first_text<'a>(row: &'a HashMap<String, String>, columns: &[&str]) -> Option<&'a str> {
    columns
        .iter()
        .filter_map(|c| row.get(*c))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

fn record_from_row(row: &HashMap<String, String>, archetype: Archetype) -> Option<PlayerRecord> {
    let name = first_text(row, NAME_COLUMNS)?;
    let team = first_text(row, TEAM_COLUMNS).unwrap_or_default();

    let mut stats = RawStats::new();
    for (column, cell) in row {
        let column = column.trim();
        if NON_STAT_COLUMNS.contains(&column) {
            continue;
        }
        if let Some(value) = parse_stat(cell) {
            stats.insert(column.to_string(), value);
        }
    }

    let eligibility = archetype
        .eligibility_columns()
        .iter()
        .find_map(|c| stats.get(*c).copied())
        .unwrap_or(0.0);

    Some(PlayerRecord {
        name: name.to_string(),
        team: team.to_string(),
        archetype,
        eligibility,
        stats,
    })
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Read records of one archetype in source order. Rows without a name are
/// skipped; malformed cells are dropped from the row, never the whole row.
pub fn load_records_from_reader<R: Read>(
    rdr: R,
    archetype: Archetype,
) -> Result<Vec<PlayerRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<HashMap<String, String>>() {
        match result {
            Ok(row) => match record_from_row(&row, archetype) {
                Some(record) => records.push(record),
                None => warn!("skipping {} row without a player name", archetype),
            },
            Err(e) => {
                warn!("skipping malformed {} row: {}", archetype, e);
            }
        }
    }
    Ok(records)
}

/// Load one archetype's records from a CSV export.
pub fn load_records(path: &Path, archetype: Archetype) -> Result<Vec<PlayerRecord>, StatsError> {
    let file = std::fs::File::open(path).map_err(|e| StatsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_records_from_reader(file, archetype).map_err(|e| StatsError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load a full season from a batting and a pitching export.
pub fn load_season(season: u16, batting: &Path, pitching: &Path) -> Result<SeasonStats, StatsError> {
    Ok(SeasonStats {
        season,
        batters: load_records(batting, Archetype::Batter)?,
        pitchers: load_records(pitching, Archetype::Pitcher)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
