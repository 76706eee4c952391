// Batch ranking: eligibility filter, per-record evaluation, stable sort by
// liquidation value, truncation.

use serde::Serialize;
use tracing::info;

use crate::evaluation::{evaluate, PlayerReport};
use crate::reconcile::MarketBook;
use crate::stats::{Archetype, PlayerRecord, SeasonStats};

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

/// Minimum sample sizes. A record must strictly exceed its archetype's
/// threshold; equal is excluded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eligibility {
    pub min_pa: f64,
    pub min_ip: f64,
}

impl Eligibility {
    /// One threshold for both archetypes.
    pub fn uniform(min_volume: f64) -> Self {
        Self {
            min_pa: min_volume,
            min_ip: min_volume,
        }
    }

    pub fn threshold(&self, archetype: Archetype) -> f64 {
        match archetype {
            Archetype::Batter => self.min_pa,
            Archetype::Pitcher => self.min_ip,
        }
    }

    pub fn admits(&self, record: &PlayerRecord) -> bool {
        record.eligibility > self.threshold(record.archetype)
    }
}

// ---------------------------------------------------------------------------
// Ranked output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based position in the leaderboard.
    pub rank: usize,
    pub name: String,
    pub team: String,
    pub archetype: Archetype,
    pub final_tier: u32,
    pub value: u32,
}

impl RankedEntry {
    fn from_report(rank: usize, report: PlayerReport) -> Self {
        Self {
            rank,
            name: report.name,
            team: report.team,
            archetype: report.archetype,
            final_tier: report.rating.final_tier,
            value: report.value,
        }
    }
}

/// Rank records by liquidation value, descending.
///
/// Records are taken in iteration order; ties keep that order (the sort is
/// stable), so callers pass batters before pitchers.
pub fn rank<'a, I>(records: I, book: &MarketBook, eligibility: &Eligibility, limit: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut considered = 0usize;
    let mut reports: Vec<PlayerReport> = records
        .into_iter()
        .inspect(|_| considered += 1)
        .filter(|r| eligibility.admits(r))
        .map(|r| evaluate(r, book))
        .collect();

    let eligible = reports.len();
    reports.sort_by(|a, b| b.value.cmp(&a.value));
    reports.truncate(limit);

    info!(
        considered,
        eligible,
        returned = reports.len(),
        "ranked players"
    );

    reports
        .into_iter()
        .enumerate()
        .map(|(i, report)| RankedEntry::from_report(i + 1, report))
        .collect()
}

/// Rank a whole season: batters, then pitchers, then sort.
pub fn rank_season(
    season: &SeasonStats,
    book: &MarketBook,
    eligibility: &Eligibility,
    limit: usize,
) -> Vec<RankedEntry> {
    rank(season.records(), book, eligibility, limit)
}
