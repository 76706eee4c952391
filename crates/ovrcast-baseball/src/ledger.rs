// Investment log and floor-value report.
//
// The log is owned by the caller and only ever appended to. Nothing in the
// rating pipeline reads it; the report is a separate read-side view that
// prices each holding at its card's liquidation floor.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use ovrcast_core::parse::parse_amount;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::lookup::NameMatch;
use crate::sources::Snapshot;
use crate::stats::Archetype;

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// One purchase: `quantity` cards of `player` at `unit_cost` stubs each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub player: String,
    pub quantity: u32,
    pub unit_cost: u32,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl Investment {
    /// An entry stamped with the current time.
    pub fn now(player: impl Into<String>, quantity: u32, unit_cost: u32) -> Self {
        Self {
            player: player.into(),
            quantity,
            unit_cost,
            recorded_at: Some(Utc::now()),
        }
    }
}

/// Append-only list of investments in recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestmentLog {
    entries: Vec<Investment>,
}

impl InvestmentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: Investment) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Investment] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("failed to read investment log {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in investment log {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Deserialize)]
struct RawInvestmentRow {
    #[serde(default)]
    player: String,
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    unit_cost: String,
    #[serde(default)]
    recorded_at: String,
}

fn investment_from_row(row: RawInvestmentRow) -> Option<Investment> {
    let player = row.player.trim();
    if player.is_empty() {
        return None;
    }
    let recorded_at = match row.recorded_at.trim() {
        "" => None,
        ts => Some(DateTime::parse_from_rfc3339(ts).ok()?.with_timezone(&Utc)),
    };
    Some(Investment {
        player: player.to_string(),
        quantity: parse_amount(&row.quantity)?,
        unit_cost: parse_amount(&row.unit_cost)?,
        recorded_at,
    })
}

/// Read a log from CSV with columns `player,quantity,unit_cost,recorded_at`.
/// `recorded_at` is optional RFC 3339. Rows that do not parse are skipped.
pub fn load_log_from_reader<R: Read>(rdr: R) -> Result<InvestmentLog, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(rdr);
    let mut log = InvestmentLog::new();
    for (i, result) in reader.deserialize::<RawInvestmentRow>().enumerate() {
        match result.map(investment_from_row) {
            Ok(Some(entry)) => log.append(entry),
            Ok(None) => warn!("skipping investment row {}: unparseable fields", i + 1),
            Err(e) => warn!("skipping malformed investment row {}: {}", i + 1, e),
        }
    }
    Ok(log)
}

pub fn load_log(path: &Path) -> Result<InvestmentLog, LedgerError> {
    let file = std::fs::File::open(path).map_err(|e| LedgerError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_log_from_reader(file).map_err(|e| LedgerError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Rating of a held player, when the player was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeldRating {
    pub archetype: Archetype,
    pub final_tier: u32,
    /// Liquidation value of one card.
    pub unit_value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestmentLine {
    pub player: String,
    pub quantity: u32,
    pub cost: u64,
    /// `None` when the player is not in the season stats.
    pub rating: Option<HeldRating>,
    pub floor_value: u64,
    /// `floor_value - cost`; negative when the floor is below what was paid.
    pub floor_margin: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestmentReport {
    pub lines: Vec<InvestmentLine>,
    pub total_cost: u64,
    pub total_floor_value: u64,
    pub total_floor_margin: i64,
    pub not_found: usize,
}

/// `floor - cost`, saturating at the `i64` bounds.
fn signed_margin(floor: u64, cost: u64) -> i64 {
    let diff = i128::from(floor) - i128::from(cost);
    i64::try_from(diff).unwrap_or(if diff > 0 { i64::MAX } else { i64::MIN })
}

/// Price every entry at its liquidation floor.
///
/// A player listed as both batter and pitcher is priced at the higher final
/// tier; on a tie the batter row is used.
pub fn report(log: &InvestmentLog, snapshot: &Snapshot) -> InvestmentReport {
    let lines: Vec<InvestmentLine> = log
        .entries()
        .iter()
        .map(|entry| {
            let outcome = snapshot.lookup(&entry.player, NameMatch::CaseInsensitive);
            let rating = outcome
                .reports()
                .iter()
                .fold(None::<HeldRating>, |best, r| match best {
                    Some(b) if b.final_tier >= r.rating.final_tier => Some(b),
                    _ => Some(HeldRating {
                        archetype: r.archetype,
                        final_tier: r.rating.final_tier,
                        unit_value: r.value,
                    }),
                });
            if rating.is_none() {
                warn!("investment in {} has no matching season record", entry.player);
            }

            let quantity = u64::from(entry.quantity);
            let cost = u64::from(entry.unit_cost) * quantity;
            let floor_value = rating.map_or(0, |r| u64::from(r.unit_value) * quantity);
            InvestmentLine {
                player: entry.player.clone(),
                quantity: entry.quantity,
                cost,
                rating,
                floor_value,
                floor_margin: signed_margin(floor_value, cost),
            }
        })
        .collect();

    let total_cost = lines.iter().fold(0u64, |acc, l| acc.saturating_add(l.cost));
    let total_floor_value = lines.iter().fold(0u64, |acc, l| acc.saturating_add(l.floor_value));
    let total_floor_margin = signed_margin(total_floor_value, total_cost);
    let not_found = lines.iter().filter(|l| l.rating.is_none()).count();

    InvestmentReport {
        lines,
        total_cost,
        total_floor_value,
        total_floor_margin,
        not_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::MarketBook;
    use crate::stats::{PlayerRecord, SeasonStats};
    use ovrcast_market::MarketCard;

    fn snapshot() -> Snapshot {
        let stats = SeasonStats {
            season: 2025,
            batters: vec![
                PlayerRecord::new("Cedric Mullins", "BAL", Archetype::Batter),
                PlayerRecord::new("Shohei Ohtani", "LAD", Archetype::Batter),
            ],
            pitchers: vec![
                PlayerRecord::new("Logan Webb", "SFG", Archetype::Pitcher),
                PlayerRecord::new("Shohei Ohtani", "LAD", Archetype::Pitcher),
            ],
        };
        let card = |name: &str, tier: u32| MarketCard {
            name: name.into(),
            observed_tier: Some(tier),
            buy_price: None,
            sell_price: None,
        };
        let book = MarketBook::new(vec![
            card("Logan Webb", 85),
            card("Shohei Ohtani", 80),
        ]);
        Snapshot::from_parts(stats, book)
    }

    fn entry(player: &str, quantity: u32, unit_cost: u32) -> Investment {
        Investment {
            player: player.into(),
            quantity,
            unit_cost,
            recorded_at: None,
        }
    }

    #[test]
    fn log_is_append_only_in_order() {
        let mut log = InvestmentLog::new();
        assert!(log.is_empty());
        log.append(entry("Logan Webb", 1, 2500));
        log.append(Investment::now("Cedric Mullins", 4, 80));
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].player, "Logan Webb");
        assert!(log.entries()[1].recorded_at.is_some());
    }

    #[test]
    fn loads_csv_and_skips_bad_rows() {
        let data = "\
player,quantity,unit_cost,recorded_at
Logan Webb,2,\"2,800\",2025-04-01T12:00:00Z
,1,100,
Cedric Mullins,many,50,
Shohei Ohtani,1,5000,
Aaron Judge,1,100,not-a-date
";
        let log = load_log_from_reader(data.as_bytes()).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].unit_cost, 2800);
        assert_eq!(
            log.entries()[0].recorded_at.map(|t| t.to_rfc3339()),
            Some("2025-04-01T12:00:00+00:00".to_string())
        );
        assert_eq!(log.entries()[1].player, "Shohei Ohtani");
        assert_eq!(log.entries()[1].recorded_at, None);
    }

    #[test]
    fn floor_value_and_signed_margin() {
        let mut log = InvestmentLog::new();
        // Floored to 85: 3000 per card.
        log.append(entry("logan webb", 2, 2500));
        // No market, base tier 70: 25 per card.
        log.append(entry("Cedric Mullins", 4, 80));

        let r = report(&log, &snapshot());
        assert_eq!(r.lines[0].rating.map(|h| h.final_tier), Some(85));
        assert_eq!(r.lines[0].floor_value, 6000);
        assert_eq!(r.lines[0].floor_margin, 1000);
        assert_eq!(r.lines[1].cost, 320);
        assert_eq!(r.lines[1].floor_value, 100);
        assert_eq!(r.lines[1].floor_margin, -220);
        assert_eq!(r.total_cost, 5320);
        assert_eq!(r.total_floor_value, 6100);
        assert_eq!(r.total_floor_margin, 780);
        assert_eq!(r.not_found, 0);
    }

    #[test]
    fn unknown_player_contributes_cost_only() {
        let mut log = InvestmentLog::new();
        log.append(entry("Chris Bassitt", 3, 100));
        let r = report(&log, &snapshot());
        assert_eq!(r.lines[0].rating, None);
        assert_eq!(r.lines[0].floor_value, 0);
        assert_eq!(r.total_floor_margin, -300);
        assert_eq!(r.not_found, 1);
    }

    #[test]
    fn two_way_player_tie_uses_batter_row() {
        let mut log = InvestmentLog::new();
        log.append(entry("Shohei Ohtani", 1, 400));
        let r = report(&log, &snapshot());
        let held = r.lines[0].rating.unwrap();
        assert_eq!(held.final_tier, 80);
        assert_eq!(held.archetype, Archetype::Batter);
        assert_eq!(held.unit_value, 400);
        assert_eq!(r.lines[0].floor_margin, 0);
    }

    #[test]
    fn huge_cost_saturates_instead_of_flipping_sign() {
        let mut log = InvestmentLog::new();
        log.append(entry("Chris Bassitt", u32::MAX, u32::MAX));
        log.append(entry("Chris Bassitt", u32::MAX, u32::MAX));
        let r = report(&log, &snapshot());
        let cost = u64::from(u32::MAX) * u64::from(u32::MAX);
        assert_eq!(r.lines[0].cost, cost);
        assert_eq!(r.lines[0].floor_margin, i64::MIN);
        assert_eq!(r.total_cost, u64::MAX);
        assert_eq!(r.total_floor_margin, i64::MIN);
    }

    #[test]
    fn signed_margin_bounds() {
        assert_eq!(signed_margin(6000, 5000), 1000);
        assert_eq!(signed_margin(0, 300), -300);
        assert_eq!(signed_margin(u64::MAX, 0), i64::MAX);
    }

    #[test]
    fn report_does_not_change_the_log() {
        let mut log = InvestmentLog::new();
        log.append(entry("Logan Webb", 1, 1));
        let before = log.clone();
        let _ = report(&log, &snapshot());
        assert_eq!(log, before);
    }
}
