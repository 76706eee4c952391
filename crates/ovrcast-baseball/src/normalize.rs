// Stat record normalization.
//
// Turns a raw record (any subset of columns) into a fully populated feature
// set. Every default lives here so the scorer never sees a missing value.

use serde::Serialize;

use crate::stats::{Archetype, RawStats};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// ERA assumed when absent. Feeds an inverted ratio, so zero would read as a
/// perfect pitcher.
pub const DEFAULT_ERA: f64 = 5.0;

/// Fastball velocity (mph) assumed when absent.
pub const DEFAULT_FASTBALL_VELOCITY: f64 = 90.0;

/// Default for every other feature.
pub const DEFAULT_FEATURE: f64 = 0.0;

// Source columns per feature, first present wins.
const AVG_COLUMNS: &[&str] = &["AVG", "BA"];
const ISO_COLUMNS: &[&str] = &["ISO"];
const K_RATE_COLUMNS: &[&str] = &["K%", "SO%"];
const BB_RATE_COLUMNS: &[&str] = &["BB%"];
const SLG_COLUMNS: &[&str] = &["SLG"];
const WOBA_COLUMNS: &[&str] = &["wOBA"];

const ERA_COLUMNS: &[&str] = &["ERA"];
const K9_COLUMNS: &[&str] = &["K/9", "SO/9"];
const BB9_COLUMNS: &[&str] = &["BB/9"];
const H9_COLUMNS: &[&str] = &["H/9"];
const FIP_COLUMNS: &[&str] = &["FIP"];
const FBV_COLUMNS: &[&str] = &["FBv", "vFA (sc)", "vFA (pi)"];

// ---------------------------------------------------------------------------
// Feature sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatterFeatures {
    pub batting_average: f64,
    pub isolated_power: f64,
    pub strikeout_rate: f64,
    pub walk_rate: f64,
    pub slugging: f64,
    pub weighted_on_base_average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PitcherFeatures {
    pub earned_run_average: f64,
    pub strikeouts_per_nine: f64,
    pub walks_per_nine: f64,
    pub hits_per_nine: f64,
    pub fielding_independent_pitching: f64,
    pub fastball_velocity: f64,
}

/// A total, typed feature set for one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum NormalizedFeatures {
    Batter(BatterFeatures),
    Pitcher(PitcherFeatures),
}

impl NormalizedFeatures {
    pub fn archetype(&self) -> Archetype {
        match self {
            NormalizedFeatures::Batter(_) => Archetype::Batter,
            NormalizedFeatures::Pitcher(_) => Archetype::Pitcher,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// First finite value among `columns`. Non-finite values count as absent.
fn field(stats: &RawStats, columns: &[&str]) -> Option<f64> {
    columns
        .iter()
        .filter_map(|c| stats.get(*c).copied())
        .find(|v| v.is_finite())
}

pub fn normalize_batter(stats: &RawStats) -> BatterFeatures {
    BatterFeatures {
        batting_average: field(stats, AVG_COLUMNS).unwrap_or(DEFAULT_FEATURE),
        isolated_power: field(stats, ISO_COLUMNS).unwrap_or(DEFAULT_FEATURE),
        strikeout_rate: field(stats, K_RATE_COLUMNS).unwrap_or(DEFAULT_FEATURE),
        walk_rate: field(stats, BB_RATE_COLUMNS).unwrap_or(DEFAULT_FEATURE),
        slugging: field(stats, SLG_COLUMNS).unwrap_or(DEFAULT_FEATURE),
        weighted_on_base_average: field(stats, WOBA_COLUMNS).unwrap_or(DEFAULT_FEATURE),
    }
}

pub fn normalize_pitcher(stats: &RawStats) -> PitcherFeatures {
    let earned_run_average = field(stats, ERA_COLUMNS).unwrap_or(DEFAULT_ERA);
    PitcherFeatures {
        earned_run_average,
        strikeouts_per_nine: field(stats, K9_COLUMNS).unwrap_or(DEFAULT_FEATURE),
        walks_per_nine: field(stats, BB9_COLUMNS).unwrap_or(DEFAULT_FEATURE),
        hits_per_nine: field(stats, H9_COLUMNS).unwrap_or(DEFAULT_FEATURE),
        // FIP falls back to the resolved ERA, not to zero.
        fielding_independent_pitching: field(stats, FIP_COLUMNS).unwrap_or(earned_run_average),
        fastball_velocity: field(stats, FBV_COLUMNS).unwrap_or(DEFAULT_FASTBALL_VELOCITY),
    }
}

/// Normalize a raw record for the given archetype. Never fails.
pub fn normalize(archetype: Archetype, stats: &RawStats) -> NormalizedFeatures {
    match archetype {
        Archetype::Batter => NormalizedFeatures::Batter(normalize_batter(stats)),
        Archetype::Pitcher => NormalizedFeatures::Pitcher(normalize_pitcher(stats)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, f64)]) -> RawStats {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    // -- Pitcher defaults --

    #[test]
    fn empty_pitcher_gets_documented_defaults() {
        let NormalizedFeatures::Pitcher(p) = normalize(Archetype::Pitcher, &RawStats::new()) else {
            panic!("expected pitcher features");
        };
        assert_eq!(p.earned_run_average, 5.0);
        assert_eq!(p.fastball_velocity, 90.0);
        assert_eq!(p.fielding_independent_pitching, 5.0);
        assert_eq!(p.strikeouts_per_nine, 0.0);
        assert_eq!(p.walks_per_nine, 0.0);
        assert_eq!(p.hits_per_nine, 0.0);
    }

    #[test]
    fn fip_falls_back_to_present_era() {
        let p = normalize_pitcher(&raw(&[("ERA", 3.10)]));
        assert_eq!(p.fielding_independent_pitching, 3.10);
    }

    #[test]
    fn present_fip_wins_over_era() {
        let p = normalize_pitcher(&raw(&[("ERA", 3.10), ("FIP", 2.75)]));
        assert_eq!(p.fielding_independent_pitching, 2.75);
    }

    #[test]
    fn velocity_aliases() {
        let p = normalize_pitcher(&raw(&[("vFA (sc)", 97.1)]));
        assert_eq!(p.fastball_velocity, 97.1);
        let p = normalize_pitcher(&raw(&[("FBv", 94.0), ("vFA (sc)", 97.1)]));
        assert_eq!(p.fastball_velocity, 94.0);
    }

    #[test]
    fn non_finite_values_treated_as_absent() {
        let p = normalize_pitcher(&raw(&[("ERA", f64::NAN), ("FBv", f64::INFINITY)]));
        assert_eq!(p.earned_run_average, DEFAULT_ERA);
        assert_eq!(p.fastball_velocity, DEFAULT_FASTBALL_VELOCITY);
        assert_eq!(p.fielding_independent_pitching, DEFAULT_ERA);
    }

    // -- Batter defaults --

    #[test]
    fn empty_batter_is_all_zero() {
        let b = normalize_batter(&RawStats::new());
        assert_eq!(
            b,
            BatterFeatures {
                batting_average: 0.0,
                isolated_power: 0.0,
                strikeout_rate: 0.0,
                walk_rate: 0.0,
                slugging: 0.0,
                weighted_on_base_average: 0.0,
            }
        );
    }

    #[test]
    fn batter_columns_map_to_features() {
        let b = normalize_batter(&raw(&[
            ("AVG", 0.300),
            ("ISO", 0.250),
            ("K%", 0.20),
            ("BB%", 0.10),
            ("SLG", 0.550),
            ("wOBA", 0.380),
            ("HR", 40.0),
        ]));
        assert_eq!(b.batting_average, 0.300);
        assert_eq!(b.isolated_power, 0.250);
        assert_eq!(b.strikeout_rate, 0.20);
        assert_eq!(b.walk_rate, 0.10);
        assert_eq!(b.slugging, 0.550);
        assert_eq!(b.weighted_on_base_average, 0.380);
    }

    #[test]
    fn archetype_is_carried() {
        assert_eq!(normalize(Archetype::Batter, &RawStats::new()).archetype(), Archetype::Batter);
        assert_eq!(normalize(Archetype::Pitcher, &RawStats::new()).archetype(), Archetype::Pitcher);
    }
}
