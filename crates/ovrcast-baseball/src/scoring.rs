// Archetype scoring: a fixed weighted linear combination per archetype.
//
// Component ratios are not clamped. An ERA of 10 yields a component of -1.0
// and is allowed to drag the total below zero.

use serde::Serialize;

use crate::normalize::{BatterFeatures, NormalizedFeatures, PitcherFeatures};
use crate::stats::Archetype;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Batter weights: AVG, ISO, 1-K%, BB%, SLG, wOBA. Sum to 1.0.
pub const BATTER_WEIGHTS: [f64; 6] = [0.25, 0.20, 0.15, 0.10, 0.15, 0.15];

/// Pitcher weights: ERA, K/9, BB/9, H/9, FIP, velocity. Sum to 1.0.
pub const PITCHER_WEIGHTS: [f64; 6] = [0.25, 0.20, 0.15, 0.15, 0.15, 0.10];

const BATTER_LABELS: [&str; 6] = ["AVG", "ISO", "1-K%", "BB%", "SLG", "wOBA"];

const PITCHER_LABELS: [&str; 6] = ["1-ERA/5", "K9/15", "1-BB9/5", "1-H9/10", "1-FIP/5", "(FBv-85)/10"];

/// Scale constants for the pitcher ratios.
const ERA_SCALE: f64 = 5.0;
const K9_SCALE: f64 = 15.0;
const BB9_SCALE: f64 = 5.0;
const H9_SCALE: f64 = 10.0;
const FIP_SCALE: f64 = 5.0;
const VELOCITY_BASELINE: f64 = 85.0;
const VELOCITY_SCALE: f64 = 10.0;

pub fn weights(archetype: Archetype) -> &'static [f64; 6] {
    match archetype {
        Archetype::Batter => &BATTER_WEIGHTS,
        Archetype::Pitcher => &PITCHER_WEIGHTS,
    }
}

// ---------------------------------------------------------------------------
// Component values
// ---------------------------------------------------------------------------

fn batter_components(b: &BatterFeatures) -> [f64; 6] {
    [
        b.batting_average,
        b.isolated_power,
        1.0 - b.strikeout_rate,
        b.walk_rate,
        b.slugging,
        b.weighted_on_base_average,
    ]
}

fn pitcher_components(p: &PitcherFeatures) -> [f64; 6] {
    [
        1.0 - p.earned_run_average / ERA_SCALE,
        p.strikeouts_per_nine / K9_SCALE,
        1.0 - p.walks_per_nine / BB9_SCALE,
        1.0 - p.hits_per_nine / H9_SCALE,
        1.0 - p.fielding_independent_pitching / FIP_SCALE,
        (p.fastball_velocity - VELOCITY_BASELINE) / VELOCITY_SCALE,
    ]
}

fn components(features: &NormalizedFeatures) -> (&'static [&'static str; 6], [f64; 6]) {
    match features {
        NormalizedFeatures::Batter(b) => (&BATTER_LABELS, batter_components(b)),
        NormalizedFeatures::Pitcher(p) => (&PITCHER_LABELS, pitcher_components(p)),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// One weighted term of a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub label: &'static str,
    pub weight: f64,
    pub value: f64,
    pub contribution: f64,
}

/// A score with the terms that produced it, in formula order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total: f64,
}

/// Score a feature set. Nominally in [0, 1], never clamped.
pub fn score(features: &NormalizedFeatures) -> f64 {
    let (_, values) = components(features);
    values
        .iter()
        .zip(weights(features.archetype()))
        .map(|(v, w)| v * w)
        .sum()
}

/// Score a feature set and keep the individual terms.
pub fn breakdown(features: &NormalizedFeatures) -> ScoreBreakdown {
    let (labels, values) = components(features);
    let components: Vec<ScoreComponent> = labels
        .iter()
        .zip(values)
        .zip(weights(features.archetype()))
        .map(|((label, value), weight)| ScoreComponent {
            label: *label,
            weight: *weight,
            value,
            contribution: value * weight,
        })
        .collect();
    let total = components.iter().map(|c| c.contribution).sum();
    ScoreBreakdown { components, total }
}
