// Tier classification: score → overall rating via a threshold ladder.

/// Rating for any score below the lowest rung.
pub const BASE_TIER: u32 = 70;

/// `(minimum score, tier)`, checked top-down; lower bounds are inclusive.
/// The same ladder applies to both archetypes.
pub const TIER_LADDER: [(f64, u32); 4] = [(0.85, 90), (0.75, 85), (0.60, 80), (0.50, 75)];

/// Map a score to its tier. NaN falls through to `BASE_TIER`.
pub fn classify(score: f64) -> u32 {
    TIER_LADDER
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(BASE_TIER)
}
