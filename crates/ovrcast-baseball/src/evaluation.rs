// Per-record pipeline: normalize → score → classify → reconcile → value.

use serde::Serialize;
use tracing::debug;

use crate::normalize::{normalize, NormalizedFeatures};
use crate::reconcile::{reconcile, MarketBook, RatingResult};
use crate::scoring::{breakdown, ScoreBreakdown};
use crate::stats::{Archetype, PlayerRecord};
use crate::tier::classify;
use crate::valuation::value_of;

/// Everything the pipeline derives for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReport {
    pub name: String,
    pub team: String,
    pub archetype: Archetype,
    pub eligibility: f64,
    pub features: NormalizedFeatures,
    pub score: ScoreBreakdown,
    pub rating: RatingResult,
    /// Liquidation value of the final tier.
    pub value: u32,
}

/// Run one record through the full chain. Pure: no I/O, no hidden state.
pub fn evaluate(record: &PlayerRecord, book: &MarketBook) -> PlayerReport {
    let features = normalize(record.archetype, &record.stats);
    let score = breakdown(&features);
    let raw_tier = classify(score.total);
    let rating = reconcile(&record.name, raw_tier, book);
    let value = value_of(rating.final_tier);

    debug!(
        name = %record.name,
        archetype = %record.archetype,
        score = score.total,
        raw_tier,
        final_tier = rating.final_tier,
        value,
        "evaluated player"
    );

    PlayerReport {
        name: record.name.clone(),
        team: record.team.clone(),
        archetype: record.archetype,
        eligibility: record.eligibility,
        features,
        score,
        rating,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovrcast_market::MarketCard;

    fn scenario_batter() -> PlayerRecord {
        PlayerRecord::new("Test Batter", "TST", Archetype::Batter)
            .with_eligibility(600.0)
            .with_stat("AVG", 0.300)
            .with_stat("ISO", 0.250)
            .with_stat("K%", 0.20)
            .with_stat("BB%", 0.10)
            .with_stat("SLG", 0.550)
            .with_stat("wOBA", 0.380)
    }

    fn scenario_pitcher() -> PlayerRecord {
        PlayerRecord::new("Test Pitcher", "TST", Archetype::Pitcher)
            .with_eligibility(180.0)
            .with_stat("ERA", 2.50)
            .with_stat("K/9", 11.0)
            .with_stat("BB/9", 2.0)
            .with_stat("H/9", 7.0)
            .with_stat("FIP", 2.80)
            .with_stat("FBv", 96.0)
    }

    #[test]
    fn batter_end_to_end_without_market() {
        let report = evaluate(&scenario_batter(), &MarketBook::default());
        assert!((report.score.total - 0.3945).abs() < 1e-9);
        assert_eq!(report.rating.raw_tier, 70);
        assert_eq!(report.rating.final_tier, 70);
        assert_eq!(report.value, 25);
    }

    #[test]
    fn pitcher_end_to_end_without_market() {
        let report = evaluate(&scenario_pitcher(), &MarketBook::default());
        assert!((report.score.total - 0.5827).abs() < 1e-4);
        assert_eq!(report.rating.raw_tier, 75);
        assert_eq!(report.value, 100);
    }

    #[test]
    fn market_floor_lifts_value() {
        let book = MarketBook::new(vec![MarketCard {
            name: "test pitcher".into(),
            observed_tier: Some(85),
            buy_price: Some(2900),
            sell_price: Some(3300),
        }]);
        let report = evaluate(&scenario_pitcher(), &book);
        assert_eq!(report.rating.raw_tier, 75);
        assert_eq!(report.rating.final_tier, 85);
        assert_eq!(report.value, 3000);
    }

    #[test]
    fn eligibility_does_not_affect_score() {
        let low = evaluate(&scenario_batter().with_eligibility(1.0), &MarketBook::default());
        let high = evaluate(&scenario_batter().with_eligibility(700.0), &MarketBook::default());
        assert_eq!(low.score, high.score);
        assert_eq!(low.rating, high.rating);
    }
}
