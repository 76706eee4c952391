// External floor reconciliation.
//
// The marketplace is authoritative as a lower bound: a computed tier may be
// raised to the observed tier, never lowered.

use std::collections::HashMap;

use ovrcast_core::parse::join_key;
use ovrcast_market::MarketCard;
use serde::Serialize;

// ---------------------------------------------------------------------------
// MarketBook
// ---------------------------------------------------------------------------

/// Marketplace cards indexed by join key. When several cards share a key the
/// first in source order is the one that matches.
#[derive(Debug, Clone, Default)]
pub struct MarketBook {
    cards: Vec<MarketCard>,
    index: HashMap<String, usize>,
}

impl MarketBook {
    pub fn new(cards: Vec<MarketCard>) -> Self {
        let mut index = HashMap::with_capacity(cards.len());
        for (i, card) in cards.iter().enumerate() {
            index.entry(join_key(&card.name)).or_insert(i);
        }
        Self { cards, index }
    }

    /// Case-insensitive exact lookup.
    pub fn find(&self, name: &str) -> Option<&MarketCard> {
        self.index.get(&join_key(name)).map(|&i| &self.cards[i])
    }

    pub fn cards(&self) -> &[MarketCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Computed tier, the market's observation, and the merged result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingResult {
    pub raw_tier: u32,
    pub market_tier: Option<u32>,
    pub final_tier: u32,
}

/// `max(raw, observed)`; an absent observation acts as a floor of 0.
pub fn apply_floor(raw_tier: u32, observed: Option<u32>) -> u32 {
    raw_tier.max(observed.unwrap_or(0))
}

/// Reconcile a computed tier against the player's marketplace listing.
pub fn reconcile(name: &str, raw_tier: u32, book: &MarketBook) -> RatingResult {
    let market_tier = book.find(name).and_then(|card| card.observed_tier);
    RatingResult {
        raw_tier,
        market_tier,
        final_tier: apply_floor(raw_tier, market_tier),
    }
}
