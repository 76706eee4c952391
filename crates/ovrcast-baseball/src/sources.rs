// Data sources and the per-run snapshot.
//
// Stats and marketplace data are fetched once per run, concurrently, and
// every later lookup or ranking reads from the same immutable snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use ovrcast_market::{load_cards, ListingsClient, MarketCard, MarketError};
use tracing::{info, warn};

use crate::lookup::{lookup, LookupOutcome, NameMatch};
use crate::ranking::{rank_season, Eligibility, RankedEntry};
use crate::reconcile::MarketBook;
use crate::stats::{load_season, SeasonStats, StatsError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("stats source failed: {0}")]
    Stats(#[from] StatsError),

    #[error("market source failed: {0}")]
    Market(#[from] MarketError),
}

// ---------------------------------------------------------------------------
// Provider traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn fetch_season(&self, season: u16) -> Result<SeasonStats, SourceError>;
}

#[async_trait]
pub trait MarketProvider: Send + Sync {
    async fn fetch_cards(&self) -> Result<Vec<MarketCard>, SourceError>;
}

/// Batting and pitching CSV exports on disk.
#[derive(Debug, Clone)]
pub struct CsvStatsProvider {
    pub batting: PathBuf,
    pub pitching: PathBuf,
}

#[async_trait]
impl StatsProvider for CsvStatsProvider {
    async fn fetch_season(&self, season: u16) -> Result<SeasonStats, SourceError> {
        Ok(load_season(season, &self.batting, &self.pitching)?)
    }
}

/// A listings CSV on disk.
#[derive(Debug, Clone)]
pub struct CsvMarketProvider {
    pub path: PathBuf,
}

#[async_trait]
impl MarketProvider for CsvMarketProvider {
    async fn fetch_cards(&self) -> Result<Vec<MarketCard>, SourceError> {
        Ok(load_cards(&self.path)?)
    }
}

#[async_trait]
impl MarketProvider for ListingsClient {
    async fn fetch_cards(&self) -> Result<Vec<MarketCard>, SourceError> {
        Ok(self.fetch_all().await?)
    }
}

/// Market source for runs without marketplace data. Every tier stays raw.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarket;

#[async_trait]
impl MarketProvider for NoMarket {
    async fn fetch_cards(&self) -> Result<Vec<MarketCard>, SourceError> {
        Ok(Vec::new())
    }
}

/// In-memory stats, returned as-is regardless of the requested season.
#[derive(Debug, Clone, Default)]
pub struct StaticStats(pub SeasonStats);

#[async_trait]
impl StatsProvider for StaticStats {
    async fn fetch_season(&self, _season: u16) -> Result<SeasonStats, SourceError> {
        Ok(self.0.clone())
    }
}

/// In-memory marketplace cards.
#[derive(Debug, Clone, Default)]
pub struct StaticMarket(pub Vec<MarketCard>);

#[async_trait]
impl MarketProvider for StaticMarket {
    async fn fetch_cards(&self) -> Result<Vec<MarketCard>, SourceError> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Stats and market data for one run. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Snapshot {
    stats: Arc<SeasonStats>,
    market: Arc<MarketBook>,
}

impl Snapshot {
    /// Fetch both sources concurrently, once.
    ///
    /// A failing stats source is an error; an empty one is kept and every
    /// lookup on it reports not found. A failing market source degrades to an
    /// empty book so every tier stays raw.
    pub async fn fetch(
        stats: &dyn StatsProvider,
        market: &dyn MarketProvider,
        season: u16,
    ) -> Result<Self, SourceError> {
        let (stats_result, market_result) = tokio::join!(stats.fetch_season(season), market.fetch_cards());

        let stats = stats_result?;
        if stats.is_empty() {
            warn!(season, "stats source returned no batting or pitching records");
        }

        let cards = match market_result {
            Ok(cards) => cards,
            Err(e) => {
                warn!("market data unavailable, using raw tiers: {}", e);
                Vec::new()
            }
        };

        info!(
            season,
            batters = stats.batters.len(),
            pitchers = stats.pitchers.len(),
            listings = cards.len(),
            "snapshot loaded"
        );

        Ok(Self::from_parts(stats, MarketBook::new(cards)))
    }

    pub fn from_parts(stats: SeasonStats, market: MarketBook) -> Self {
        Self {
            stats: Arc::new(stats),
            market: Arc::new(market),
        }
    }

    pub fn stats(&self) -> &SeasonStats {
        &self.stats
    }

    pub fn market(&self) -> &MarketBook {
        &self.market
    }

    pub fn rank(&self, eligibility: &Eligibility, limit: usize) -> Vec<RankedEntry> {
        rank_season(&self.stats, &self.market, eligibility, limit)
    }

    pub fn lookup(&self, name: &str, mode: NameMatch) -> LookupOutcome {
        lookup(name, &self.stats, &self.market, mode)
    }
}
