// Marketplace card model and listing-export loading.
//
// Listing exports come from scrapers and spreadsheets, so every numeric cell
// is read as text and parsed defensively: thousands separators and currency
// labels are stripped, and anything unreadable becomes `None` rather than 0.

use ovrcast_core::parse::{parse_amount, parse_rating};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One externally observed marketplace listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketCard {
    pub name: String,
    pub observed_tier: Option<u32>,
    pub buy_price: Option<u32>,
    pub sell_price: Option<u32>,
}

impl MarketCard {
    /// Build a card from raw text cells, normalizing malformed values to
    /// `None`.
    pub fn from_cells(name: &str, rating: &str, buy: &str, sell: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            observed_tier: parse_rating(rating),
            buy_price: parse_amount(buy),
            sell_price: parse_amount(sell),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("HTTP error fetching {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("listings endpoint {url} returned status {status}")]
    Status { url: String, status: u16 },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Listing export row. Every value column is text so that malformed cells
/// reach the defensive parsers instead of failing the row.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawListingRow {
    #[serde(alias = "Player", alias = "Card", alias = "listing_name")]
    Name: String,
    #[serde(default, alias = "OVR", alias = "Ovr", alias = "ovr")]
    Rating: String,
    #[serde(default, alias = "Buy Now", alias = "Best Buy", alias = "best_buy_price")]
    Buy: String,
    #[serde(default, alias = "Sell Now", alias = "Best Sell", alias = "best_sell_price")]
    Sell: String,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Read listing rows in source order. Rows without a name are skipped.
pub fn load_cards_from_reader<R: Read>(rdr: R) -> Result<Vec<MarketCard>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut cards = Vec::new();
    for result in reader.deserialize::<RawListingRow>() {
        match result {
            Ok(raw) => {
                if raw.Name.trim().is_empty() {
                    warn!("skipping listing row with empty name");
                    continue;
                }
                cards.push(MarketCard::from_cells(&raw.Name, &raw.Rating, &raw.Buy, &raw.Sell));
            }
            Err(e) => {
                warn!("skipping malformed listing row: {}", e);
            }
        }
    }
    Ok(cards)
}

/// Load marketplace listings from a CSV export.
pub fn load_cards(path: &Path) -> Result<Vec<MarketCard>, MarketError> {
    let file = std::fs::File::open(path).map_err(|e| MarketError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_cards_from_reader(file).map_err(|e| MarketError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
