// Paged JSON listings client.
//
// The listings API returns pages shaped like
// `{"page": 1, "total_pages": 40, "listings": [{"listing_name": ..,
// "best_buy_price": .., "best_sell_price": .., "item": {"ovr": ..}}]}`.
// Prices and ratings arrive as numbers on some endpoints and as formatted
// strings on others, so both are accepted and parsed defensively.

use std::time::Duration;

use ovrcast_core::parse::{parse_amount, parse_rating};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::card::{MarketCard, MarketError};

const USER_AGENT: &str = concat!("ovrcast/", env!("CARGO_PKG_VERSION"));

/// One decoded listings page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingsPage {
    pub total_pages: u32,
    pub cards: Vec<MarketCard>,
}

/// HTTP client for the paged listings API.
pub struct ListingsClient {
    http: reqwest::Client,
    url: String,
    max_pages: u32,
}

impl ListingsClient {
    /// Create a client for `url`, fetching at most `max_pages` pages.
    pub fn new(url: impl Into<String>, max_pages: u32, timeout: Duration) -> Result<Self, MarketError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(MarketError::Client)?;
        Ok(Self {
            http,
            url: url.into(),
            max_pages,
        })
    }

    /// Fetch a single page (1-based).
    pub async fn fetch_page(&self, page: u32) -> Result<ListingsPage, MarketError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[("page", page)])
            .send()
            .await
            .map_err(|e| MarketError::Http {
                url: self.url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|e| MarketError::Http {
            url: self.url.clone(),
            source: e,
        })?;
        Ok(page_from_json(&body))
    }

    /// Fetch pages in order until the reported last page or `max_pages`,
    /// concatenating cards in source order.
    pub async fn fetch_all(&self) -> Result<Vec<MarketCard>, MarketError> {
        let mut cards = Vec::new();
        let mut page = 1;
        loop {
            let fetched = self.fetch_page(page).await?;
            debug!(page, count = fetched.cards.len(), "fetched listings page");
            cards.extend(fetched.cards);

            if page >= fetched.total_pages {
                break;
            }
            if page >= self.max_pages {
                warn!(
                    total_pages = fetched.total_pages,
                    max_pages = self.max_pages,
                    "listings truncated at max_pages"
                );
                break;
            }
            page += 1;
        }
        info!("fetched {} listings from {}", cards.len(), self.url);
        Ok(cards)
    }
}

// ---------------------------------------------------------------------------
// Payload decoding
// ---------------------------------------------------------------------------

/// Decode a listings page. Listings without a usable name are dropped; a
/// missing `total_pages` is treated as a single page.
pub fn page_from_json(body: &Value) -> ListingsPage {
    let total_pages = body
        .get("total_pages")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(1);

    let cards = body
        .get("listings")
        .and_then(Value::as_array)
        .map(|listings| listings.iter().filter_map(listing_to_card).collect())
        .unwrap_or_default();

    ListingsPage { total_pages, cards }
}

fn listing_to_card(listing: &Value) -> Option<MarketCard> {
    let item = listing.get("item");
    let name = listing
        .get("listing_name")
        .and_then(Value::as_str)
        .or_else(|| item.and_then(|i| i.get("name")).and_then(Value::as_str))
        .map(str::trim)
        .filter(|n| !n.is_empty())?;

    Some(MarketCard {
        name: name.to_string(),
        observed_tier: item
            .and_then(|i| i.get("ovr"))
            .and_then(|v| value_cell(v, parse_rating)),
        buy_price: listing
            .get("best_buy_price")
            .and_then(|v| value_cell(v, parse_amount)),
        sell_price: listing
            .get("best_sell_price")
            .and_then(|v| value_cell(v, parse_amount)),
    })
}

/// Route a JSON scalar through a text parser so numbers and formatted
/// strings share one set of rules.
fn value_cell(value: &Value, parse: fn(&str) -> Option<u32>) -> Option<u32> {
    match value {
        Value::Number(n) => parse(&n.to_string()),
        Value::String(s) => parse(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_numeric_and_string_prices() {
        let body = json!({
            "page": 1,
            "total_pages": 3,
            "listings": [
                {
                    "listing_name": "Logan Webb",
                    "best_buy_price": 2950,
                    "best_sell_price": "3,400",
                    "item": { "name": "Logan Webb", "ovr": 85 }
                },
                {
                    "listing_name": "Cedric Mullins",
                    "best_buy_price": "-",
                    "best_sell_price": null,
                    "item": { "ovr": "78" }
                }
            ]
        });

        let page = page_from_json(&body);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.cards.len(), 2);
        assert_eq!(page.cards[0].buy_price, Some(2950));
        assert_eq!(page.cards[0].sell_price, Some(3400));
        assert_eq!(page.cards[0].observed_tier, Some(85));
        assert_eq!(page.cards[1].buy_price, None);
        assert_eq!(page.cards[1].sell_price, None);
        assert_eq!(page.cards[1].observed_tier, Some(78));
    }

    #[test]
    fn falls_back_to_item_name_and_drops_nameless() {
        let body = json!({
            "listings": [
                { "item": { "name": "Chris Bassitt", "ovr": 79 } },
                { "listing_name": "   ", "item": {} },
                { "best_buy_price": 10 }
            ]
        });

        let page = page_from_json(&body);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.cards.len(), 1);
        assert_eq!(page.cards[0].name, "Chris Bassitt");
    }

    #[test]
    fn missing_rating_is_absent() {
        let body = json!({
            "listings": [{ "listing_name": "Aaron Judge", "best_buy_price": 41000.0 }]
        });
        let page = page_from_json(&body);
        assert_eq!(page.cards[0].observed_tier, None);
        assert_eq!(page.cards[0].buy_price, Some(41000));
    }

    #[test]
    fn garbage_payload_yields_empty_page() {
        let page = page_from_json(&json!("not an object"));
        assert_eq!(page.total_pages, 1);
        assert!(page.cards.is_empty());
    }
}
