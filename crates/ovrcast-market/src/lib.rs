// Marketplace listings: the card model, a CSV loader for listing exports,
// and an HTTP client for the paged JSON listings API.

pub mod card;
pub mod client;

pub use card::{load_cards, MarketCard, MarketError};
pub use client::ListingsClient;
