// Gemini v1 order book adapter

use tracing::{debug, info};

use super::gemini_types::{BookEntry, BookResponse};
use super::http::{HttpOptions, VenueClient};
use super::{ensure_two_sided, VenueAdapter, VenueError};
use crate::engine::types::{OrderBookSnapshot, PriceLevel};
use crate::market_data::normaliser::Normaliser;

pub const VENUE: &str = "Gemini";

// 0 asks Gemini for the full book on each side
const FULL_DEPTH: [(&str, &str); 2] = [("limit_bids", "0"), ("limit_asks", "0")];

pub struct GeminiAdapter {
    pub url: String, // e.g. "https://api.gemini.com/v1/book/ETHUSD"
    client: VenueClient,
    normaliser: Normaliser,
}

impl GeminiAdapter {
    pub fn new(
        url: &str,
        options: &HttpOptions,
        normaliser: Normaliser,
    ) -> Result<Self, VenueError> {
        Ok(Self {
            url: url.to_string(),
            client: VenueClient::new(VENUE, options)?,
            normaliser,
        })
    }

    fn norm_side(&self, side: &[BookEntry]) -> Result<Vec<PriceLevel>, VenueError> {
        side.iter()
            .map(|entry| {
                self.normaliser
                    .level(&entry.price, &entry.amount)
                    .map_err(|e| VenueError::FetchFailed { venue: VENUE, reason: e.to_string() })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl VenueAdapter for GeminiAdapter {
    fn venue(&self) -> &'static str {
        VENUE
    }

    async fn fetch_book(&self) -> Result<OrderBookSnapshot, VenueError> {
        let book: BookResponse = self.client.get_json(&self.url, &FULL_DEPTH).await?;
        info!("Gemini data received");
        // The book endpoint publishes no halt flag, so the market counts as open.
        debug!(
            top_bid_ts = ?book.bids.first().and_then(|b| b.timestamp.as_deref()),
            top_ask_ts = ?book.asks.first().and_then(|a| a.timestamp.as_deref()),
            "Gemini book metadata"
        );

        let bids = self.norm_side(&book.bids)?;
        let asks = self.norm_side(&book.asks)?;
        let snapshot = OrderBookSnapshot::new(VENUE, bids, asks);
        ensure_two_sided(&snapshot)?;
        Ok(snapshot)
    }
}
