// Coinbase Exchange level-2 book adapter

use tracing::{debug, info, warn};

use super::coinbase_types::{BookEntry, ProductBook};
use super::http::{HttpOptions, VenueClient};
use super::{ensure_two_sided, VenueAdapter, VenueError};
use crate::engine::types::{OrderBookSnapshot, PriceLevel};
use crate::market_data::normaliser::Normaliser;

pub const VENUE: &str = "Coinbase";

pub struct CoinbaseAdapter {
    pub url: String, // e.g. "https://api.exchange.coinbase.com/products/ETH-USD/book?level=2"
    client: VenueClient,
    normaliser: Normaliser,
}

impl CoinbaseAdapter {
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

    // Entries are [price, size, num_orders]; num_orders is not needed for pricing
    fn norm_side(&self, side: &[BookEntry]) -> Result<Vec<PriceLevel>, VenueError> {
        side.iter()
            .map(|BookEntry(px, sz, _)| {
                self.normaliser
                    .level(px, sz)
                    .map_err(|e| VenueError::FetchFailed { venue: VENUE, reason: e.to_string() })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl VenueAdapter for CoinbaseAdapter {
    fn venue(&self) -> &'static str {
        VENUE
    }

    async fn fetch_book(&self) -> Result<OrderBookSnapshot, VenueError> {
        let book: ProductBook = self.client.get_json(&self.url, &[]).await?;
        info!("Coinbase data received");
        debug!(sequence = ?book.sequence, time = ?book.time, "Coinbase book metadata");

        if book.in_auction() {
            warn!(
                auction_mode = ?book.auction_mode,
                auction = ?book.auction,
                "Auction mode is active"
            );
            return Err(VenueError::MarketClosed { venue: VENUE });
        }

        let bids = self.norm_side(&book.bids)?;
        let asks = self.norm_side(&book.asks)?;
        let snapshot = OrderBookSnapshot::new(VENUE, bids, asks);
        ensure_two_sided(&snapshot)?;
        Ok(snapshot)
    }
}
