// Source: GET https://api.exchange.coinbase.com/products/{product}/book?level=2
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ProductBook {
    pub bids: Vec<BookEntry>,
    pub asks: Vec<BookEntry>,
    #[serde(default)]
    pub sequence: Option<u64>,
    #[serde(default)]
    pub time: Option<String>,
    // true / false / null / missing
    #[serde(default)]
    pub auction_mode: Option<bool>,
    #[serde(default)]
    pub auction: Option<AuctionInfo>,
}

// [price, size, num_orders]; size is already aggregated per price
#[derive(Debug, Deserialize)]
pub struct BookEntry(pub String, pub String, pub u64);

#[derive(Debug, Deserialize)]
pub struct AuctionInfo {
    #[serde(default)]
    pub auction_state: Option<String>, // "collection", "opening", "complete", "none"
}

impl ProductBook {
    /// Book is matchable only when no flag says otherwise.
    pub fn in_auction(&self) -> bool {
        if self.auction_mode == Some(true) {
            return true;
        }
        match self.auction.as_ref().and_then(|a| a.auction_state.as_deref()) {
            Some(state) => !matches!(state.to_ascii_lowercase().as_str(), "complete" | "none"),
            None => false,
        }
    }
}
