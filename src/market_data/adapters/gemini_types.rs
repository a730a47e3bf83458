// Source: GET https://api.gemini.com/v1/book/{symbol}?limit_bids=0&limit_asks=0
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BookResponse {
    pub bids: Vec<BookEntry>,
    pub asks: Vec<BookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BookEntry {
    pub price: String,  // e.g. "3045.67"
    pub amount: String, // e.g. "0.25"
    #[serde(default)]
    pub timestamp: Option<String>, // unix seconds, kept as text
}
