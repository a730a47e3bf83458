use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bid,
    Ask,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

// One resting price level as published by a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }
}

/// Both sides of one venue's book, as returned by a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookSnapshot {
    pub venue: &'static str,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl OrderBookSnapshot {
    pub fn new(venue: &'static str, bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { venue, bids, asks }
    }

    /// The degraded value a failed venue contributes to the merge.
    pub fn empty(venue: &'static str) -> Self {
        Self { venue, bids: Vec::new(), asks: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

// Result of walking both sides of the merged book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub quantity: Decimal,
    /// Cost of buying `quantity` into the ask side.
    pub buy_cost: Decimal,
    /// Proceeds of selling `quantity` into the bid side.
    pub sell_proceeds: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("desired quantity of {requested} can not be filled from the {side} side")]
    InsufficientDepth { side: Side, requested: Decimal },

    #[error("decimal overflow while walking the {side} side")]
    Overflow { side: Side },
}
