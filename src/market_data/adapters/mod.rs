// Shared trait + outcome for venue order-book adapters

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::engine::types::{OrderBookSnapshot, Side};

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("{venue} fetch failed: {reason}")]
    FetchFailed { venue: &'static str, reason: String },

    #[error("{venue} reports auction mode, depth is not actionable")]
    MarketClosed { venue: &'static str },

    #[error("no {side}s received from {venue}")]
    EmptyBook { venue: &'static str, side: Side },

    #[error("{venue} request timed out after {after:?}")]
    Timeout { venue: &'static str, after: Duration },
}

/// What a fetch produced. A degraded venue still contributes an empty
/// snapshot so the merge can go ahead with the remaining venues.
#[derive(Debug)]
pub enum FetchOutcome {
    Ready(OrderBookSnapshot),
    Degraded { venue: &'static str, error: VenueError },
}

impl FetchOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, FetchOutcome::Degraded { .. })
    }

    pub fn into_snapshot(self) -> OrderBookSnapshot {
        match self {
            FetchOutcome::Ready(snapshot) => snapshot,
            FetchOutcome::Degraded { venue, .. } => OrderBookSnapshot::empty(venue),
        }
    }
}

#[async_trait::async_trait]
pub trait VenueAdapter: Send + Sync {
    fn venue(&self) -> &'static str;

    // One request, normalised and validated. Errors are absorbed by `fetch`.
    async fn fetch_book(&self) -> Result<OrderBookSnapshot, VenueError>;
}

/// Run one adapter under `timeout` and turn every failure into a logged,
/// degraded outcome.
#[instrument(skip(adapter), fields(venue = adapter.venue()))]
pub async fn fetch(adapter: &dyn VenueAdapter, timeout: Duration) -> FetchOutcome {
    let venue = adapter.venue();
    let result = match tokio::time::timeout(timeout, adapter.fetch_book()).await {
        Ok(result) => result,
        Err(_) => Err(VenueError::Timeout { venue, after: timeout }),
    };

    match result {
        Ok(snapshot) => {
            debug!(bids = snapshot.bids.len(), asks = snapshot.asks.len(), "Book received");
            FetchOutcome::Ready(snapshot)
        }
        Err(e) => {
            error!(error = %e, "Venue degraded to an empty book");
            FetchOutcome::Degraded { venue, error: e }
        }
    }
}

pub(crate) fn ensure_two_sided(snapshot: &OrderBookSnapshot) -> Result<(), VenueError> {
    if snapshot.bids.is_empty() {
        return Err(VenueError::EmptyBook { venue: snapshot.venue, side: Side::Bid });
    }
    if snapshot.asks.is_empty() {
        return Err(VenueError::EmptyBook { venue: snapshot.venue, side: Side::Ask });
    }
    Ok(())
}

pub mod coinbase;
pub mod coinbase_types;
pub mod gemini;
pub mod gemini_types;
pub mod http;
