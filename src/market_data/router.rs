// Router fans out to every venue adapter and feeds the merged book
use std::time::Duration;

use futures::future::join_all;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::engine::book::DepthBook;
use crate::engine::types::{BookError, Quote};
use crate::market_data::adapters::{fetch, FetchOutcome, VenueAdapter};

/// Fetch every venue concurrently on the current task. Completes once the
/// slowest venue has answered or hit `timeout`.
pub async fn fetch_all(adapters: &[Box<dyn VenueAdapter>], timeout: Duration) -> Vec<FetchOutcome> {
    join_all(adapters.iter().map(|adapter| fetch(adapter.as_ref(), timeout))).await
}

/// Fetch, merge and walk. Degraded venues only shrink the merged book; the
/// quote fails only when the remaining depth cannot cover `quantity`.
#[instrument(skip_all, fields(quantity = %quantity))]
pub async fn quote(
    adapters: &[Box<dyn VenueAdapter>],
    timeout: Duration,
    quantity: Decimal,
) -> Result<Quote, BookError> {
    let outcomes = fetch_all(adapters, timeout).await;

    let degraded = outcomes.iter().filter(|o| o.is_degraded()).count();
    if degraded > 0 {
        warn!(degraded, venues = outcomes.len(), "Quoting with degraded venues");
    }

    let book = DepthBook::merge(outcomes.into_iter().map(FetchOutcome::into_snapshot));
    info!(
        best_bid = ?book.best_bid().map(|l| l.price),
        best_ask = ?book.best_ask().map(|l| l.price),
        "Merged book ready"
    );
    book.quote(quantity)
}
