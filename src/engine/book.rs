use itertools::Itertools;
use rust_decimal::Decimal;
use tracing::{debug, instrument, trace, warn};

use crate::engine::types::{BookError, OrderBookSnapshot, PriceLevel, Quote, Side};

/// Virtual book built from every venue's depth, sorted in trade-priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthBook {
    pub bids: Vec<PriceLevel>, // highest price first
    pub asks: Vec<PriceLevel>, // lowest price first
}

impl DepthBook {
    /// Concatenate all snapshots per side and sort. Levels at the same price
    /// are kept apart and keep their input order.
    #[instrument(level = "debug", skip_all)]
    pub fn merge<I>(snapshots: I) -> Self
    where
        I: IntoIterator<Item = OrderBookSnapshot>,
    {
        let mut bids = Vec::new();
        let mut asks = Vec::new();
        for snapshot in snapshots {
            trace!(
                venue = snapshot.venue,
                bids = snapshot.bids.len(),
                asks = snapshot.asks.len(),
                "Merging snapshot"
            );
            bids.extend(snapshot.bids);
            asks.extend(snapshot.asks);
        }

        let bids = bids.into_iter().sorted_by(|a, b| b.price.cmp(&a.price)).collect_vec();
        let asks = asks.into_iter().sorted_by(|a, b| a.price.cmp(&b.price)).collect_vec();
        debug!(bid_levels = bids.len(), ask_levels = asks.len(), "Merged depth book");
        Self { bids, asks }
    }

    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.asks.first().copied()
    }

    /// Total cost of buying `quantity` and total proceeds of selling it.
    /// Fails as a whole if either side is too thin.
    #[instrument(level = "debug", skip_all, fields(quantity = %quantity))]
    pub fn quote(&self, quantity: Decimal) -> Result<Quote, BookError> {
        let buy_cost = walk(Side::Ask, &self.asks, quantity)?;
        let sell_proceeds = walk(Side::Bid, &self.bids, quantity)?;
        debug!(%buy_cost, %sell_proceeds, "Calculation finished");
        Ok(Quote { quantity, buy_cost, sell_proceeds })
    }
}

/// Merge two venue snapshots and quote `quantity` against the result.
pub fn aggregate(
    a: OrderBookSnapshot,
    b: OrderBookSnapshot,
    quantity: Decimal,
) -> Result<Quote, BookError> {
    DepthBook::merge([a, b]).quote(quantity)
}

/// Consume `levels` in order until `quantity` is covered and return the summed
/// `price * quantity`. The level that completes the fill is only partially used.
pub fn walk(side: Side, levels: &[PriceLevel], quantity: Decimal) -> Result<Decimal, BookError> {
    let mut remaining = quantity;
    let mut cost = Decimal::ZERO;

    for level in levels {
        if level.quantity < remaining {
            cost = level
                .price
                .checked_mul(level.quantity)
                .and_then(|notional| cost.checked_add(notional))
                .ok_or(BookError::Overflow { side })?;
            remaining -= level.quantity;
        } else {
            return level
                .price
                .checked_mul(remaining)
                .and_then(|notional| cost.checked_add(notional))
                .ok_or(BookError::Overflow { side });
        }
    }

    let error = BookError::InsufficientDepth { side, requested: quantity };
    warn!(%side, %quantity, %remaining, error = %error, "Book exhausted before fill");
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn lvl(price: Decimal, quantity: Decimal) -> PriceLevel {
        PriceLevel::new(price, quantity)
    }

    fn ones() -> Vec<PriceLevel> {
        vec![lvl(dec!(1), dec!(1)); 5]
    }

    fn ascending() -> Vec<PriceLevel> {
        vec![lvl(dec!(1), dec!(1)), lvl(dec!(2), dec!(2)), lvl(dec!(3), dec!(3))]
    }

    #[test]
    fn test_walk_ones() {
        let data = ones();
        assert_eq!(walk(Side::Ask, &data, dec!(1)), Ok(dec!(1)));
        assert_eq!(walk(Side::Ask, &data, dec!(2)), Ok(dec!(2)));
        assert_eq!(walk(Side::Ask, &data, dec!(3)), Ok(dec!(3)));
        assert_eq!(walk(Side::Ask, &data, dec!(5)), Ok(dec!(5)));
        assert!(walk(Side::Ask, &data, dec!(6)).is_err());
        assert!(walk(Side::Ask, &data, dec!(10)).is_err());
    }

    #[test]
    fn test_walk_fractional() {
        let data = ascending();
        assert_eq!(walk(Side::Ask, &data, dec!(0.01)), Ok(dec!(0.01)));
        assert_eq!(walk(Side::Ask, &data, dec!(2.01)), Ok(dec!(3.02)));
        assert_eq!(walk(Side::Ask, &data, dec!(4.5)), Ok(dec!(9.5)));
        assert_eq!(walk(Side::Ask, &data, dec!(6)), Ok(dec!(14)));
    }

    #[test]
    fn test_walk_just_past_total_depth() {
        let data = ascending();
        let err = walk(Side::Bid, &data, dec!(6.0000000000000000000000001)).unwrap_err();
        assert_eq!(
            err,
            BookError::InsufficientDepth {
                side: Side::Bid,
                requested: dec!(6.0000000000000000000000001)
            }
        );
    }

    #[test]
    fn test_walk_empty_levels() {
        assert!(matches!(
            walk(Side::Ask, &[], dec!(1)),
            Err(BookError::InsufficientDepth { side: Side::Ask, .. })
        ));
        // zero quantity still needs one level to price against
        assert!(walk(Side::Ask, &[], dec!(0)).is_err());
        assert_eq!(walk(Side::Ask, &ascending(), dec!(0)), Ok(dec!(0)));
    }

    #[test]
    fn test_walk_overflow() {
        let data = vec![lvl(Decimal::MAX, dec!(2)), lvl(dec!(1), dec!(1))];
        assert_eq!(walk(Side::Ask, &data, dec!(3)), Err(BookError::Overflow { side: Side::Ask }));
    }

    #[test]
    fn test_merge_sorts_sides() {
        let a = OrderBookSnapshot::new(
            "a",
            vec![lvl(dec!(99), dec!(1)), lvl(dec!(97), dec!(1))],
            vec![lvl(dec!(101), dec!(1)), lvl(dec!(104), dec!(1))],
        );
        let b = OrderBookSnapshot::new(
            "b",
            vec![lvl(dec!(100), dec!(2)), lvl(dec!(98), dec!(2))],
            vec![lvl(dec!(102), dec!(2)), lvl(dec!(100.5), dec!(2))],
        );
        let book = DepthBook::merge([a, b]);

        let bid_prices: Vec<_> = book.bids.iter().map(|l| l.price).collect();
        let ask_prices: Vec<_> = book.asks.iter().map(|l| l.price).collect();
        assert_eq!(bid_prices, vec![dec!(100), dec!(99), dec!(98), dec!(97)]);
        assert_eq!(ask_prices, vec![dec!(100.5), dec!(101), dec!(102), dec!(104)]);
        assert_eq!(book.best_bid(), Some(lvl(dec!(100), dec!(2))));
        assert_eq!(book.best_ask(), Some(lvl(dec!(100.5), dec!(2))));
    }

    #[test]
    fn test_merge_keeps_equal_prices_apart() {
        let a =
            OrderBookSnapshot::new("a", vec![lvl(dec!(10), dec!(1))], vec![lvl(dec!(11), dec!(1))]);
        let b =
            OrderBookSnapshot::new("b", vec![lvl(dec!(10), dec!(3))], vec![lvl(dec!(11), dec!(3))]);
        let book = DepthBook::merge([a, b]);
        assert_eq!(book.bids, vec![lvl(dec!(10), dec!(1)), lvl(dec!(10), dec!(3))]);
        assert_eq!(book.asks, vec![lvl(dec!(11), dec!(1)), lvl(dec!(11), dec!(3))]);
    }

    #[test]
    fn test_aggregate_across_venues() {
        let a = OrderBookSnapshot::new(
            "a",
            vec![lvl(dec!(99), dec!(1))],
            vec![lvl(dec!(101), dec!(1))],
        );
        let b = OrderBookSnapshot::new(
            "b",
            vec![lvl(dec!(98), dec!(5))],
            vec![lvl(dec!(100), dec!(1)), lvl(dec!(103), dec!(5))],
        );
        let quote = aggregate(a, b, dec!(2.5)).unwrap();
        // asks: 100x1 + 101x1 + 103x0.5
        assert_eq!(quote.buy_cost, dec!(252.5));
        // bids: 99x1 + 98x1.5
        assert_eq!(quote.sell_proceeds, dec!(246));
        assert_eq!(quote.quantity, dec!(2.5));
    }

    #[test]
    fn test_aggregate_with_degraded_venue() {
        let live = OrderBookSnapshot::new("live", ascending(), ascending());
        let quote = aggregate(OrderBookSnapshot::empty("down"), live, dec!(6)).unwrap();
        assert_eq!(quote.buy_cost, dec!(14));
        // bids are walked from the highest price: 3x3 + 2x2 + 1x1
        assert_eq!(quote.sell_proceeds, dec!(14));
    }

    #[test]
    fn test_aggregate_both_venues_down() {
        let err = aggregate(OrderBookSnapshot::empty("a"), OrderBookSnapshot::empty("b"), dec!(1))
            .unwrap_err();
        assert!(matches!(err, BookError::InsufficientDepth { .. }));
    }

    #[test]
    fn test_no_partial_quote() {
        // plenty of asks, bids too thin: the whole quote fails
        let a =
            OrderBookSnapshot::new("a", vec![lvl(dec!(1), dec!(1))], vec![lvl(dec!(2), dec!(100))]);
        let err = aggregate(a, OrderBookSnapshot::empty("b"), dec!(5)).unwrap_err();
        assert_eq!(err, BookError::InsufficientDepth { side: Side::Bid, requested: dec!(5) });
    }

    fn arb_levels() -> impl Strategy<Value = Vec<PriceLevel>> {
        prop::collection::vec((1u32..100_000, 1u32..10_000), 0..40).prop_map(|raw| {
            raw.into_iter()
                .map(|(p, q)| lvl(Decimal::new(p as i64, 2), Decimal::new(q as i64, 3)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_remerge_is_idempotent(
            bids_a in arb_levels(), asks_a in arb_levels(),
            bids_b in arb_levels(), asks_b in arb_levels(),
            qty in 1u32..50_000,
        ) {
            let quantity = Decimal::new(qty as i64, 3);
            let merged = DepthBook::merge([
                OrderBookSnapshot::new("a", bids_a, asks_a),
                OrderBookSnapshot::new("b", bids_b, asks_b),
            ]);
            let remerged = DepthBook::merge([OrderBookSnapshot::new(
                "merged",
                merged.bids.clone(),
                merged.asks.clone(),
            )]);

            prop_assert_eq!(&merged, &remerged);
            prop_assert_eq!(merged.quote(quantity), remerged.quote(quantity));
        }

        #[test]
        fn prop_walk_to_level_boundary_is_exact(levels in arb_levels(), cut in 0usize..40) {
            let mut levels = levels;
            levels.sort_by(|a, b| a.price.cmp(&b.price));
            prop_assume!(!levels.is_empty());
            let consumed = &levels[..=cut.min(levels.len() - 1)];

            let quantity: Decimal = consumed.iter().map(|l| l.quantity).sum();
            let expected: Decimal = consumed.iter().map(|l| l.price * l.quantity).sum();
            prop_assert_eq!(walk(Side::Ask, &levels, quantity), Ok(expected));

            let total: Decimal = levels.iter().map(|l| l.quantity).sum();
            let beyond = total + Decimal::new(1, 3);
            let is_insufficient = matches!(
                walk(Side::Ask, &levels, beyond),
                Err(BookError::InsufficientDepth { .. })
            );
            prop_assert!(is_insufficient);
        }
    }
}
