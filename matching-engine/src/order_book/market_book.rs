use std::collections::HashMap;

use db_service::schema::{enums::Side, orders::Order};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use utility_helpers::types::BookSnapshot;
use uuid::Uuid;

use super::side_book::{MatchOutcome, SideBook};

/// Both sides of one market's book plus an id index for cancels.
///
/// Matching is cross-side: an incoming YES order consumes the NO book and
/// vice versa. The sweep direction differs by side because the crossing
/// test does: YES at `p` crosses resting NO priced at or below `p`
/// (cheapest first), NO at `p` crosses resting YES priced at or above `p`
/// (highest first). Either walk covers a contiguous price prefix, so it
/// stops at the first level that fails the test.
#[derive(Debug, Default)]
pub(crate) struct MarketBook {
    yes_book: SideBook,
    no_book: SideBook,
    /// order id -> (side, resting price), for O(log L + K) cancel
    resting: HashMap<Uuid, (Side, Decimal)>,
    stale: bool,
}

impl MarketBook {
    pub(crate) fn insert(&mut self, order: &Order) -> bool {
        let book = match order.side {
            Side::YES => &mut self.yes_book,
            Side::NO => &mut self.no_book,
        };
        if book.insert(order) {
            self.resting.insert(order.id, (order.side, order.price));
            return true;
        }
        false
    }

    /// Runs the incoming order against the opposite book, updating the
    /// order's cumulative fill. With `enforce_limit` false (market orders)
    /// every level crosses.
    pub(crate) fn match_order(
        &mut self,
        order: &mut Order,
        enforce_limit: bool,
    ) -> Vec<MatchOutcome> {
        let remaining = order.remaining();
        if remaining <= Decimal::ZERO {
            return Vec::new();
        }

        let side = order.side;
        let limit = order.price;
        let (opposite, ascending) = match side {
            Side::YES => (&mut self.no_book, true),
            Side::NO => (&mut self.yes_book, false),
        };

        let outcomes = opposite.take_matches(remaining, ascending, |price| {
            !enforce_limit
                || match side {
                    Side::YES => limit >= price,
                    Side::NO => limit <= price,
                }
        });

        for outcome in &outcomes {
            order.filled += outcome.matched_quantity;
            if outcome.resting_fully_filled() {
                self.resting.remove(&outcome.resting_order_id);
            }
        }

        outcomes
    }

    /// How much the opposite book could fill for this order under the
    /// crossing test, without touching the book. Fill-or-kill pre-scan.
    pub(crate) fn available_quantity(&self, order: &Order) -> Decimal {
        let side = order.side;
        let limit = order.price;
        let (opposite, ascending) = match side {
            Side::YES => (&self.no_book, true),
            Side::NO => (&self.yes_book, false),
        };

        opposite.available_quantity(ascending, |price| match side {
            Side::YES => limit >= price,
            Side::NO => limit <= price,
        })
    }

    /// Removes a resting order (cancel path). Returns false when the order
    /// is not resting on the given side.
    pub(crate) fn remove(&mut self, order_id: Uuid, side: Side) -> bool {
        let Some((resting_side, price)) = self.resting.get(&order_id).copied() else {
            return false;
        };
        if resting_side != side {
            return false;
        }

        let book = match side {
            Side::YES => &mut self.yes_book,
            Side::NO => &mut self.no_book,
        };
        if book.remove(order_id, price) {
            self.resting.remove(&order_id);
            return true;
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn is_resting(&self, order_id: Uuid) -> bool {
        self.resting.contains_key(&order_id)
    }

    pub(crate) fn best_price(&self, side: Side) -> Option<Decimal> {
        match side {
            Side::YES => self.yes_book.best_price(),
            Side::NO => self.no_book.best_price(),
        }
    }

    /// (yes, no) top-of-book for publication: best resting price per side,
    /// 0.5 for an empty side.
    pub(crate) fn last_prices(&self) -> (Decimal, Decimal) {
        (
            self.best_price(Side::YES).unwrap_or(dec!(0.5)),
            self.best_price(Side::NO).unwrap_or(dec!(0.5)),
        )
    }

    pub(crate) fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            yes: self.yes_book.snapshot_levels(),
            no: self.no_book.snapshot_levels(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.yes_book = SideBook::default();
        self.no_book = SideBook::default();
        self.resting.clear();
        self.stale = false;
    }

    pub(crate) fn set_stale(&mut self) {
        self.stale = true;
    }

    pub(crate) fn is_stale(&self) -> bool {
        self.stale
    }
}
