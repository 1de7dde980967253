/*
 * One side of a market's book: resting buy orders for a single outcome,
 * indexed by price. Prices are plain decimals in 0 to 1 (0.3 means 0.3
 * here, not 30; scaling is the caller's concern).
 *
 * Both outcome sides of a binary market are buy books, so there is no
 * bid/ask split here. Which side an incoming order sweeps, and in which
 * price direction, is decided one level up by the market book.
 */

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use db_service::schema::orders::Order;
use rust_decimal::Decimal;
use utility_helpers::{log_info, types::BookLevel};
use uuid::Uuid;

#[derive(Default, Debug)]
pub(crate) struct PriceLevel {
    pub(crate) entries: Vec<BookEntry>,
    pub(crate) total_quantity: Decimal,
}

/// One resting order inside a price level. Entries are appended in arrival
/// order, so a level's `Vec` is its FIFO queue.
#[derive(Debug)]
pub(crate) struct BookEntry {
    pub(crate) order_id: Uuid,
    pub(crate) user_id: Uuid,
    pub(crate) size: Decimal,
    pub(crate) filled: Decimal,
    pub(crate) created_at: NaiveDateTime,
}

impl BookEntry {
    fn remaining(&self) -> Decimal {
        self.size - self.filled
    }
}

/// One fill taken from this book, reported back to the matcher. Carries the
/// resting order's post-match totals so persistence can be updated without
/// another book lookup.
#[derive(Debug, Clone)]
pub(crate) struct MatchOutcome {
    pub(crate) resting_order_id: Uuid,
    pub(crate) resting_user_id: Uuid,
    pub(crate) price: Decimal,
    pub(crate) matched_quantity: Decimal,
    pub(crate) resting_size: Decimal,
    pub(crate) resting_filled: Decimal,
}

impl MatchOutcome {
    pub(crate) fn resting_fully_filled(&self) -> bool {
        self.resting_filled == self.resting_size
    }
}

#[derive(Debug, Default)]
pub(crate) struct SideBook {
    pub(crate) levels: BTreeMap<Decimal, PriceLevel>,
}

impl SideBook {
    /// Adds a resting order at its price level, creating the level if
    /// absent. A partially filled order contributes its remainder to the
    /// level aggregate. Returns false without touching the book for orders
    /// that must not rest (terminal status, price above 1).
    pub(crate) fn insert(&mut self, order: &Order) -> bool {
        if order.status.is_terminal() {
            log_info!(
                "Order with id {} is already filled or cancelled, not adding to book",
                order.id
            );
            return false;
        }

        if order.price > Decimal::ONE {
            log_info!(
                "Order price should be less than or equal to 1.0, but got: {}, not adding order",
                order.price
            );
            return false;
        }

        let price_level = self.levels.entry(order.price).or_default();
        // FIFO within a level is append order; callers insert in ascending
        // creation time
        debug_assert!(price_level
            .entries
            .last()
            .map_or(true, |e| e.created_at <= order.created_at));
        price_level.entries.push(BookEntry {
            order_id: order.id,
            user_id: order.user_id,
            size: order.size,
            filled: order.filled,
            created_at: order.created_at,
        });
        price_level.total_quantity += order.remaining();
        true
    }

    /// Removes one resting order from the level at `price`. Returns true if
    /// it was found; drops the level when its queue empties.
    pub(crate) fn remove(&mut self, order_id: Uuid, price: Decimal) -> bool {
        if let Some(price_level) = self.levels.get_mut(&price) {
            if let Some(pos) = price_level
                .entries
                .iter()
                .position(|entry| entry.order_id == order_id)
            {
                let removed = price_level.entries.remove(pos);
                price_level.total_quantity -= removed.remaining();

                if price_level.entries.is_empty() {
                    self.levels.remove(&price);
                }
                return true;
            }
        }
        false
    }

    /// Highest resting price (top of book for presentation and last-price
    /// publication).
    pub(crate) fn best_price(&self) -> Option<Decimal> {
        self.levels.keys().next_back().cloned()
    }

    /// Takes up to `remaining` from this book: walks levels in `ascending`
    /// or descending price order, stops at the first level failing
    /// `price_ok`, and fills each level's queue front-first. Filled entries
    /// are popped and emptied levels removed.
    pub(crate) fn take_matches(
        &mut self,
        mut remaining: Decimal,
        ascending: bool,
        price_ok: impl Fn(Decimal) -> bool,
    ) -> Vec<MatchOutcome> {
        let mut matches = Vec::new();
        if remaining <= Decimal::ZERO {
            return matches;
        }

        let mut keys: Vec<Decimal> = self.levels.keys().cloned().collect();
        if !ascending {
            keys.reverse();
        }

        for price in keys {
            if !price_ok(price) {
                break;
            }

            if let Some(price_level) = self.levels.get_mut(&price) {
                for entry in price_level.entries.iter_mut() {
                    let entry_remaining = entry.remaining();
                    if entry_remaining <= Decimal::ZERO {
                        continue;
                    }

                    let match_qty = remaining.min(entry_remaining);
                    entry.filled += match_qty;
                    remaining -= match_qty;

                    matches.push(MatchOutcome {
                        resting_order_id: entry.order_id,
                        resting_user_id: entry.user_id,
                        price,
                        matched_quantity: match_qty,
                        resting_size: entry.size,
                        resting_filled: entry.filled,
                    });

                    if remaining == Decimal::ZERO {
                        break;
                    }
                }

                // keep only entries that still have a remainder
                price_level.entries.retain(|e| e.filled < e.size);
                price_level.total_quantity = price_level
                    .entries
                    .iter()
                    .map(|e| e.size - e.filled)
                    .sum();

                if price_level.entries.is_empty() {
                    self.levels.remove(&price);
                }
            }

            if remaining == Decimal::ZERO {
                break;
            }
        }

        matches
    }

    /// Sum of resting remainders over the crossing prefix, walked exactly
    /// like `take_matches` but without mutating. Used by the fill-or-kill
    /// pre-scan.
    pub(crate) fn available_quantity(
        &self,
        ascending: bool,
        price_ok: impl Fn(Decimal) -> bool,
    ) -> Decimal {
        let mut total = Decimal::ZERO;

        let mut keys: Vec<Decimal> = self.levels.keys().cloned().collect();
        if !ascending {
            keys.reverse();
        }

        for price in keys {
            if !price_ok(price) {
                break;
            }
            if let Some(price_level) = self.levels.get(&price) {
                total += price_level.total_quantity;
            }
        }

        total
    }

    /// Presentation view, best (highest) price first, order ids in time
    /// priority within each level.
    pub(crate) fn snapshot_levels(&self) -> Vec<BookLevel> {
        self.levels
            .iter()
            .rev()
            .map(|(price, level)| BookLevel {
                price: *price,
                size: level.total_quantity,
                order_ids: level.entries.iter().map(|e| e.order_id).collect(),
            })
            .collect()
    }
}
