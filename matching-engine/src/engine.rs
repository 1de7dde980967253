use std::{collections::HashMap, sync::Arc};

use db_service::{
    schema::{
        enums::{OrderStatus, Side},
        orders::Order,
        trades::Trade,
    },
    store::{MarketStore, StoreError},
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use utility_helpers::{log_error, log_info, types::BookSnapshot};
use uuid::Uuid;

use crate::{
    error::EngineError,
    matching::{self, MatchPlan},
    order_book::MarketBook,
};

/// What a submission produced: the order in its final state, the trades in
/// the order they were made, and the fill-or-kill rejection flag.
#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    pub order: Order,
    pub trades: Vec<Trade>,
    pub rejected: bool,
    pub reject_reason: Option<String>,
}

/// Matching engine facade. Owns one book per market (created lazily) and a
/// handle to the persistence port.
///
/// Each market is serialized behind its own async mutex, held across every
/// persistence write of a submission, so concurrent submissions to one
/// market are totally ordered and never observe a half-applied match.
/// Different markets proceed in parallel.
pub struct Engine {
    store: Arc<dyn MarketStore>,
    markets: RwLock<HashMap<Uuid, Arc<Mutex<MarketBook>>>>,
}

impl Engine {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Engine {
            store,
            markets: RwLock::new(HashMap::new()),
        }
    }

    /// Runs one order through matching and persists the result. Trades are
    /// returned in the order they were produced.
    ///
    /// A fill-or-kill shortfall is not an error: the outcome comes back
    /// with `rejected = true` and the order CANCELLED. A persistence
    /// failure flags the market stale and surfaces as
    /// [`EngineError::Persistence`]; the book should then be rebuilt with
    /// [`Engine::load`].
    pub async fn submit(&self, mut order: Order) -> Result<SubmitOutcome, EngineError> {
        validate(&order)?;

        let market = self.market_entry(order.market_id);
        let mut book = market.lock().await;

        let filled_before = order.filled;
        let plan = matching::run(&mut book, &mut order);
        let (yes_price, no_price) = book.last_prices();

        match self
            .persist_submission(&order, filled_before, &plan, yes_price, no_price)
            .await
        {
            Ok(trades) => {
                if plan.rejected {
                    log_info!("Order {} rejected: {:?}", order.id, plan.reject_reason);
                }
                Ok(SubmitOutcome {
                    order,
                    trades,
                    rejected: plan.rejected,
                    reject_reason: plan.reject_reason,
                })
            }
            Err(e) => {
                book.set_stale();
                log_error!(
                    "Persistence failed for order {} on market {}, book marked stale: {}",
                    order.id,
                    order.market_id,
                    e
                );
                Err(EngineError::Persistence(e))
            }
        }
    }

    /// Removes a resting order from its book and persists the
    /// cancellation. Republishes last prices, the top of book may have
    /// moved.
    pub async fn cancel(
        &self,
        order_id: Uuid,
        market_id: Uuid,
        side: Side,
    ) -> Result<Order, EngineError> {
        let market = self
            .existing_market(market_id)
            .ok_or(EngineError::MarketUnknown(market_id))?;
        let mut book = market.lock().await;

        if !book.remove(order_id, side) {
            return Err(EngineError::OrderNotFound(order_id));
        }
        let (yes_price, no_price) = book.last_prices();

        let result = async {
            let order = self
                .store
                .set_order_status(order_id, OrderStatus::CANCELLED)
                .await?;
            self.store
                .set_last_prices(market_id, yes_price, no_price)
                .await?;
            Ok::<_, StoreError>(order)
        }
        .await;

        match result {
            Ok(order) => {
                log_info!("Order cancelled - {:?}", order.id);
                Ok(order)
            }
            Err(e) => {
                book.set_stale();
                Err(EngineError::Persistence(e))
            }
        }
    }

    /// Read-only view of one market's book, both sides best-first.
    pub async fn snapshot(&self, market_id: Uuid) -> Result<BookSnapshot, EngineError> {
        let market = self
            .existing_market(market_id)
            .ok_or(EngineError::MarketUnknown(market_id))?;
        let book = market.lock().await;
        Ok(book.snapshot())
    }

    /// Rebuilds one market's book from the persisted active orders,
    /// inserting in ascending creation time so FIFO queues reproduce time
    /// priority. Clears any stale flag. Returns how many orders rested.
    pub async fn load(&self, market_id: Uuid) -> Result<usize, EngineError> {
        let mut orders = self.store.active_orders(market_id).await?;
        orders.sort_by_key(|o| o.created_at);

        let market = self.market_entry(market_id);
        let mut book = market.lock().await;
        book.clear();

        let mut order_ctn = 0;
        for order in &orders {
            if book.insert(order) {
                order_ctn += 1;
            }
        }
        log_info!("Loaded {} open orders into the market book", order_ctn);
        Ok(order_ctn)
    }

    /// Whether a persistence failure left this market's in-memory book
    /// possibly out of sync with the store.
    pub async fn is_stale(&self, market_id: Uuid) -> bool {
        match self.existing_market(market_id) {
            Some(market) => market.lock().await.is_stale(),
            None => false,
        }
    }

    /// Applies the write sequence for one submission: per trade, the trade
    /// row, the counterparty's fill and status, the aggressor's cumulative
    /// fill, and both position deltas; after the loop, the aggressor's
    /// status and the last prices.
    async fn persist_submission(
        &self,
        order: &Order,
        filled_before: Decimal,
        plan: &MatchPlan,
        yes_price: Decimal,
        no_price: Decimal,
    ) -> Result<Vec<Trade>, StoreError> {
        let mut trades = Vec::with_capacity(plan.outcomes.len());
        let mut cumulative = filled_before;

        for outcome in &plan.outcomes {
            let trade = self
                .store
                .create_trade(Trade::new(
                    order.market_id,
                    order.id,
                    outcome.resting_order_id,
                    order.user_id,
                    outcome.resting_user_id,
                    order.side,
                    outcome.price,
                    outcome.matched_quantity,
                ))
                .await?;

            let resting_status = if outcome.resting_fully_filled() {
                OrderStatus::FILLED
            } else {
                OrderStatus::PARTIAL
            };
            self.store
                .set_order_filled(outcome.resting_order_id, outcome.resting_filled)
                .await?;
            self.store
                .set_order_status(outcome.resting_order_id, resting_status)
                .await?;

            // the aggressor's persisted fill is cumulative, never the delta
            cumulative += outcome.matched_quantity;
            self.store.set_order_filled(order.id, cumulative).await?;

            self.store
                .upsert_position(
                    order.market_id,
                    trade.buyer_id,
                    trade.side,
                    trade.size,
                    trade.price,
                )
                .await?;
            self.store
                .upsert_position(
                    order.market_id,
                    trade.seller_id,
                    trade.side.opposite(),
                    -trade.size,
                    trade.price,
                )
                .await?;

            trades.push(trade);
        }

        self.store.set_order_status(order.id, order.status).await?;
        self.store
            .set_last_prices(order.market_id, yes_price, no_price)
            .await?;

        Ok(trades)
    }

    fn market_entry(&self, market_id: Uuid) -> Arc<Mutex<MarketBook>> {
        if let Some(market) = self.markets.read().get(&market_id) {
            return Arc::clone(market);
        }
        Arc::clone(
            self.markets
                .write()
                .entry(market_id)
                .or_insert_with(Default::default),
        )
    }

    fn existing_market(&self, market_id: Uuid) -> Option<Arc<Mutex<MarketBook>>> {
        self.markets.read().get(&market_id).map(Arc::clone)
    }
}

fn validate(order: &Order) -> Result<(), EngineError> {
    if order.size.is_sign_negative() {
        return Err(EngineError::InvalidOrder(format!(
            "size must be non-negative, got {}",
            order.size
        )));
    }
    if order.price.is_sign_negative() {
        return Err(EngineError::InvalidOrder(format!(
            "price must be non-negative, got {}",
            order.price
        )));
    }
    if !order.is_market() && order.price > Decimal::ONE {
        return Err(EngineError::InvalidOrder(format!(
            "limit price must be at most 1, got {}",
            order.price
        )));
    }
    Ok(())
}
