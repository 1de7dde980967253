use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::schema::{
    enums::{OrderStatus, Side},
    markets::MarketPrices,
    orders::Order,
    positions::Position,
    trades::Trade,
};

use super::{MarketStore, StoreError};

#[derive(Default)]
struct Inner {
    orders: HashMap<Uuid, Order>,
    trades: Vec<Trade>,
    positions: HashMap<(Uuid, Uuid, Side), Position>,
    prices: HashMap<Uuid, MarketPrices>,
}

/// Hash-map backed store. Backs the engine in tests and in hosts that do
/// not need durability; enforces the order status state machine so illegal
/// writes surface instead of silently landing.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an order, mirroring the host persisting it before submission.
    pub fn insert_order(&self, order: Order) {
        self.inner.lock().orders.insert(order.id, order);
    }

    pub fn order(&self, order_id: Uuid) -> Option<Order> {
        self.inner.lock().orders.get(&order_id).cloned()
    }

    pub fn trades_for_market(&self, market_id: Uuid) -> Vec<Trade> {
        self.inner
            .lock()
            .trades
            .iter()
            .filter(|t| t.market_id == market_id)
            .cloned()
            .collect()
    }

    pub fn position(&self, market_id: Uuid, user_id: Uuid, side: Side) -> Option<Position> {
        self.inner
            .lock()
            .positions
            .get(&(market_id, user_id, side))
            .cloned()
    }

    pub fn last_prices(&self, market_id: Uuid) -> Option<(Decimal, Decimal)> {
        self.inner
            .lock()
            .prices
            .get(&market_id)
            .map(|p| (p.yes_price, p.no_price))
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn create_trade(&self, trade: Trade) -> Result<Trade, StoreError> {
        let mut inner = self.inner.lock();
        inner.trades.push(trade.clone());
        Ok(trade)
    }

    async fn set_order_filled(&self, order_id: Uuid, filled: Decimal) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let order = inner
            .orders
            .get_mut(&order_id)
            .ok_or(StoreError::OrderNotFound(order_id))?;
        order.filled = filled;
        order.updated_at = chrono::Utc::now().naive_utc();
        Ok(())
    }

    async fn set_order_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut inner = self.inner.lock();
        let order = inner
            .orders
            .get_mut(&order_id)
            .ok_or(StoreError::OrderNotFound(order_id))?;
        if !order.status.can_become(status) {
            return Err(StoreError::InvalidStatusTransition {
                from: order.status,
                to: status,
            });
        }
        order.status = status;
        order.updated_at = chrono::Utc::now().naive_utc();
        Ok(order.clone())
    }

    async fn upsert_position(
        &self,
        market_id: Uuid,
        user_id: Uuid,
        side: Side,
        delta_shares: Decimal,
        price: Decimal,
    ) -> Result<Position, StoreError> {
        let mut inner = self.inner.lock();
        let position = inner
            .positions
            .entry((market_id, user_id, side))
            .or_insert_with(|| Position::new(market_id, user_id, side));
        position.apply_fill(delta_shares, price);
        Ok(position.clone())
    }

    async fn set_last_prices(
        &self,
        market_id: Uuid,
        yes_price: Decimal,
        no_price: Decimal,
    ) -> Result<(), StoreError> {
        self.inner.lock().prices.insert(
            market_id,
            MarketPrices {
                id: market_id,
                yes_price,
                no_price,
                updated_at: chrono::Utc::now().naive_utc(),
            },
        );
        Ok(())
    }

    async fn market_prices(&self, market_id: Uuid) -> Result<Option<MarketPrices>, StoreError> {
        Ok(self.inner.lock().prices.get(&market_id).cloned())
    }

    async fn active_orders(&self, market_id: Uuid) -> Result<Vec<Order>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .orders
            .values()
            .filter(|o| {
                o.market_id == market_id
                    && matches!(o.status, OrderStatus::PENDING | OrderStatus::PARTIAL)
            })
            .cloned()
            .collect())
    }
}
