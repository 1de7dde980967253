use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::schema::{
    enums::{OrderStatus, Side},
    markets::MarketPrices,
    orders::Order,
    positions::Position,
    trades::Trade,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("illegal order status transition from {from:?} to {to:?}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Narrow persistence port the matching engine writes through.
///
/// Per trade the engine calls, in order: `create_trade`, then the
/// counterparty's `set_order_filled` (and `set_order_status` if it filled),
/// then the aggressor's cumulative `set_order_filled`, then one
/// `upsert_position` per party. After the matching loop it persists the
/// aggressor status and publishes last prices. `active_orders` only feeds
/// warm-loading.
#[async_trait]
pub trait MarketStore: Send + Sync {
    async fn create_trade(&self, trade: Trade) -> Result<Trade, StoreError>;

    async fn set_order_filled(&self, order_id: Uuid, filled: Decimal) -> Result<(), StoreError>;

    async fn set_order_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, StoreError>;

    async fn upsert_position(
        &self,
        market_id: Uuid,
        user_id: Uuid,
        side: Side,
        delta_shares: Decimal,
        price: Decimal,
    ) -> Result<Position, StoreError>;

    async fn set_last_prices(
        &self,
        market_id: Uuid,
        yes_price: Decimal,
        no_price: Decimal,
    ) -> Result<(), StoreError>;

    /// Last published prices for one market, None before the first
    /// publication.
    async fn market_prices(&self, market_id: Uuid) -> Result<Option<MarketPrices>, StoreError>;

    /// Resting (PENDING or PARTIAL) orders of one market.
    async fn active_orders(&self, market_id: Uuid) -> Result<Vec<Order>, StoreError>;
}
