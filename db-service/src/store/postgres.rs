use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use utility_helpers::log_info;
use uuid::Uuid;

use crate::schema::{
    enums::{OrderStatus, Side},
    markets::MarketPrices,
    orders::Order,
    positions::Position,
    trades::Trade,
};

use super::{MarketStore, StoreError};

/// Postgres-backed store. Queries use the runtime API rather than the
/// compile-checked macros so the workspace builds without a reachable
/// database; the schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        log_info!("Connected to database");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const ORDER_COLUMNS: &str =
    "id, user_id, market_id, side, order_type, price, size, filled, status, created_at, updated_at";

#[async_trait]
impl MarketStore for PgStore {
    async fn create_trade(&self, trade: Trade) -> Result<Trade, StoreError> {
        let created = sqlx::query_as::<_, Trade>(
            r#"
            INSERT INTO exchange.trades
            (id, market_id, buy_order_id, sell_order_id, buyer_id, seller_id, side, price, size, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, market_id, buy_order_id, sell_order_id, buyer_id, seller_id, side, price, size, created_at
            "#,
        )
        .bind(trade.id)
        .bind(trade.market_id)
        .bind(trade.buy_order_id)
        .bind(trade.sell_order_id)
        .bind(trade.buyer_id)
        .bind(trade.seller_id)
        .bind(trade.side)
        .bind(trade.price)
        .bind(trade.size)
        .bind(trade.created_at)
        .fetch_one(&self.pool)
        .await?;

        log_info!("Trade created - {:?}", created.id);
        Ok(created)
    }

    async fn set_order_filled(&self, order_id: Uuid, filled: Decimal) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE exchange.orders
            SET filled = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(filled)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::OrderNotFound(order_id));
        }
        Ok(())
    }

    async fn set_order_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let query = format!(
            r#"
            UPDATE exchange.orders
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(status)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::OrderNotFound(order_id))?;

        log_info!("Order updated - {:?}", order.id);
        Ok(order)
    }

    async fn upsert_position(
        &self,
        market_id: Uuid,
        user_id: Uuid,
        side: Side,
        delta_shares: Decimal,
        price: Decimal,
    ) -> Result<Position, StoreError> {
        // avg_price is the size-weighted mean of the existing position and
        // this fill; when the combined shares hit exactly zero the average
        // resets instead of dividing by zero.
        let position = sqlx::query_as::<_, Position>(
            r#"
            INSERT INTO exchange.positions (id, market_id, user_id, side, shares, avg_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (market_id, user_id, side)
            DO UPDATE SET
                avg_price = CASE
                    WHEN exchange.positions.shares + $5 = 0 THEN 0
                    ELSE (exchange.positions.shares * exchange.positions.avg_price + $5 * $6)
                         / (exchange.positions.shares + $5)
                END,
                shares = exchange.positions.shares + $5,
                updated_at = NOW()
            RETURNING id, market_id, user_id, side, shares, avg_price, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(market_id)
        .bind(user_id)
        .bind(side)
        .bind(delta_shares)
        .bind(price)
        .fetch_one(&self.pool)
        .await?;

        Ok(position)
    }

    async fn set_last_prices(
        &self,
        market_id: Uuid,
        yes_price: Decimal,
        no_price: Decimal,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO exchange.markets (id, yes_price, no_price)
            VALUES ($1, $2, $3)
            ON CONFLICT (id)
            DO UPDATE SET yes_price = $2, no_price = $3, updated_at = NOW()
            "#,
        )
        .bind(market_id)
        .bind(yes_price)
        .bind(no_price)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn market_prices(&self, market_id: Uuid) -> Result<Option<MarketPrices>, StoreError> {
        let prices = sqlx::query_as::<_, MarketPrices>(
            r#"
            SELECT id, yes_price, no_price, updated_at
            FROM exchange.markets
            WHERE id = $1
            "#,
        )
        .bind(market_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(prices)
    }

    async fn active_orders(&self, market_id: Uuid) -> Result<Vec<Order>, StoreError> {
        let query = format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM exchange.orders
            WHERE market_id = $1
              AND status IN ('pending'::exchange.order_status, 'partial'::exchange.order_status)
            "#
        );
        let orders = sqlx::query_as::<_, Order>(&query)
            .bind(market_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }
}
