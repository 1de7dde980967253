use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{OrderStatus, OrderType, Side};

/// An order as persisted and as carried through the matching engine.
///
/// `price` is required for LIMIT/IOC/FOK orders and is a zero placeholder
/// for MARKET orders. `filled` is cumulative over the order's lifetime;
/// `created_at` is supplied by the caller and is strictly monotone per
/// market (it drives time priority).
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Default, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub market_id: Uuid,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Decimal,
    pub size: Decimal,
    pub filled: Decimal,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Order {
    pub fn new(
        user_id: Uuid,
        market_id: Uuid,
        side: Side,
        order_type: OrderType,
        price: Decimal,
        size: Decimal,
        created_at: NaiveDateTime,
    ) -> Self {
        Order {
            id: Uuid::new_v4(),
            user_id,
            market_id,
            side,
            order_type,
            price,
            size,
            filled: Decimal::ZERO,
            status: OrderStatus::PENDING,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.size - self.filled
    }

    pub fn is_market(&self) -> bool {
        self.order_type == OrderType::MARKET
    }
}
