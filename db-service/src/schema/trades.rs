use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Side;

/// Write-once record of one fill. The buy side is always the aggressor:
/// an incoming YES order buys from a resting NO order and vice versa, and
/// `side` is the aggressor's side. `price` is the resting order's price.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Default, Clone, PartialEq)]
pub struct Trade {
    pub id: Uuid,
    pub market_id: Uuid,
    pub buy_order_id: Uuid,
    pub sell_order_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
    pub created_at: NaiveDateTime,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market_id: Uuid,
        buy_order_id: Uuid,
        sell_order_id: Uuid,
        buyer_id: Uuid,
        seller_id: Uuid,
        side: Side,
        price: Decimal,
        size: Decimal,
    ) -> Self {
        Trade {
            id: Uuid::new_v4(),
            market_id,
            buy_order_id,
            sell_order_id,
            buyer_id,
            seller_id,
            side,
            price,
            size,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
