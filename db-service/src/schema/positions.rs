use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Side;

/// Per (market, user, side) inventory. `shares` may go negative: the
/// counterparty of a fill is credited negated shares on the opposite side
/// and downstream valuation interprets the short.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Default, Clone, PartialEq)]
pub struct Position {
    pub id: Uuid,
    pub market_id: Uuid,
    pub user_id: Uuid,
    pub side: Side,
    pub shares: Decimal,
    pub avg_price: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Position {
    pub fn new(market_id: Uuid, user_id: Uuid, side: Side) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Position {
            id: Uuid::new_v4(),
            market_id,
            user_id,
            side,
            shares: Decimal::ZERO,
            avg_price: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Folds one fill into the position: `shares += delta` and the average
    /// price becomes the size-weighted mean of the old position and the
    /// fill. When the combined shares land exactly on zero the average is
    /// reset to zero instead of dividing by it.
    pub fn apply_fill(&mut self, delta_shares: Decimal, price: Decimal) {
        let combined = self.shares + delta_shares;
        if combined.is_zero() {
            self.avg_price = Decimal::ZERO;
        } else {
            self.avg_price =
                (self.shares * self.avg_price + delta_shares * price) / combined;
        }
        self.shares = combined;
        self.updated_at = chrono::Utc::now().naive_utc();
    }
}
