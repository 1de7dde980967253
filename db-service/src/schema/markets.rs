use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Last published top-of-book prices for a market. The engine writes these
/// after every submission: best resting price per side, 0.5 when that side
/// of the book is empty.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct MarketPrices {
    pub id: Uuid,
    pub yes_price: Decimal,
    pub no_price: Decimal,
    pub updated_at: NaiveDateTime,
}
