use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/**
 *
 * Order book presentation types
 *
*/

/// One price level as exposed to presentation consumers: the price, the
/// aggregate remaining size at that price, and the resting order ids in
/// time-priority order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BookLevel {
    pub price: Decimal,
    pub size: Decimal,
    pub order_ids: Vec<Uuid>,
}

/// Read-only view of one market's book, both sides ordered best-first
/// (descending price).
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct BookSnapshot {
    pub yes: Vec<BookLevel>,
    pub no: Vec<BookLevel>,
}
