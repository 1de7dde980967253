use serde::{Deserialize, Serialize};

/// Outcome side of a binary market. Both sides are long positions: a YES
/// order is a bid for YES shares, a NO order a bid for NO shares.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, PartialEq, Default, Copy, Eq, Hash)]
#[sqlx(type_name = "\"exchange\".\"side\"")]
#[sqlx(rename_all = "lowercase")]
pub enum Side {
    #[default]
    #[serde(rename = "yes")]
    YES = 1,
    #[serde(rename = "no")]
    NO = 2,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::YES => Side::NO,
            Side::NO => Side::YES,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, PartialEq, Default, Copy, Eq, Hash)]
#[sqlx(type_name = "\"exchange\".\"order_type\"")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    #[serde(rename = "limit")]
    LIMIT = 1,
    #[serde(rename = "market")]
    MARKET = 2,
    #[serde(rename = "ioc")]
    IOC = 3,
    #[serde(rename = "fok")]
    FOK = 4,
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, PartialEq, Default, Copy, Eq, Hash)]
#[sqlx(type_name = "\"exchange\".\"order_status\"")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "pending")]
    PENDING = 1,
    #[serde(rename = "partial")]
    PARTIAL = 2,
    #[serde(rename = "filled")]
    FILLED = 3,
    #[serde(rename = "cancelled")]
    CANCELLED = 4,
}

impl OrderStatus {
    /// Legal status transitions. FILLED and CANCELLED are terminal; a
    /// same-status rewrite is an idempotent no-op and always allowed.
    pub fn can_become(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (a, b) if a == b => true,
            (PENDING, PARTIAL) | (PENDING, FILLED) | (PENDING, CANCELLED) => true,
            (PARTIAL, FILLED) | (PARTIAL, CANCELLED) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::FILLED | OrderStatus::CANCELLED)
    }
}
