use db_service::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed submission, rejected at the facade before matching; no
    /// state changed.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// No book exists for the market (snapshot/cancel only; submission
    /// creates books lazily).
    #[error("unknown market: {0}")]
    MarketUnknown(Uuid),

    /// Cancel target is not resting in the book.
    #[error("order not found: {0}")]
    OrderNotFound(Uuid),

    /// A write through the persistence port failed; the market book is
    /// flagged stale and should be reloaded.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}
