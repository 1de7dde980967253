//! Continuous double-auction matching engine for binary prediction
//! markets.
//!
//! Every market has two complementary outcomes, YES and NO, and both sides
//! of its book are buy books: an incoming YES order matches against resting
//! NO orders and vice versa, at the resting order's price. The engine
//! matches with price-time priority, supports MARKET / LIMIT / IOC / FOK
//! order types, and writes trades, fills, positions, and last prices
//! through the narrow [`db_service::store::MarketStore`] port while holding
//! the market's lock.
//!
//! [`Engine`] is the entry point: `submit`, `cancel`, `snapshot`, and
//! `load` (warm start from persisted open orders).

pub mod engine;
pub mod error;
pub(crate) mod matching;
pub(crate) mod order_book;

pub use engine::{Engine, SubmitOutcome};
pub use error::EngineError;
