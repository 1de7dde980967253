use db_service::schema::{
    enums::{OrderStatus, OrderType},
    orders::Order,
};
use rust_decimal::Decimal;

use crate::order_book::{MarketBook, MatchOutcome};

pub(crate) const FOK_REJECT_REASON: &str = "FOK order cannot be completely filled";

/// Result of running one order against the book: the fills taken, and
/// whether the submission was rejected outright (fill-or-kill shortfall).
/// The order itself has been mutated to its final fill and status, and a
/// limit remainder has already been rested.
#[derive(Debug)]
pub(crate) struct MatchPlan {
    pub(crate) outcomes: Vec<MatchOutcome>,
    pub(crate) rejected: bool,
    pub(crate) reject_reason: Option<String>,
}

impl MatchPlan {
    fn of(outcomes: Vec<MatchOutcome>) -> Self {
        MatchPlan {
            outcomes,
            rejected: false,
            reject_reason: None,
        }
    }
}

/// Dispatches the incoming order to its order-type policy. The matcher is
/// deliberately lenient: out-of-range prices or sizes are not errors here,
/// they just fail to cross (boundary validation lives in the facade).
pub(crate) fn run(book: &mut MarketBook, order: &mut Order) -> MatchPlan {
    match order.order_type {
        OrderType::LIMIT => run_limit(book, order),
        OrderType::MARKET => run_market(book, order),
        OrderType::IOC => run_ioc(book, order),
        OrderType::FOK => run_fok(book, order),
    }
}

/// Match what crosses; any remainder rests on the aggressor's own side at
/// its limit price.
fn run_limit(book: &mut MarketBook, order: &mut Order) -> MatchPlan {
    let outcomes = book.match_order(order, true);

    if order.remaining() <= Decimal::ZERO {
        order.status = OrderStatus::FILLED;
    } else {
        order.status = if outcomes.is_empty() {
            OrderStatus::PENDING
        } else {
            OrderStatus::PARTIAL
        };
        book.insert(order);
    }

    MatchPlan::of(outcomes)
}

/// Match against any price, top of the opposite book down. The remainder
/// after book exhaustion is discarded, never rested.
fn run_market(book: &mut MarketBook, order: &mut Order) -> MatchPlan {
    let outcomes = book.match_order(order, false);

    order.status = if order.remaining() <= Decimal::ZERO {
        OrderStatus::FILLED
    } else if outcomes.is_empty() {
        OrderStatus::PENDING
    } else {
        OrderStatus::PARTIAL
    };

    MatchPlan::of(outcomes)
}

/// Immediate-or-cancel: like a limit order but the remainder is never
/// rested; no fill at all cancels the order.
fn run_ioc(book: &mut MarketBook, order: &mut Order) -> MatchPlan {
    let outcomes = book.match_order(order, true);

    order.status = if order.remaining() <= Decimal::ZERO {
        OrderStatus::FILLED
    } else if outcomes.is_empty() {
        OrderStatus::CANCELLED
    } else {
        OrderStatus::PARTIAL
    };

    MatchPlan::of(outcomes)
}

/// Fill-or-kill: pre-scan the crossing prefix of the opposite book; unless
/// the whole size is achievable, reject without touching the book.
fn run_fok(book: &mut MarketBook, order: &mut Order) -> MatchPlan {
    let available = book.available_quantity(order);
    if available < order.remaining() {
        order.status = OrderStatus::CANCELLED;
        return MatchPlan {
            outcomes: Vec::new(),
            rejected: true,
            reject_reason: Some(FOK_REJECT_REASON.to_string()),
        };
    }

    let outcomes = book.match_order(order, true);
    order.status = OrderStatus::FILLED;
    MatchPlan::of(outcomes)
}
