//! Order lifecycle rules.
//!
//! The state machine and the eligibility predicates live here and nowhere
//! else; the order service asks these functions before every mutation.

use chrono::{DateTime, Utc};

use super::errors::OrderError;
use super::order::{Order, OrderStatus};

/// Days after order creation during which a delivered order may be returned.
pub const RETURN_WINDOW_DAYS: i64 = 30;

/// Days the customer has to ship returned items back.
pub const RETURN_SHIPPING_DAYS: i64 = 14;

pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;

    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Confirmed, Shipped)
            | (Shipped, Delivered)
            | (Pending, Cancelled)
            | (Confirmed, Cancelled)
    )
}

pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Delivered | OrderStatus::Cancelled)
}

/// Address changes and cancellation are only allowed before shipping.
pub fn can_modify(order: &Order) -> bool {
    matches!(
        order.status(),
        OrderStatus::Pending | OrderStatus::Confirmed
    )
}

/// Whole days elapsed since the order was placed, truncated.
pub fn elapsed_days(order: &Order, now: DateTime<Utc>) -> i64 {
    (now - order.created_at()).num_days()
}

pub fn can_return(order: &Order, now: DateTime<Utc>) -> bool {
    order.status() == OrderStatus::Delivered && elapsed_days(order, now) <= RETURN_WINDOW_DAYS
}

pub fn ensure_modifiable(order: &Order) -> Result<(), OrderError> {
    if can_modify(order) {
        Ok(())
    } else {
        Err(OrderError::InvalidState {
            current: order.status(),
        })
    }
}

pub fn ensure_transition(order: &Order, to: OrderStatus) -> Result<(), OrderError> {
    if can_transition(order.status(), to) {
        Ok(())
    } else {
        Err(OrderError::InvalidState {
            current: order.status(),
        })
    }
}

/// Explains which part of [`can_return`] failed.
pub fn ensure_returnable(order: &Order, now: DateTime<Utc>) -> Result<(), OrderError> {
    if can_return(order, now) {
        return Ok(());
    }
    if order.status() != OrderStatus::Delivered {
        return Err(OrderError::InvalidState {
            current: order.status(),
        });
    }
    Err(OrderError::ReturnWindowExpired {
        elapsed_days: elapsed_days(order, now),
    })
}
