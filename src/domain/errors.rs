use thiserror::Error;

use super::order::OrderStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Order not found")]
    NotFound,
    #[error("Order cannot be changed in its current status ({current})")]
    InvalidState { current: OrderStatus },
    #[error("Invalid address: {field} must not be empty")]
    InvalidAddress { field: &'static str },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Return window expired ({elapsed_days} days since the order was placed)")]
    ReturnWindowExpired { elapsed_days: i64 },
    #[error("Order is busy, retry shortly")]
    Busy,
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures raised by an [`OrderStore`](super::ports::OrderStore) backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Lock not acquired within the configured wait")]
    Busy,
    #[error("Order id already exists: {0}")]
    DuplicateId(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for OrderError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Busy => OrderError::Busy,
            StoreError::DuplicateId(id) => OrderError::Internal(format!("duplicate order id {id}")),
            StoreError::Unavailable(msg) => OrderError::Internal(msg),
        }
    }
}
