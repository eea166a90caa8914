use chrono::{DateTime, Utc};

use super::errors::{OrderError, StoreError};
use super::order::{ListResult, Order, OrderId};

/// In-place mutation applied by [`OrderStore::update`].
///
/// Returning an error aborts the update and leaves the stored order untouched.
pub type Mutation<'a> = dyn FnMut(&mut Order) -> Result<(), OrderError> + 'a;

pub trait OrderStore: Send + Sync + 'static {
    fn insert(&self, order: Order) -> Result<(), StoreError>;

    /// Consistent snapshot of one order.
    fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError>;

    /// Orders newest first. `page` is 1-based.
    fn list(&self, page: usize, limit: usize) -> Result<ListResult, StoreError>;

    /// Runs `mutation` inside the order's critical section and returns the
    /// committed snapshot. Lookup, check and write are not interleaved with
    /// any other update of the same order.
    fn update(&self, id: &OrderId, mutation: &mut Mutation<'_>) -> Result<Order, OrderError>;
}

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<S: OrderStore + ?Sized> OrderStore for std::sync::Arc<S> {
    fn insert(&self, order: Order) -> Result<(), StoreError> {
        (**self).insert(order)
    }

    fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        (**self).get(id)
    }

    fn list(&self, page: usize, limit: usize) -> Result<ListResult, StoreError> {
        (**self).list(page, limit)
    }

    fn update(&self, id: &OrderId, mutation: &mut Mutation<'_>) -> Result<Order, OrderError> {
        (**self).update(id, mutation)
    }
}
