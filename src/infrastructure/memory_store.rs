use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use crate::domain::errors::{OrderError, StoreError};
use crate::domain::order::{ListResult, Order, OrderId};
use crate::domain::ports::{Mutation, OrderStore};

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(250);

const INITIAL_BACKOFF: Duration = Duration::from_micros(50);
const MAX_BACKOFF: Duration = Duration::from_millis(5);

// ── Bounded lock acquisition ─────────────────────────────────────────────────

/// Retries `attempt` with exponential backoff until it yields a guard or
/// `timeout` elapses. A poisoned lock is recovered: updates are committed by
/// a single assignment, so the guarded value is never half-written.
fn acquire<G>(
    what: &str,
    timeout: Duration,
    mut attempt: impl FnMut() -> Result<G, TryLockError<G>>,
) -> Result<G, StoreError> {
    let deadline = Instant::now() + timeout;
    let mut backoff = INITIAL_BACKOFF;
    loop {
        match attempt() {
            Ok(guard) => return Ok(guard),
            Err(TryLockError::Poisoned(poisoned)) => {
                log::warn!("Recovering poisoned lock on {}", what);
                return Ok(poisoned.into_inner());
            }
            Err(TryLockError::WouldBlock) => {
                let now = Instant::now();
                if now >= deadline {
                    log::warn!("Gave up waiting {:?} for lock on {}", timeout, what);
                    return Err(StoreError::Busy);
                }
                thread::sleep(backoff.min(deadline - now));
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

/// Process-local order store with one lock per order.
///
/// The index lock is only held long enough to find an order's slot; reads and
/// updates then lock that slot alone, so work on different orders never
/// contends.
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Arc<Mutex<Order>>>>,
    lock_timeout: Duration,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            lock_timeout,
        }
    }

    fn slot(&self, id: &OrderId) -> Result<Option<Arc<Mutex<Order>>>, StoreError> {
        let orders = acquire("order index", self.lock_timeout, || self.orders.try_read())?;
        Ok(orders.get(id).cloned())
    }

    fn snapshot(&self, slot: &Mutex<Order>, id: &OrderId) -> Result<Order, StoreError> {
        let order = acquire(id.as_str(), self.lock_timeout, || slot.try_lock())?;
        Ok(order.clone())
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn insert(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = acquire("order index", self.lock_timeout, || self.orders.try_write())?;
        if orders.contains_key(order.id()) {
            return Err(StoreError::DuplicateId(order.id().to_string()));
        }
        orders.insert(order.id().clone(), Arc::new(Mutex::new(order)));
        Ok(())
    }

    fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        match self.slot(id)? {
            Some(slot) => self.snapshot(&slot, id).map(Some),
            None => Ok(None),
        }
    }

    fn list(&self, page: usize, limit: usize) -> Result<ListResult, StoreError> {
        let slots: Vec<(OrderId, Arc<Mutex<Order>>)> = {
            let orders = acquire("order index", self.lock_timeout, || self.orders.try_read())?;
            orders
                .iter()
                .map(|(id, slot)| (id.clone(), Arc::clone(slot)))
                .collect()
        };

        let mut items = slots
            .iter()
            .map(|(id, slot)| self.snapshot(slot, id))
            .collect::<Result<Vec<_>, _>>()?;
        items.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });

        let total = items.len();
        let offset = page.saturating_sub(1).saturating_mul(limit);
        let items = items.into_iter().skip(offset).take(limit).collect();
        Ok(ListResult { items, total })
    }

    fn update(&self, id: &OrderId, mutation: &mut Mutation<'_>) -> Result<Order, OrderError> {
        let slot = self.slot(id)?.ok_or(OrderError::NotFound)?;
        let mut order = acquire(id.as_str(), self.lock_timeout, || slot.try_lock())?;

        let mut candidate = order.clone();
        mutation(&mut candidate)?;
        *order = candidate;
        Ok(order.clone())
    }
}
