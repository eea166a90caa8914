//! Order lifecycle exercised through the public service API, including
//! concurrent callers touching the same order.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Barrier};

use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use order_desk::application::order_service::OrderService;
use order_desk::domain::errors::{OrderError, StoreError};
use order_desk::domain::order::{
    ListResult, Order, OrderId, OrderLine, OrderStatus, ReturnReason, ShippingAddress,
};
use order_desk::domain::ports::{Clock, Mutation, OrderStore};
use order_desk::infrastructure::clock::{ManualClock, SystemClock};
use order_desk::infrastructure::memory_store::InMemoryOrderStore;
use order_desk::infrastructure::seed::seed_demo_orders;

type Service<C> = OrderService<Arc<InMemoryOrderStore>, C>;

fn jacket() -> OrderLine {
    OrderLine {
        product_code: "LJ002".to_string(),
        name: "Cropped Leather Jacket".to_string(),
        size: "S".to_string(),
        color: "Brown".to_string(),
        quantity: 1,
        unit_price: BigDecimal::from_str("1299.00").expect("valid decimal"),
    }
}

fn berlin() -> ShippingAddress {
    ShippingAddress::new("Unter den Linden 1", "Berlin", "10117", "Germany")
}

fn seeded_with_manual_clock() -> (Service<Arc<ManualClock>>, Arc<ManualClock>) {
    let store = Arc::new(InMemoryOrderStore::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    seed_demo_orders(&*store, clock.now()).expect("seed failed");
    (OrderService::new(store, Arc::clone(&clock)), clock)
}

#[test]
fn cancelling_order_001_is_visible_in_details() {
    let (service, _) = seeded_with_manual_clock();
    let id = OrderId::from("001");

    let cancelled = service.cancel_order(&id).expect("cancel failed");
    assert_eq!(cancelled.status(), OrderStatus::Cancelled);

    let details = service.get_order_details(&id).expect("lookup failed");
    assert_eq!(details.status(), OrderStatus::Cancelled);
    assert_eq!(details.total_amount(), &BigDecimal::from(1499));
}

#[test]
fn order_002_return_depends_on_elapsed_days() {
    let (service, clock) = seeded_with_manual_clock();
    let id = OrderId::from("002");

    let approval = service
        .request_return(&id, ReturnReason::WrongSize)
        .expect("return within 15 days should be approved");
    assert_eq!(approval.reason, ReturnReason::WrongSize);

    clock.advance(Duration::days(16));
    assert_eq!(
        service.request_return(&id, ReturnReason::WrongSize),
        Err(OrderError::ReturnWindowExpired { elapsed_days: 31 })
    );
}

#[test]
fn delivered_order_keeps_new_york_address() {
    let (service, _) = seeded_with_manual_clock();
    let id = OrderId::from("002");

    assert_eq!(
        service.update_shipping_address(&id, berlin()),
        Err(OrderError::InvalidState {
            current: OrderStatus::Delivered
        })
    );
    let address = service
        .get_order_details(&id)
        .expect("lookup failed")
        .shipping_address()
        .clone();
    assert_eq!(
        address,
        ShippingAddress::new("10 Fifth Avenue", "New York", "10011", "USA")
    );
}

#[test]
fn full_lifecycle_to_delivery_then_return() {
    let store = Arc::new(InMemoryOrderStore::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let service = OrderService::new(store, Arc::clone(&clock));

    let order = service
        .place_order(vec![jacket(), jacket()], berlin())
        .expect("place failed");
    assert_eq!(
        order.total_amount(),
        &BigDecimal::from_str("2598").expect("valid decimal")
    );

    for next in [
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        clock.advance(Duration::days(2));
        let updated = service
            .advance_status(order.id(), next)
            .expect("advance failed");
        assert_eq!(updated.status(), next);
        assert_eq!(updated.created_at(), order.created_at());
    }

    assert!(service
        .request_return(order.id(), ReturnReason::NotAsDescribed)
        .is_ok());
    assert_eq!(
        service.cancel_order(order.id()),
        Err(OrderError::InvalidState {
            current: OrderStatus::Delivered
        })
    );
}

#[test]
fn return_ids_are_unique() {
    let (service, _) = seeded_with_manual_clock();
    let id = OrderId::from("002");

    let ids: HashSet<String> = (0..1000)
        .map(|_| {
            service
                .request_return(&id, ReturnReason::ChangedMind)
                .expect("return failed")
                .return_id
                .to_string()
        })
        .collect();

    assert_eq!(ids.len(), 1000);
}

#[tokio::test]
async fn concurrent_cancellations_only_one_wins() {
    let service = Arc::new(OrderService::new(
        Arc::new(InMemoryOrderStore::new()),
        SystemClock,
    ));
    let order = service
        .place_order(vec![jacket()], berlin())
        .expect("place failed");
    let barrier = Arc::new(Barrier::new(2));

    let spawn_cancel = || {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);
        let id = order.id().clone();
        tokio::task::spawn_blocking(move || {
            barrier.wait();
            service.cancel_order(&id)
        })
    };
    let (first, second) = tokio::join!(spawn_cancel(), spawn_cancel());
    let results = [first.expect("task panicked"), second.expect("task panicked")];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one cancellation must succeed");
    assert!(results.iter().any(|r| *r
        == Err(OrderError::InvalidState {
            current: OrderStatus::Cancelled
        })));
}

#[tokio::test]
async fn readers_never_see_a_half_written_address() {
    let service = Arc::new(OrderService::new(
        Arc::new(InMemoryOrderStore::new()),
        SystemClock,
    ));
    let order = service
        .place_order(vec![jacket()], berlin())
        .expect("place failed");
    let madrid = ShippingAddress::new("Gran Vía 1", "Madrid", "28013", "Spain");

    let writer = {
        let service = Arc::clone(&service);
        let id = order.id().clone();
        let madrid = madrid.clone();
        tokio::task::spawn_blocking(move || {
            for i in 0..500 {
                let next = if i % 2 == 0 { madrid.clone() } else { berlin() };
                match service.update_shipping_address(&id, next) {
                    Ok(_) | Err(OrderError::Busy) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        })
    };
    let reader = {
        let service = Arc::clone(&service);
        let id = order.id().clone();
        tokio::task::spawn_blocking(move || {
            for _ in 0..500 {
                match service.get_order_details(&id) {
                    Ok(order) => {
                        let address = order.shipping_address();
                        assert!(
                            *address == madrid || *address == berlin(),
                            "torn address: {address:?}"
                        );
                    }
                    Err(OrderError::Busy) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        })
    };

    let (w, r) = tokio::join!(writer, reader);
    w.expect("writer panicked");
    r.expect("reader panicked");
}

/// A store whose locks are always held elsewhere.
struct ContendedStore;

impl OrderStore for ContendedStore {
    fn insert(&self, _order: Order) -> Result<(), StoreError> {
        Err(StoreError::Busy)
    }

    fn get(&self, _id: &OrderId) -> Result<Option<Order>, StoreError> {
        Err(StoreError::Busy)
    }

    fn list(&self, _page: usize, _limit: usize) -> Result<ListResult, StoreError> {
        Err(StoreError::Busy)
    }

    fn update(&self, _id: &OrderId, _mutation: &mut Mutation<'_>) -> Result<Order, OrderError> {
        Err(StoreError::Busy.into())
    }
}

#[test]
fn lock_contention_surfaces_as_busy() {
    let service = OrderService::new(ContendedStore, SystemClock);
    let id = OrderId::from("001");

    assert_eq!(service.get_order_details(&id), Err(OrderError::Busy));
    assert_eq!(service.cancel_order(&id), Err(OrderError::Busy));
    assert_eq!(
        service.update_shipping_address(&id, berlin()),
        Err(OrderError::Busy)
    );
    assert_eq!(
        service.request_return(&id, ReturnReason::Damaged),
        Err(OrderError::Busy)
    );
    assert_eq!(
        service.place_order(vec![jacket()], berlin()).map(|_| ()),
        Err(OrderError::Busy)
    );
}
