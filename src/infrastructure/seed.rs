use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};

use crate::domain::errors::OrderError;
use crate::domain::order::{Order, OrderId, OrderLine, OrderStatus, ShippingAddress};
use crate::domain::policy;
use crate::domain::ports::OrderStore;

/// Walks a freshly built order through `path`, one legal transition at a time.
fn advance(order: &mut Order, path: &[OrderStatus]) -> Result<(), OrderError> {
    for next in path {
        policy::ensure_transition(order, *next)?;
        order.set_status(*next);
    }
    Ok(())
}

fn single_line(code: &str, name: &str, size: &str, price: u32) -> Vec<OrderLine> {
    vec![OrderLine {
        product_code: code.to_string(),
        name: name.to_string(),
        size: size.to_string(),
        color: "Black".to_string(),
        quantity: 1,
        unit_price: BigDecimal::from(price),
    }]
}

/// Inserts the two demonstration orders:
///
/// * `001`: confirmed, placed 30 minutes before `now`, shipping to Paris.
/// * `002`: delivered, placed 15 days before `now`, shipping to New York.
pub fn seed_demo_orders<S: OrderStore>(store: &S, now: DateTime<Utc>) -> Result<(), OrderError> {
    let mut paris = Order::new(
        OrderId::from("001"),
        single_line("LJ001", "Classic Noir Biker Jacket", "M", 1499),
        ShippingAddress::new("123 Avenue des Champs-Élysées", "Paris", "75008", "France"),
        now - Duration::minutes(30),
    )?;
    advance(&mut paris, &[OrderStatus::Confirmed])?;

    let mut new_york = Order::new(
        OrderId::from("002"),
        single_line("BG001", "Leather Tote", "ONE", 899),
        ShippingAddress::new("10 Fifth Avenue", "New York", "10011", "USA"),
        now - Duration::days(15),
    )?;
    advance(
        &mut new_york,
        &[
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ],
    )?;

    for order in [paris, new_york] {
        log::info!("Seeding demo order {} ({})", order.id(), order.status());
        store.insert(order)?;
    }
    Ok(())
}
