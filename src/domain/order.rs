use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::OrderError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReturnReason {
    WrongSize,
    WrongColor,
    NotAsDescribed,
    ChangedMind,
    Damaged,
}

impl ReturnReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnReason::WrongSize => "wrong_size",
            ReturnReason::WrongColor => "wrong_color",
            ReturnReason::NotAsDescribed => "not_as_described",
            ReturnReason::ChangedMind => "changed_mind",
            ReturnReason::Damaged => "damaged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_code: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: BigDecimal,
}

impl OrderLine {
    pub fn line_total(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * &self.unit_price
    }

    fn validate(&self) -> Result<(), OrderError> {
        if self.product_code.trim().is_empty() {
            return Err(OrderError::InvalidInput(
                "product code must not be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(OrderError::InvalidInput(format!(
                "name of product {} must not be empty",
                self.product_code
            )));
        }
        if self.quantity < 1 {
            return Err(OrderError::InvalidInput(format!(
                "quantity of product {} must be at least 1",
                self.product_code
            )));
        }
        if self.unit_price < BigDecimal::from(0) {
            return Err(OrderError::InvalidInput(format!(
                "unit price of product {} must not be negative",
                self.product_code
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }

    /// Reports the first blank field. Whitespace-only values count as blank.
    pub fn validate(&self) -> Result<(), OrderError> {
        let fields = [
            ("street", &self.street),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(OrderError::InvalidAddress { field: *field }),
            None => Ok(()),
        }
    }
}

/// A placed order.
///
/// Identity, lines, total and creation time are fixed at construction; only
/// the status and shipping address change afterwards, and only through the
/// order service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    status: OrderStatus,
    items: Vec<OrderLine>,
    total_amount: BigDecimal,
    created_at: DateTime<Utc>,
    shipping_address: ShippingAddress,
}

impl Order {
    /// Builds a `Pending` order, validating lines and address and computing
    /// the total from the lines.
    pub fn new(
        id: OrderId,
        items: Vec<OrderLine>,
        shipping_address: ShippingAddress,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::InvalidInput(
                "an order needs at least one line".to_string(),
            ));
        }
        for line in &items {
            line.validate()?;
        }
        shipping_address.validate()?;

        let total_amount = items
            .iter()
            .fold(BigDecimal::from(0), |acc, line| acc + line.line_total());

        Ok(Self {
            id,
            status: OrderStatus::Pending,
            items,
            total_amount,
            created_at,
            shipping_address,
        })
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }

    pub fn total_amount(&self) -> &BigDecimal {
        &self.total_amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn shipping_address(&self) -> &ShippingAddress {
        &self.shipping_address
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    pub(crate) fn set_shipping_address(&mut self, address: ShippingAddress) {
        self.shipping_address = address;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnId(String);

impl ReturnId {
    pub fn generate() -> Self {
        Self(format!("RET-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReturnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnApproval {
    pub return_id: ReturnId,
    pub order_id: OrderId,
    pub reason: ReturnReason,
    pub approved_at: DateTime<Utc>,
    /// Items must be shipped back before this instant.
    pub ship_by: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn line(quantity: u32, price: &str) -> OrderLine {
        OrderLine {
            product_code: "RT001".to_string(),
            name: "Silk Shirt".to_string(),
            size: "M".to_string(),
            color: "Ivory".to_string(),
            quantity,
            unit_price: BigDecimal::from_str(price).expect("valid decimal"),
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress::new("10 Fifth Avenue", "New York", "10011", "USA")
    }

    #[test]
    fn new_order_is_pending_with_summed_total() {
        let order = Order::new(
            OrderId::from("A1"),
            vec![line(2, "449.50"), line(1, "159")],
            address(),
            Utc::now(),
        )
        .expect("valid order");

        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(
            order.total_amount(),
            &BigDecimal::from_str("1058.00").expect("valid decimal")
        );
    }

    #[test]
    fn new_order_rejects_empty_lines() {
        let err = Order::new(OrderId::from("A1"), vec![], address(), Utc::now()).unwrap_err();
        assert!(matches!(err, OrderError::InvalidInput(_)));
    }

    #[test]
    fn new_order_rejects_zero_quantity() {
        let err = Order::new(OrderId::from("A1"), vec![line(0, "10")], address(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidInput(msg) if msg.contains("quantity")));
    }

    #[test]
    fn new_order_rejects_negative_price() {
        let err = Order::new(
            OrderId::from("A1"),
            vec![line(1, "-0.01")],
            address(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, OrderError::InvalidInput(msg) if msg.contains("unit price")));
    }

    #[test]
    fn free_items_are_allowed() {
        let order = Order::new(OrderId::from("A1"), vec![line(3, "0")], address(), Utc::now())
            .expect("zero price is valid");
        assert_eq!(order.total_amount(), &BigDecimal::from(0));
    }

    #[test]
    fn address_validation_names_first_blank_field() {
        let addr = ShippingAddress::new("1 Rue de Rivoli", "Paris", "  ", "");
        assert_eq!(
            addr.validate(),
            Err(OrderError::InvalidAddress {
                field: "postal_code"
            })
        );
    }

    #[test]
    fn return_ids_carry_prefix() {
        let id = ReturnId::generate();
        assert!(id.as_str().starts_with("RET-"));
        assert_eq!(id.as_str().len(), 4 + 32);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Delivered).expect("serialize");
        assert_eq!(json, "\"delivered\"");
        let reason: ReturnReason = serde_json::from_str("\"not_as_described\"").expect("parse");
        assert_eq!(reason, ReturnReason::NotAsDescribed);
    }
}
