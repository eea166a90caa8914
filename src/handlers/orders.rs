use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::order::{
    Order, OrderId, OrderLine, OrderStatus, ReturnApproval, ReturnReason, ShippingAddress,
};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShippingAddressBody {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        ShippingAddress::new(body.street, body.city, body.postal_code, body.country)
    }
}

impl From<&ShippingAddress> for ShippingAddressBody {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            street: address.street.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub product_code: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "1499.00"
    pub unit_price: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub shipping_address: ShippingAddressBody,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub product_code: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderLineResponse>,
    pub total_amount: String,
    pub created_at: String,
    pub shipping_address: ShippingAddressBody,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            status: order.status(),
            items: order
                .items()
                .iter()
                .map(|l| OrderLineResponse {
                    product_code: l.product_code.clone(),
                    name: l.name.clone(),
                    size: l.size.clone(),
                    color: l.color.clone(),
                    quantity: l.quantity,
                    unit_price: l.unit_price.to_string(),
                    line_total: l.line_total().to_string(),
                })
                .collect(),
            total_amount: order.total_amount().to_string(),
            created_at: order.created_at().to_rfc3339(),
            shipping_address: order.shipping_address().into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub reason: ReturnReason,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnResponse {
    pub return_id: String,
    pub order_id: String,
    pub reason: ReturnReason,
    pub approved_at: String,
    /// Returned items must be shipped before this time.
    pub ship_by: String,
}

impl From<ReturnApproval> for ReturnResponse {
    fn from(approval: ReturnApproval) -> Self {
        Self {
            return_id: approval.return_id.to_string(),
            order_id: approval.order_id.to_string(),
            reason: approval.reason,
            approved_at: approval.approved_at.to_rfc3339(),
            ship_by: approval.ship_by.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvanceStatusRequest {
    pub status: OrderStatus,
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: usize,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

fn parse_lines(lines: Vec<OrderLineRequest>) -> Result<Vec<OrderLine>, AppError> {
    lines
        .into_iter()
        .map(|l| {
            let unit_price = BigDecimal::from_str(&l.unit_price).map_err(|e| {
                AppError::BadRequest(format!("Invalid unit_price '{}': {}", l.unit_price, e))
            })?;
            Ok(OrderLine {
                product_code: l.product_code,
                name: l.name,
                size: l.size,
                color: l.color,
                quantity: l.quantity,
                unit_price,
            })
        })
        .collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Places a new order in `pending` status. The total is computed from the
/// lines.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Malformed price"),
        (status = 422, description = "Invalid lines or address"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    state: web::Data<AppState>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let lines = parse_lines(body.items)?;
    let address = ShippingAddress::from(body.shipping_address);

    let order = web::block(move || state.orders.place_order(lines, address))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(&order)))
}

/// GET /orders/{id}
///
/// Returns a snapshot of the order.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = String, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Order is locked, retry later"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = OrderId::new(path.into_inner());

    let order = web::block(move || state.orders.get_order_details(&order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}

/// GET /orders
///
/// Returns a paginated list of orders, newest first.
/// Use `page` (1-based) and `limit` to control pagination.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<usize>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<usize>, Query, description = "Items per page (default 20, max 100)"),
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let result = web::block(move || state.orders.list_orders(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// PUT /orders/{id}/shipping-address
///
/// Replaces the shipping address while the order is still pending or
/// confirmed.
#[utoipa::path(
    put,
    path = "/orders/{id}/shipping-address",
    params(
        ("id" = String, Path, description = "Order id"),
    ),
    request_body = ShippingAddressBody,
    responses(
        (status = 200, description = "Address updated", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already shipped, delivered or cancelled"),
        (status = 422, description = "An address field is empty"),
        (status = 503, description = "Order is locked, retry later"),
    ),
    tag = "orders"
)]
pub async fn update_shipping_address(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ShippingAddressBody>,
) -> Result<HttpResponse, AppError> {
    let order_id = OrderId::new(path.into_inner());
    let address = ShippingAddress::from(body.into_inner());

    let order = web::block(move || state.orders.update_shipping_address(&order_id, address))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/cancel
#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    params(
        ("id" = String, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already shipped, delivered or cancelled"),
        (status = 503, description = "Order is locked, retry later"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order_id = OrderId::new(path.into_inner());

    let order = web::block(move || state.orders.cancel_order(&order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/returns
///
/// Approves a return for a delivered order inside the 30-day window. The
/// order's status is left unchanged.
#[utoipa::path(
    post,
    path = "/orders/{id}/returns",
    params(
        ("id" = String, Path, description = "Order id"),
    ),
    request_body = ReturnRequest,
    responses(
        (status = 201, description = "Return approved", body = ReturnResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order not delivered"),
        (status = 422, description = "Return window expired"),
    ),
    tag = "orders"
)]
pub async fn request_return(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ReturnRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = OrderId::new(path.into_inner());
    let reason = body.into_inner().reason;

    let approval = web::block(move || state.orders.request_return(&order_id, reason))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ReturnResponse::from(approval)))
}

/// POST /orders/{id}/status
///
/// Fulfilment hook: moves the order one legal step along its lifecycle.
#[utoipa::path(
    post,
    path = "/orders/{id}/status",
    params(
        ("id" = String, Path, description = "Order id"),
    ),
    request_body = AdvanceStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current status"),
        (status = 503, description = "Order is locked, retry later"),
    ),
    tag = "orders"
)]
pub async fn advance_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AdvanceStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = OrderId::new(path.into_inner());
    let next = body.into_inner().status;

    let order = web::block(move || state.orders.advance_status(&order_id, next))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}
