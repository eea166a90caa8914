pub mod escalations;
pub mod orders;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::list_orders,
        orders::place_order,
        orders::get_order,
        orders::update_shipping_address,
        orders::cancel_order,
        orders::request_return,
        orders::advance_status,
        escalations::escalate,
    ),
    components(schemas(
        orders::PlaceOrderRequest,
        orders::OrderLineRequest,
        orders::ShippingAddressBody,
        orders::OrderResponse,
        orders::OrderLineResponse,
        orders::ListOrdersResponse,
        orders::ReturnRequest,
        orders::ReturnResponse,
        orders::AdvanceStatusRequest,
        escalations::EscalateRequest,
        escalations::AcknowledgementResponse,
    )),
    tags(
        (name = "orders", description = "Order lookup and lifecycle changes"),
        (name = "escalations", description = "Handoff to human support"),
    )
)]
pub struct ApiDoc;
