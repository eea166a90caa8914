pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::escalation::EscalationHandler;
use application::order_service::OrderService;
use domain::ports::{Clock, OrderStore};

pub use config::Config;

/// Shared state behind every request handler.
pub struct AppState {
    pub orders: OrderService<Arc<dyn OrderStore>, Arc<dyn Clock>>,
    pub escalations: EscalationHandler,
}

impl AppState {
    pub fn new(store: Arc<dyn OrderStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            orders: OrderService::new(store, clock),
            escalations: EscalationHandler::new(),
        }
    }
}

/// Registers the REST routes. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(handlers::orders::list_orders))
            .route("", web::post().to(handlers::orders::place_order))
            .route("/{id}", web::get().to(handlers::orders::get_order))
            .route(
                "/{id}/shipping-address",
                web::put().to(handlers::orders::update_shipping_address),
            )
            .route("/{id}/cancel", web::post().to(handlers::orders::cancel_order))
            .route("/{id}/returns", web::post().to(handlers::orders::request_return))
            .route("/{id}/status", web::post().to(handlers::orders::advance_status)),
    )
    .route("/escalations", web::post().to(handlers::escalations::escalate));
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or spawning) the returned
/// server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = handlers::ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
