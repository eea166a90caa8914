use std::io;
use std::sync::Arc;

use actix_web::web;
use dotenvy::dotenv;
use order_desk::domain::ports::Clock;
use order_desk::infrastructure::clock::SystemClock;
use order_desk::infrastructure::memory_store::InMemoryOrderStore;
use order_desk::infrastructure::seed::seed_demo_orders;
use order_desk::{build_server, AppState, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let store = Arc::new(InMemoryOrderStore::with_lock_timeout(config.lock_timeout));
    let clock = Arc::new(SystemClock);
    if config.seed_demo_orders {
        seed_demo_orders(&*store, clock.now()).map_err(io::Error::other)?;
    }

    let state = web::Data::new(AppState::new(store, clock));

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
