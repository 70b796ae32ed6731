use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::handlers::{self, d402_latest_orders::DashboardContext};
use crate::system;

/// Конфигурация всех роутов приложения
pub fn configure_routes(ctx: Arc<DashboardContext>) -> Router {
    Router::new()
        // D402 Latest Orders Dashboard
        .route("/", get(handlers::d402_latest_orders::latest_orders_page))
        .with_state(ctx)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
}
