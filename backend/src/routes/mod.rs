//! Route definitions for the Part Total Price service

use axum::{middleware, routing::get, Router};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Plugin metadata (public - read by the host on registration)
        .route("/plugin", get(handlers::get_plugin_metadata))
        // Protected routes - host UI entry points
        .nest("/plugin/ui", plugin_ui_routes(state.clone()))
        // Protected routes - per-part valuation
        .nest("/parts", part_routes(state))
}

/// Plugin UI routes (protected)
fn plugin_ui_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/panels", get(handlers::get_ui_panels))
        .route("/dashboard", get(handlers::get_ui_dashboard_items))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Part valuation routes (protected)
fn part_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:part_id/purchase-cost", get(handlers::get_part_purchase_cost))
        .route("/:part_id/stock", get(handlers::get_part_stock))
        .route(
            "/:part_id/stock-by-location",
            get(handlers::get_part_stock_by_location),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
