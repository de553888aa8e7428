//! Route definitions for the bakery back-office API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Payment gateway webhook; every other method gets the webhook's own 405 body
        .route(
            "/webhook/payment",
            post(handlers::handle_payment_webhook).fallback(handlers::method_not_allowed),
        )
        // Ingredient inventory
        .nest("/inventory", inventory_routes())
        // Report preview and delivery
        .nest("/notifications", notification_routes())
}

/// Inventory routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(handlers::list_ingredients))
        .route("/ingredients/:ingredient_id", get(handlers::get_ingredient))
        .route("/out-of-stock", get(handlers::get_out_of_stock))
}

/// Notification routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/preview", get(handlers::preview_report))
        .route("/send", post(handlers::send_report))
}
