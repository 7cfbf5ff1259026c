//! Booking API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

/// Member booking routes (auth required)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/member/bookings",
            get(handler::list_mine).post(handler::create),
        )
        .route("/api/member/bookings/{id}/cancel", put(handler::cancel))
        .route(
            "/api/member/bookings/{id}",
            axum::routing::delete(handler::delete),
        )
}

/// Admin booking management routes
pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/bookings", get(handler::list_all))
        .route("/api/admin/bookings/{id}", get(handler::get_by_id))
        .route(
            "/api/admin/bookings/{id}/status",
            put(handler::update_status),
        )
        .route(
            "/api/admin/bookings/{id}/payment-status",
            put(handler::update_payment_status),
        )
}
