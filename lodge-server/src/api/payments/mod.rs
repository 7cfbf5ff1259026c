//! Payment API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Member payment routes (auth required)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/member/payments", post(handler::create))
        .route(
            "/api/member/payments/booking/{booking_id}",
            get(handler::get_by_booking),
        )
        .route("/api/member/payments/{id}/process", post(handler::process))
}
