//! Room API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Public room routes (no auth)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/rooms", get(handler::list))
        .route("/api/rooms/available", post(handler::available))
        .route("/api/rooms/{id}", get(handler::get_by_id))
}

/// Admin room management routes
pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/rooms", post(handler::create))
        .route(
            "/api/admin/rooms/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
}
