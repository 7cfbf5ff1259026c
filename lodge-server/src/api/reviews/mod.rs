//! Review API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Public review routes + member review routes
pub fn router() -> Router<ServerState> {
    Router::new()
        // Public reads
        .route("/api/reviews", get(handler::list))
        .route("/api/reviews/room/{room_id}", get(handler::list_by_room))
        .route("/api/reviews/{id}", get(handler::get_by_id))
        // Member routes (auth required)
        .route(
            "/api/member/reviews",
            get(handler::list_mine).post(handler::create),
        )
}

/// Admin review management routes
pub fn admin_router() -> Router<ServerState> {
    Router::new().route(
        "/api/admin/reviews/{id}",
        axum::routing::delete(handler::delete),
    )
}
