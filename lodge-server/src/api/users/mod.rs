//! User API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

/// Member profile routes (auth required)
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/member/profile", put(handler::update_profile))
}

/// Admin user management routes
pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/users", get(handler::list))
        .route("/api/admin/users/{id}/role", put(handler::update_role))
        .route(
            "/api/admin/users/{id}",
            axum::routing::delete(handler::delete),
        )
}
