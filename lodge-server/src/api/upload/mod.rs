//! Upload API 模块
//!
//! 房源图片上传与静态读取

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Public image serving route (no auth, outside /api/)
pub fn router() -> Router<ServerState> {
    Router::new().route("/uploads/images/{filename}", get(handler::get_image))
}

/// Admin image management routes
pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/admin/rooms/{id}/images",
            post(handler::add_room_image),
        )
        .route(
            "/api/admin/rooms/{id}/images/{image_id}",
            axum::routing::delete(handler::delete_room_image),
        )
}
