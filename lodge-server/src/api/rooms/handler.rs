//! Room API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::booking::StayRange;
use crate::core::ServerState;
use crate::db::models::{Room, RoomCreate, RoomFull, RoomUpdate};
use crate::db::repository::RoomRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult, Paged, Pagination};

/// Attach image galleries to a list of rooms
async fn with_images(repo: &RoomRepository, rooms: Vec<Room>) -> AppResult<Vec<RoomFull>> {
    let mut result = Vec::with_capacity(rooms.len());
    for room in rooms {
        let images = match &room.id {
            Some(id) => repo.find_images(id).await?,
            None => Vec::new(),
        };
        result.push(RoomFull { room, images });
    }
    Ok(result)
}

// =============================================================================
// Public Handlers
// =============================================================================

/// GET /api/rooms - 获取房源列表 (含图片)
pub async fn list(
    State(state): State<ServerState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paged<RoomFull>>> {
    let repo = RoomRepository::new(state.get_db());
    let rooms = repo
        .find_all(pagination.limit(), pagination.start())
        .await?;
    let items = with_images(&repo, rooms).await?;
    Ok(Json(Paged::new(items, &pagination)))
}

/// GET /api/rooms/{id} - 获取单个房源
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RoomFull>> {
    let repo = RoomRepository::new(state.get_db());
    let room = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Room {}", id)))?;

    let images = match &room.id {
        Some(room_id) => repo.find_images(room_id).await?,
        None => Vec::new(),
    };

    Ok(Json(RoomFull { room, images }))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// POST /api/rooms/available - 按日期区间搜索可用房源
pub async fn available(
    State(state): State<ServerState>,
    Query(pagination): Query<Pagination>,
    Json(req): Json<AvailabilityRequest>,
) -> AppResult<Json<Paged<Room>>> {
    // Reject empty/inverted ranges before touching the database
    let range = StayRange::new(req.check_in, req.check_out)
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = RoomRepository::new(state.get_db());
    let rooms = repo
        .find_available(range.check_in(), range.check_out())
        .await?;

    // The candidate set is filtered in Rust, so the page is cut here too
    let items: Vec<Room> = rooms
        .into_iter()
        .skip(pagination.start())
        .take(pagination.limit())
        .collect();

    Ok(Json(Paged::new(items, &pagination)))
}

// =============================================================================
// Admin Handlers
// =============================================================================

/// POST /api/admin/rooms - 创建房源
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RoomCreate>,
) -> AppResult<Json<Room>> {
    validate_required_text(&payload.room_number, "room_number", MAX_NAME_LEN)?;
    validate_required_text(&payload.room_type, "type", MAX_NAME_LEN)?;
    validate_price(payload.price, "price")?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(capacity) = payload.capacity
        && capacity < 1
    {
        return Err(AppError::validation("capacity must be at least 1"));
    }

    let repo = RoomRepository::new(state.get_db());
    let room = repo.create(payload).await?;

    tracing::info!(room_number = %room.room_number, "Room created");

    Ok(Json(room))
}

/// PUT /api/admin/rooms/{id} - 更新房源
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RoomUpdate>,
) -> AppResult<Json<Room>> {
    validate_optional_text(&payload.room_number, "room_number", MAX_NAME_LEN)?;
    validate_optional_text(&payload.room_type, "type", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(capacity) = payload.capacity
        && capacity < 1
    {
        return Err(AppError::validation("capacity must be at least 1"));
    }

    let repo = RoomRepository::new(state.get_db());
    let room = repo.update(&id, payload).await?;

    Ok(Json(room))
}

/// DELETE /api/admin/rooms/{id} - 删除房源
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = RoomRepository::new(state.get_db());
    repo.delete(&id).await?;

    tracing::info!(room_id = %id, "Room deleted");

    Ok(Json(true))
}
