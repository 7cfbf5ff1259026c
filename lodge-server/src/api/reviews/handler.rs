//! Review API Handlers
//!
//! The review gate: one review per completed booking, rating 1-5,
//! reviewer always taken from the booking itself.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{BookingStatus, Review, ReviewCreate};
use crate::db::repository::{BookingRepository, ReviewRepository, parse_id};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, Paged, Pagination};

// =============================================================================
// Public Handlers
// =============================================================================

/// GET /api/reviews - 全部评价
pub async fn list(
    State(state): State<ServerState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paged<Review>>> {
    let repo = ReviewRepository::new(state.get_db());
    let reviews = repo
        .find_all(pagination.limit(), pagination.start())
        .await?;
    Ok(Json(Paged::new(reviews, &pagination)))
}

/// GET /api/reviews/room/{room_id} - 某房源的评价
pub async fn list_by_room(
    State(state): State<ServerState>,
    Path(room_id): Path<String>,
) -> AppResult<Json<Vec<Review>>> {
    let room_thing = parse_id("room", &room_id)?;
    let repo = ReviewRepository::new(state.get_db());
    let reviews = repo.find_by_room(&room_thing).await?;
    Ok(Json(reviews))
}

/// GET /api/reviews/{id} - 评价详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Review>> {
    let repo = ReviewRepository::new(state.get_db());
    let review = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Review {}", id)))?;
    Ok(Json(review))
}

// =============================================================================
// Member Handlers
// =============================================================================

/// GET /api/member/reviews - 我的评价
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Review>>> {
    let user_id = parse_id("user", &user.id)?;
    let repo = ReviewRepository::new(state.get_db());
    let reviews = repo.find_by_user(&user_id).await?;
    Ok(Json(reviews))
}

/// POST /api/member/reviews - 创建评价
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<Review>> {
    validate_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;

    // 1. The referenced booking must exist
    let booking_repo = BookingRepository::new(state.get_db());
    let booking = booking_repo
        .find_by_id(&payload.booking)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", payload.booking)))?;

    // Only the guest who stayed may review
    if booking.user.to_string() != user.id {
        return Err(AppError::forbidden(
            "You do not have permission to review this booking",
        ));
    }

    // 2. Only completed stays can be reviewed
    if booking.booking_status != BookingStatus::Completed {
        return Err(AppError::business_rule(
            "Reviews can only be created for completed bookings",
        ));
    }

    // 3. Rating must be 1-5
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }

    // 4. At most one review per booking
    let booking_id = parse_id("booking", &payload.booking)?;
    let repo = ReviewRepository::new(state.get_db());
    if repo.find_by_booking(&booking_id).await?.is_some() {
        return Err(AppError::conflict(
            "You have already reviewed this booking",
        ));
    }

    // 5. Persist; reviewer and room are copied from the booking
    let review = repo
        .create(Review {
            id: None,
            booking: booking_id,
            user: booking.user.clone(),
            room: booking.room.clone(),
            rating: payload.rating,
            comment: payload.comment.unwrap_or_default(),
            created_at: chrono::Utc::now().timestamp(),
        })
        .await?;

    tracing::info!(
        booking = %payload.booking,
        rating = payload.rating,
        "Review created"
    );

    Ok(Json(review))
}

// =============================================================================
// Admin Handlers
// =============================================================================

/// DELETE /api/admin/reviews/{id} - 删除评价
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ReviewRepository::new(state.get_db());
    repo.delete(&id).await?;

    tracing::info!(review = %id, "Review deleted");

    Ok(Json(true))
}
