//! Booking API Handlers
//!
//! Booking creation is the one flow with real rules: room existence,
//! per-room serialization, overlap rejection and Decimal pricing all
//! happen here, in that order.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::booking::{StayRange, quote_total, to_decimal, to_f64};
use crate::core::ServerState;
use crate::db::models::{
    Booking, BookingCreate, BookingPaymentStatus, BookingStatus,
};
use crate::db::repository::{BookingRepository, RoomRepository, parse_id};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, Paged, Pagination};

// =============================================================================
// Member Handlers
// =============================================================================

/// POST /api/member/bookings - 创建预订
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    validate_required_text(&payload.guest_name, "guest_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.guest_email, "guest_email", MAX_EMAIL_LEN)?;
    if payload.guest_phone.len() > MAX_SHORT_TEXT_LEN {
        return Err(AppError::validation("guest_phone is too long"));
    }
    validate_optional_text(&payload.special_requests, "special_requests", MAX_NOTE_LEN)?;
    if payload.num_guests < 1 {
        return Err(AppError::validation("num_guests must be at least 1"));
    }

    // 1. Validate the requested interval (at least one night)
    let range = StayRange::new(payload.check_in, payload.check_out)
        .map_err(|e| AppError::validation(e.to_string()))?;

    // 2. Validate room existence and nightly rate
    let room_id = parse_id("room", &payload.room)?;
    let room_repo = RoomRepository::new(state.get_db());
    let room = room_repo
        .find_by_id(&payload.room)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Room {}", payload.room)))?;

    let booking_repo = BookingRepository::new(state.get_db());

    // 3. Overlap check + insert under the room's lock, so two concurrent
    //    requests for the same room cannot both pass the check
    let _guard = state.room_locks.acquire(&room_id).await;

    let existing: Vec<StayRange> = booking_repo
        .find_overlapping(&room_id, range.check_in(), range.check_out())
        .await?
        .into_iter()
        .filter_map(|b| StayRange::new(b.check_in, b.check_out).ok())
        .collect();

    if let Some(conflict) = range.find_conflict(&existing) {
        return Err(AppError::conflict(format!(
            "Room is already booked from {} to {}",
            conflict.check_in(),
            conflict.check_out()
        )));
    }

    // 4. Total price from nightly rate and stay length
    let total = quote_total(to_decimal(room.price), range.nights());

    // 5. Persist with deterministic default statuses
    let user_id = parse_id("user", &user.id)?;
    let booking = booking_repo
        .create(Booking {
            id: None,
            room: room_id,
            user: user_id,
            check_in: range.check_in(),
            check_out: range.check_out(),
            guest_name: payload.guest_name,
            guest_email: payload.guest_email,
            guest_phone: payload.guest_phone,
            num_guests: payload.num_guests,
            special_requests: payload.special_requests,
            total_price: to_f64(total),
            booking_status: BookingStatus::Confirmed,
            payment_status: BookingPaymentStatus::Pending,
            created_at: chrono::Utc::now().timestamp(),
        })
        .await?;

    tracing::info!(
        room = %payload.room,
        user = %user.id,
        check_in = %range.check_in(),
        check_out = %range.check_out(),
        total = to_f64(total),
        "Booking created"
    );

    Ok(Json(booking))
}

/// GET /api/member/bookings - 我的预订历史
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paged<Booking>>> {
    let user_id = parse_id("user", &user.id)?;
    let repo = BookingRepository::new(state.get_db());
    let bookings = repo
        .find_by_user(&user_id, pagination.limit(), pagination.start())
        .await?;
    Ok(Json(Paged::new(bookings, &pagination)))
}

/// PUT /api/member/bookings/{id}/cancel - 取消预订
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", id)))?;

    // Only the owning member may cancel
    if booking.user.to_string() != user.id {
        return Err(AppError::forbidden(
            "You do not have permission to cancel this booking",
        ));
    }

    match booking.booking_status {
        BookingStatus::Completed => {
            return Err(AppError::business_rule(
                "Completed bookings cannot be cancelled",
            ));
        }
        BookingStatus::Cancelled => {
            return Err(AppError::business_rule("Booking is already cancelled"));
        }
        BookingStatus::Confirmed => {}
    }

    let updated = repo.update_status(&id, BookingStatus::Cancelled).await?;

    tracing::info!(booking = %id, user = %user.id, "Booking cancelled");

    Ok(Json(updated))
}

/// DELETE /api/member/bookings/{id} - 删除已取消且未支付的预订
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", id)))?;

    // Only the owning member may delete
    if booking.user.to_string() != user.id {
        return Err(AppError::forbidden(
            "You do not have permission to delete this booking",
        ));
    }

    if booking.booking_status != BookingStatus::Cancelled {
        return Err(AppError::business_rule(
            "Only cancelled bookings can be deleted",
        ));
    }
    if booking.payment_status == BookingPaymentStatus::Paid {
        return Err(AppError::business_rule("Paid bookings cannot be deleted"));
    }

    repo.delete(&id).await?;

    Ok(Json(true))
}

// =============================================================================
// Admin Handlers
// =============================================================================

/// GET /api/admin/bookings - 全部预订
pub async fn list_all(
    State(state): State<ServerState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Paged<Booking>>> {
    let repo = BookingRepository::new(state.get_db());
    let bookings = repo
        .find_all(pagination.limit(), pagination.start())
        .await?;
    Ok(Json(Paged::new(bookings, &pagination)))
}

/// GET /api/admin/bookings/{id} - 预订详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", id)))?;
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

/// PUT /api/admin/bookings/{id}/status - 修改预订状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo.update_status(&id, payload.status).await?;

    tracing::info!(booking = %id, status = %payload.status.as_str(), "Booking status updated");

    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: BookingPaymentStatus,
}

/// PUT /api/admin/bookings/{id}/payment-status - 修改支付状态
pub async fn update_payment_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo
        .update_payment_status(&id, payload.payment_status)
        .await?;

    tracing::info!(
        booking = %id,
        payment_status = %payload.payment_status.as_str(),
        "Booking payment status updated"
    );

    Ok(Json(booking))
}
