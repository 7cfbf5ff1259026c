//! Payment API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Payment, PaymentCreate, PaymentStatus};
use crate::db::repository::{BookingRepository, PaymentRepository, parse_id};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// POST /api/member/payments - 创建支付记录
///
/// The amount is always the booking's stored total, never caller-supplied.
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<Json<Payment>> {
    validate_required_text(&payload.method, "method", MAX_SHORT_TEXT_LEN)?;

    let booking_repo = BookingRepository::new(state.get_db());
    let booking = booking_repo
        .find_by_id(&payload.booking)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", payload.booking)))?;

    // Only the booking's owner may pay for it
    if booking.user.to_string() != user.id {
        return Err(AppError::forbidden(
            "You do not have permission to pay for this booking",
        ));
    }

    let booking_id = parse_id("booking", &payload.booking)?;
    let repo = PaymentRepository::new(state.get_db());
    let payment = repo
        .create(Payment {
            id: None,
            booking: booking_id,
            amount: booking.total_price,
            method: payload.method,
            status: PaymentStatus::Pending,
            transaction_id: format!("TRX-{}", Uuid::new_v4()),
            created_at: chrono::Utc::now().timestamp(),
        })
        .await?;

    tracing::info!(
        booking = %payload.booking,
        transaction_id = %payment.transaction_id,
        amount = payment.amount,
        "Payment created"
    );

    Ok(Json(payment))
}

/// GET /api/member/payments/booking/{booking_id} - 查询预订的支付记录
pub async fn get_by_booking(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(booking_id): Path<String>,
) -> AppResult<Json<Payment>> {
    let booking_repo = BookingRepository::new(state.get_db());
    let booking = booking_repo
        .find_by_id(&booking_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", booking_id)))?;

    if booking.user.to_string() != user.id && !user.is_admin() {
        return Err(AppError::forbidden(
            "You do not have permission to view this payment",
        ));
    }

    let booking_thing = parse_id("booking", &booking_id)?;
    let repo = PaymentRepository::new(state.get_db());
    let payment = repo
        .find_by_booking(&booking_thing)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment for booking {}", booking_id)))?;

    Ok(Json(payment))
}

/// POST /api/member/payments/{id}/process - 结算支付
///
/// Flips payment.status to success and the booking's payment_status to
/// paid in one transaction.
pub async fn process(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Payment>> {
    let repo = PaymentRepository::new(state.get_db());
    let payment = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment {}", id)))?;

    // Only the owner of the underlying booking may settle
    let booking_repo = BookingRepository::new(state.get_db());
    let booking = booking_repo
        .find_by_id(&payment.booking.to_string())
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {}", payment.booking)))?;

    if booking.user.to_string() != user.id {
        return Err(AppError::forbidden(
            "You do not have permission to process this payment",
        ));
    }

    if payment.status != PaymentStatus::Pending {
        return Err(AppError::business_rule("Payment is already processed"));
    }

    let payment_id = parse_id("payment", &id)?;
    let settled = repo.settle(&payment_id).await?;

    tracing::info!(
        payment = %id,
        transaction_id = %settled.transaction_id,
        "Payment settled"
    );

    Ok(Json(settled))
}
