//! Booking Model

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type BookingId = RecordId;

/// Reservation lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

/// Whether the booking's charge has been settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingPaymentStatus {
    Pending,
    Paid,
}

impl BookingPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingPaymentStatus::Pending => "pending",
            BookingPaymentStatus::Paid => "paid",
        }
    }
}

/// Booking model
///
/// `check_in`/`check_out` form a half-open interval [check_in, check_out):
/// the guest occupies the room on every night from check_in up to but not
/// including check_out. ISO date strings sort lexicographically, so the
/// overlap query can compare them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<BookingId>,
    #[serde(with = "serde_helpers::record_id")]
    pub room: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub guest_email: String,
    #[serde(default)]
    pub guest_phone: String,
    #[serde(default = "default_guests")]
    pub num_guests: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub total_price: f64,
    pub booking_status: BookingStatus,
    pub payment_status: BookingPaymentStatus,
    #[serde(default)]
    pub created_at: i64,
}

fn default_guests() -> i32 {
    1
}

/// Create booking payload (member)
#[derive(Debug, Clone, Deserialize)]
pub struct BookingCreate {
    /// Room record id ("room:xyz")
    pub room: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub guest_email: String,
    #[serde(default)]
    pub guest_phone: String,
    #[serde(default = "default_guests")]
    pub num_guests: i32,
    #[serde(default)]
    pub special_requests: Option<String>,
}
