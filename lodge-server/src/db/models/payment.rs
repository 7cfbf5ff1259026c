//! Payment Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type PaymentId = RecordId;

/// Payment processing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// Payment record tied to a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<PaymentId>,
    #[serde(with = "serde_helpers::record_id")]
    pub booking: RecordId,
    /// Snapshot of the booking's total price at creation time
    pub amount: f64,
    pub method: String,
    pub status: PaymentStatus,
    pub transaction_id: String,
    #[serde(default)]
    pub created_at: i64,
}

/// Create payment payload (member)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCreate {
    /// Booking record id ("booking:xyz")
    pub booking: String,
    pub method: String,
}
