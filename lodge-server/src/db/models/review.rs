//! Review Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ReviewId = RecordId;

/// Guest review, one per completed booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ReviewId>,
    #[serde(with = "serde_helpers::record_id")]
    pub booking: RecordId,
    /// Copied from the booking at creation time, never caller-supplied
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub room: RecordId,
    /// 1-5 inclusive
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: i64,
}

/// Create review payload (member)
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreate {
    /// Booking record id ("booking:xyz")
    pub booking: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}
