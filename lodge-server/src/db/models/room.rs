//! Room Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type RoomId = RecordId;
pub type RoomImageId = RecordId;

/// Room availability status (admin-managed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Maintenance,
}

/// Room model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RoomId>,
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: String,
    /// Nightly rate; Decimal arithmetic happens in the booking engine
    pub price: f64,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
    #[serde(default)]
    pub description: String,
    pub status: RoomStatus,
    #[serde(default)]
    pub created_at: i64,
}

fn default_capacity() -> i32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreate {
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub price: f64,
    pub capacity: Option<i32>,
    pub description: Option<String>,
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomUpdate {
    pub room_number: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<String>,
    pub price: Option<f64>,
    pub capacity: Option<i32>,
    pub description: Option<String>,
    pub status: Option<RoomStatus>,
}

/// Stored image attached to a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomImage {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RoomImageId>,
    #[serde(with = "serde_helpers::record_id")]
    pub room: RoomId,
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Room with its image gallery (API read model)
#[derive(Debug, Clone, Serialize)]
pub struct RoomFull {
    #[serde(flatten)]
    pub room: Room,
    pub images: Vec<RoomImage>,
}
