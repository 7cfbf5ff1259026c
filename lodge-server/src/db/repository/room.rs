//! Room Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Room, RoomCreate, RoomImage, RoomStatus, RoomUpdate};
use chrono::NaiveDate;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const ROOM_TABLE: &str = "room";
const ROOM_IMAGE_TABLE: &str = "room_image";

// =============================================================================
// Room Repository
// =============================================================================

#[derive(Clone)]
pub struct RoomRepository {
    base: BaseRepository,
}

impl RoomRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all rooms ordered by room number
    pub async fn find_all(&self, limit: usize, start: usize) -> RepoResult<Vec<Room>> {
        let rooms: Vec<Room> = self
            .base
            .db()
            .query("SELECT * FROM room ORDER BY room_number LIMIT $limit START $start")
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?
            .take(0)?;
        Ok(rooms)
    }

    /// Find room by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Room>> {
        let thing = parse_id(ROOM_TABLE, id)?;
        let room: Option<Room> = self.base.db().select(thing).await?;
        Ok(room)
    }

    /// Find room by room number
    pub async fn find_by_number(&self, room_number: &str) -> RepoResult<Option<Room>> {
        let number_owned = room_number.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM room WHERE room_number = $number LIMIT 1")
            .bind(("number", number_owned))
            .await?;
        let rooms: Vec<Room> = result.take(0)?;
        Ok(rooms.into_iter().next())
    }

    /// Rooms with no non-cancelled booking overlapping [check_in, check_out)
    ///
    /// Rooms under maintenance are excluded. The booked-room set is fetched
    /// first, then filtered out on the Rust side.
    pub async fn find_available(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> RepoResult<Vec<Room>> {
        let booked: Vec<RecordId> = self
            .base
            .db()
            .query(
                "SELECT VALUE room FROM booking \
                 WHERE booking_status != 'cancelled' \
                 AND check_in < $check_out AND check_out > $check_in",
            )
            .bind(("check_in", check_in))
            .bind(("check_out", check_out))
            .await?
            .take(0)?;

        let rooms: Vec<Room> = self
            .base
            .db()
            .query("SELECT * FROM room WHERE status = 'available' ORDER BY room_number")
            .await?
            .take(0)?;

        Ok(rooms
            .into_iter()
            .filter(|r| match &r.id {
                Some(id) => !booked.contains(id),
                None => false,
            })
            .collect())
    }

    /// Create a new room
    pub async fn create(&self, data: RoomCreate) -> RepoResult<Room> {
        // Room numbers are unique
        if self.find_by_number(&data.room_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Room number '{}' already exists",
                data.room_number
            )));
        }

        let room = Room {
            id: None,
            room_number: data.room_number,
            room_type: data.room_type,
            price: data.price,
            capacity: data.capacity.unwrap_or(2),
            description: data.description.unwrap_or_default(),
            status: data.status.unwrap_or(RoomStatus::Available),
            created_at: chrono::Utc::now().timestamp(),
        };

        let created: Option<Room> = self.base.db().create(ROOM_TABLE).content(room).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create room".to_string()))
    }

    /// Update a room (field-level partial update)
    pub async fn update(&self, id: &str, data: RoomUpdate) -> RepoResult<Room> {
        let thing = parse_id(ROOM_TABLE, id)?;

        // Check duplicate room number if changing
        if let Some(ref new_number) = data.room_number
            && let Some(other) = self.find_by_number(new_number).await?
            && other.id.as_ref() != Some(&thing)
        {
            return Err(RepoError::Duplicate(format!(
                "Room number '{}' already exists",
                new_number
            )));
        }

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = Vec::new();
        if data.room_number.is_some() {
            set_parts.push("room_number = $room_number");
        }
        if data.room_type.is_some() {
            set_parts.push("type = $type");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.capacity.is_some() {
            set_parts.push("capacity = $capacity");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.status.is_some() {
            set_parts.push("status = $status");
        }

        if set_parts.is_empty() {
            // No fields to update
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Room {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(&query_str).bind(("thing", thing));
        if let Some(v) = data.room_number {
            query = query.bind(("room_number", v));
        }
        if let Some(v) = data.room_type {
            query = query.bind(("type", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.capacity {
            query = query.bind(("capacity", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.status {
            query = query.bind(("status", v));
        }

        let mut result = query.await?;
        result
            .take::<Option<Room>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Room {} not found", id)))
    }

    /// Hard delete a room (also cleans up its images)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_id(ROOM_TABLE, id)?;

        // Clean up image records first
        self.base
            .db()
            .query("DELETE room_image WHERE room = $room")
            .bind(("room", thing.clone()))
            .await?;

        let deleted: Option<Room> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Room {} not found", id)));
        }
        Ok(())
    }

    // =========================================================================
    // Room Images
    // =========================================================================

    /// Images attached to a room, primary first
    pub async fn find_images(&self, room_id: &RecordId) -> RepoResult<Vec<RoomImage>> {
        let images: Vec<RoomImage> = self
            .base
            .db()
            .query("SELECT * FROM room_image WHERE room = $room ORDER BY is_primary DESC")
            .bind(("room", room_id.clone()))
            .await?
            .take(0)?;
        Ok(images)
    }

    /// Find a single image record
    pub async fn find_image_by_id(&self, image_id: &str) -> RepoResult<Option<RoomImage>> {
        let thing = parse_id(ROOM_IMAGE_TABLE, image_id)?;
        let image: Option<RoomImage> = self.base.db().select(thing).await?;
        Ok(image)
    }

    /// Attach an image to a room
    pub async fn add_image(&self, image: RoomImage) -> RepoResult<RoomImage> {
        // Demoting previous primary keeps at most one primary per room
        if image.is_primary {
            self.base
                .db()
                .query("UPDATE room_image SET is_primary = false WHERE room = $room")
                .bind(("room", image.room.clone()))
                .await?;
        }

        let created: Option<RoomImage> = self
            .base
            .db()
            .create(ROOM_IMAGE_TABLE)
            .content(image)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create room image".to_string()))
    }

    /// Detach an image record
    pub async fn delete_image(&self, image_id: &str) -> RepoResult<RoomImage> {
        let thing = parse_id(ROOM_IMAGE_TABLE, image_id)?;
        let deleted: Option<RoomImage> = self.base.db().delete(thing).await?;
        deleted.ok_or_else(|| RepoError::NotFound(format!("Image {} not found", image_id)))
    }

    /// How many image records still reference a stored file
    ///
    /// Files are content-addressed, so the same url may back several rooms.
    pub async fn count_images_by_url(&self, url: &str) -> RepoResult<usize> {
        let url_owned = url.to_string();
        let images: Vec<RoomImage> = self
            .base
            .db()
            .query("SELECT * FROM room_image WHERE url = $url")
            .bind(("url", url_owned))
            .await?
            .take(0)?;
        Ok(images.len())
    }
}
