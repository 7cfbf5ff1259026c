//! Review Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::Review;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const REVIEW_TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all reviews, newest first
    pub async fn find_all(&self, limit: usize, start: usize) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review ORDER BY created_at DESC LIMIT $limit START $start")
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Find review by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let thing = parse_id(REVIEW_TABLE, id)?;
        let review: Option<Review> = self.base.db().select(thing).await?;
        Ok(review)
    }

    /// Reviews for one room, newest first
    pub async fn find_by_room(&self, room_id: &RecordId) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE room = $room ORDER BY created_at DESC")
            .bind(("room", room_id.clone()))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Reviews written by one member, newest first
    pub async fn find_by_user(&self, user_id: &RecordId) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_id.clone()))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// The (at most one) review attached to a booking
    pub async fn find_by_booking(&self, booking_id: &RecordId) -> RepoResult<Option<Review>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM review WHERE booking = $booking LIMIT 1")
            .bind(("booking", booking_id.clone()))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews.into_iter().next())
    }

    /// Persist a new review
    pub async fn create(&self, review: Review) -> RepoResult<Review> {
        let created: Option<Review> = self.base.db().create(REVIEW_TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// Hard delete a review (admin operation)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_id(REVIEW_TABLE, id)?;
        let deleted: Option<Review> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Review {} not found", id)));
        }
        Ok(())
    }
}
