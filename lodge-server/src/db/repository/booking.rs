//! Booking Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Booking, BookingPaymentStatus, BookingStatus};
use chrono::NaiveDate;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const BOOKING_TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all bookings, newest first
    pub async fn find_all(&self, limit: usize, start: usize) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking ORDER BY created_at DESC LIMIT $limit START $start")
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let thing = parse_id(BOOKING_TABLE, id)?;
        let booking: Option<Booking> = self.base.db().select(thing).await?;
        Ok(booking)
    }

    /// Booking history for one member, newest first
    pub async fn find_by_user(
        &self,
        user_id: &RecordId,
        limit: usize,
        start: usize,
    ) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE user = $user \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .bind(("user", user_id.clone()))
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Non-cancelled bookings for a room whose interval overlaps
    /// [check_in, check_out)
    ///
    /// ISO dates compare correctly as strings, so the half-open overlap
    /// test is expressed directly in the query.
    pub async fn find_overlapping(
        &self,
        room_id: &RecordId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE room = $room \
                 AND booking_status != 'cancelled' \
                 AND check_in < $check_out AND check_out > $check_in",
            )
            .bind(("room", room_id.clone()))
            .bind(("check_in", check_in))
            .bind(("check_out", check_out))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Persist a new booking
    pub async fn create(&self, booking: Booking) -> RepoResult<Booking> {
        let created: Option<Booking> = self
            .base
            .db()
            .create(BOOKING_TABLE)
            .content(booking)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Update booking lifecycle status
    pub async fn update_status(&self, id: &str, status: BookingStatus) -> RepoResult<Booking> {
        let thing = parse_id(BOOKING_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET booking_status = $status RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .await?;
        result
            .take::<Option<Booking>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// Update booking payment status
    pub async fn update_payment_status(
        &self,
        id: &str,
        status: BookingPaymentStatus,
    ) -> RepoResult<Booking> {
        let thing = parse_id(BOOKING_TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET payment_status = $status RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .await?;
        result
            .take::<Option<Booking>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// Hard delete a booking
    ///
    /// Callers must enforce the cancelled+unpaid precondition before
    /// reaching this point.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_id(BOOKING_TABLE, id)?;
        let deleted: Option<Booking> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Booking {} not found", id)));
        }
        Ok(())
    }
}
