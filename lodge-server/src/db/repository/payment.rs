//! Payment Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::Payment;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const PAYMENT_TABLE: &str = "payment";

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find payment by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Payment>> {
        let thing = parse_id(PAYMENT_TABLE, id)?;
        let payment: Option<Payment> = self.base.db().select(thing).await?;
        Ok(payment)
    }

    /// The most recent payment attached to a booking
    pub async fn find_by_booking(&self, booking_id: &RecordId) -> RepoResult<Option<Payment>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM payment WHERE booking = $booking \
                 ORDER BY created_at DESC LIMIT 1",
            )
            .bind(("booking", booking_id.clone()))
            .await?;
        let payments: Vec<Payment> = result.take(0)?;
        Ok(payments.into_iter().next())
    }

    /// Persist a new payment
    pub async fn create(&self, payment: Payment) -> RepoResult<Payment> {
        let created: Option<Payment> = self
            .base
            .db()
            .create(PAYMENT_TABLE)
            .content(payment)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment".to_string()))
    }

    /// Settle a payment: payment.status -> success, booking.payment_status -> paid
    ///
    /// Both writes run in one transaction so a settled payment can never
    /// coexist with an unpaid booking.
    pub async fn settle(&self, payment_id: &RecordId) -> RepoResult<Payment> {
        let payment = self
            .find_by_id(&payment_id.to_string())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Payment {} not found", payment_id)))?;

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE $payment SET status = 'success'; \
                 UPDATE $booking SET payment_status = 'paid'; \
                 COMMIT TRANSACTION;",
            )
            .bind(("payment", payment_id.clone()))
            .bind(("booking", payment.booking.clone()))
            .await?
            .check()?;

        self.find_by_id(&payment_id.to_string())
            .await?
            .ok_or_else(|| RepoError::Database("Failed to settle payment".to_string()))
    }
}
