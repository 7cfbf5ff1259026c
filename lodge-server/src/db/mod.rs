//! Database Module
//!
//! Handles the embedded SurrealDB instance (RocksDB backend) and schema
//! definitions.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "lodge";
const DATABASE: &str = "lodge";

/// Uniqueness and lookup indexes, applied on every startup
const SCHEMA: &str = "\
    DEFINE INDEX IF NOT EXISTS user_username ON user FIELDS username UNIQUE; \
    DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE; \
    DEFINE INDEX IF NOT EXISTS room_number ON room FIELDS room_number UNIQUE; \
    DEFINE INDEX IF NOT EXISTS booking_room ON booking FIELDS room; \
    DEFINE INDEX IF NOT EXISTS booking_user ON booking FIELDS user; \
    DEFINE INDEX IF NOT EXISTS review_booking ON review FIELDS booking UNIQUE; \
    DEFINE INDEX IF NOT EXISTS payment_txn ON payment FIELDS transaction_id UNIQUE;";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and apply the schema
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        db.query(SCHEMA)
            .await
            .and_then(|r| r.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {}", e)))?;

        tracing::info!(path = %db_path.display(), "Database connection established");

        Ok(Self { db })
    }
}
