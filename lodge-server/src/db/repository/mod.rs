//! Repository Module
//!
//! Provides CRUD operations for the SurrealDB tables.

pub mod booking;
pub mod payment;
pub mod review;
pub mod room;
pub mod user;

// Re-exports
pub use booking::BookingRepository;
pub use payment::PaymentRepository;
pub use review::ReviewRepository;
pub use room::RoomRepository;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - API 输入可以是 "room:abc" 也可以是裸 "abc"
//   - 序列化输出永远是 "table:id" (见 models::serde_helpers)

/// Parse an API-supplied id into a RecordId for the given table.
///
/// Accepts both `"table:key"` and bare `"key"` forms; rejects ids that
/// name a different table.
pub fn parse_id(table: &str, id: &str) -> RepoResult<RecordId> {
    match id.split_once(':') {
        Some((tb, key)) if tb == table && !key.is_empty() => {
            Ok(RecordId::from_table_key(tb, key))
        }
        Some(_) => Err(RepoError::Validation(format!(
            "Invalid {} id: {}",
            table, id
        ))),
        None if !id.is_empty() => Ok(RecordId::from_table_key(table, id)),
        None => Err(RepoError::Validation(format!("Empty {} id", table))),
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
