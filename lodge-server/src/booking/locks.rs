//! Per-room booking locks
//!
//! 每个房间一把锁：重叠检查和写入在同一把锁下执行，
//! 两个并发请求不可能同时通过检查。
//!
//! The overlap query and the subsequent insert are not atomic on their
//! own; serializing them per room closes the double-booking race while
//! leaving bookings for different rooms fully concurrent. Lock entries
//! are tiny and bounded by the number of rooms, so they are never
//! evicted.

use dashmap::DashMap;
use std::sync::Arc;
use surrealdb::RecordId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async mutex per room
#[derive(Debug, Default)]
pub struct RoomLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Acquire the lock for a room, waiting if another booking for the
    /// same room is in flight. The guard must be held across the overlap
    /// check and the insert.
    pub async fn acquire(&self, room_id: &RecordId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(room_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
