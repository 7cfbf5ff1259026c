//! Database Models
//!
//! Typed records for every SurrealDB table, plus the create/update payloads
//! the API accepts for them.

pub mod serde_helpers;

pub mod booking;
pub mod payment;
pub mod review;
pub mod room;
pub mod user;

pub use booking::{Booking, BookingCreate, BookingId, BookingPaymentStatus, BookingStatus};
pub use payment::{Payment, PaymentCreate, PaymentId, PaymentStatus};
pub use review::{Review, ReviewCreate, ReviewId};
pub use room::{Room, RoomCreate, RoomFull, RoomId, RoomImage, RoomImageId, RoomStatus, RoomUpdate};
pub use user::{User, UserCreate, UserId, UserRole, UserUpdate};
