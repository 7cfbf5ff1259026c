//! 预订引擎
//!
//! The reservation core: a pure overlap/pricing layer plus the per-room
//! lock registry that serializes check-then-insert against concurrent
//! requests.
//!
//! The engine is deliberately free of any persistence concern — it works
//! on explicit inputs (nightly rate, existing intervals, requested
//! interval) so the double-booking and pricing rules are testable on
//! their own.

pub mod engine;
pub mod locks;

#[cfg(test)]
mod tests;

pub use engine::{BookingError, StayRange, quote_total, to_decimal, to_f64};
pub use locks::RoomLocks;
