//! Family domain model.
//!
//! # Responsibility
//! - Define the canonical person, event and document records.
//! - Provide the ordered id-keyed snapshot shape used by JSON exchange.
//!
//! # Invariants
//! - Every record is identified by a stable string id that never changes.
//! - Timestamps are Unix epoch milliseconds.
//!
//! # See also
//! - `crate::repo::person_repo` for keyed storage

pub mod document;
pub mod event;
pub mod person;
pub mod snapshot;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns current wall-clock time in epoch milliseconds.
///
/// Falls back to `0` when the system clock is set before the Unix epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Records that reference zero or more persons by id.
///
/// Events and documents share this contract so person deletion can unlink
/// them without knowing their concrete shape.
pub trait LinkedRecord {
    /// Stable record id.
    fn record_id(&self) -> &str;
    /// Linked person ids.
    fn person_ids(&self) -> &[person::PersonId];
    /// Mutable access to linked person ids.
    fn person_ids_mut(&mut self) -> &mut Vec<person::PersonId>;
    /// Refreshes the update timestamp.
    fn touch(&mut self, now_ms: i64);
}
