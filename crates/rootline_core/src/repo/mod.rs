//! Repository layer abstractions and in-memory implementations.
//!
//! # Responsibility
//! - Define the keyed get/put/remove contract the rest of core consumes.
//! - Keep storage details swappable behind traits.
//!
//! # Invariants
//! - Repositories never rewrite record ids.
//! - Iteration order is insertion order.
//!
//! # See also
//! - `crate::model::snapshot` for the ordered exchange shape

pub mod person_repo;
pub mod record_repo;
