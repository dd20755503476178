//! Interaction controller: single active-person selection and edit flow.
//!
//! # Responsibility
//! - Route card, toggle and background clicks to selection changes.
//! - Drive the view/edit/delete flow against the family archive.
//! - Own per-session UI state (collapse set, zoom, preferred root).
//!
//! # Invariants
//! - At most one person is active at any time.
//! - Delete only reaches the store after an explicit confirmation.
//! - Invalid numeric form input is dropped, never rejected.

pub mod controller;
pub mod form;

pub use controller::{
    ClickTarget, DeleteConfirmation, InteractionController, InteractionOutcome, Selection,
};
pub use form::{parse_year, PersonForm};
