//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep relationship integrity rules out of UI-facing layers.
//!
//! # See also
//! - `crate::tree` for the read side built on top of these services

pub mod archive;
pub mod person_service;
pub mod relationship;
