//! Core domain logic for Rootline, a family-tree viewer and record keeper.
//! This crate is the single source of truth for relationship invariants.

pub mod exchange;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod model;
pub mod persist;
pub mod render;
pub mod repo;
pub mod seed;
pub mod service;
pub mod settings;
pub mod tree;

pub use exchange::{export, export_csv, export_json, merge_family_json, ExchangeError, ExportFormat};
pub use interaction::{
    ClickTarget, DeleteConfirmation, InteractionController, InteractionOutcome, PersonForm,
    Selection,
};
pub use layout::{CollapseState, LayoutEngine, TreeLayout, Viewport, Zoom};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::document::{DocumentKind, FamilyDocument};
pub use model::event::{EventKind, FamilyEvent};
pub use model::person::{Gender, MaritalStatus, Person, PersonId, PersonPatch};
pub use model::snapshot::FamilySnapshot;
pub use persist::{append_person, load_family, save_family, PersistError, PersistResult};
pub use render::TextRenderer;
pub use repo::person_repo::{InMemoryPersonRepository, PersonLookup, PersonRepository};
pub use service::archive::{ArchiveError, FamilyArchive};
pub use service::person_service::{AddOutcome, MemberFilter, PersonService};
pub use settings::{Settings, SettingsError, SettingsPatch};
pub use tree::{BuildOptions, FamilyNode, Forest, TreeBuilder};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
