//! Layout engine: positions cards, connectors and toggles for a forest.
//!
//! # Responsibility
//! - Resolve card content and colour per node.
//! - Lay out couples, children rows and connectors top-down.
//! - Track per-node collapse state and viewport scaling.
//!
//! # Invariants
//! - Layout is a pure function of (forest, collapse state, options); the
//!   same inputs always produce the same geometry.
//! - A collapsed node keeps its own cards and toggle; its subtree and the
//!   connectors below it are not emitted.

pub mod card;
pub mod collapse;
pub mod engine;
pub mod geometry;
pub mod viewport;

pub use card::{card_content, resolve_card_color, CardColor, CardContent, CardOptions, CardRole};
pub use collapse::CollapseState;
pub use engine::{
    Connector, ConnectorKind, HitTarget, LayoutEngine, LayoutStyle, PlacedCard, Toggle,
    TreeLayout,
};
pub use geometry::{Point, Rect, Size};
pub use viewport::{auto_fit_scale, Viewport, Zoom};
