//! Tree derivation from the flat person map.
//!
//! # Responsibility
//! - Turn stored persons into nested, depth-bounded view nodes.
//! - Provide relationship captions for rendered nodes.

pub mod builder;
pub mod labels;

pub use builder::{
    build_node, find_roots, get_children, get_spouse, pick_root, BuildOptions, FamilyNode, Forest,
    TreeBuilder, DEFAULT_MAX_DEPTH, EMPTY_STATE_MESSAGE,
};
