//! Text renderings of family trees.

pub mod text;

pub use text::{truncate_with_ellipsis, TextRenderer};
