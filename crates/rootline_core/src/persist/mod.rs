//! File-backed family store collaborator.
//!
//! # Responsibility
//! - Read and write the whole family map as one JSON document.
//! - Provide the append-one-person merge used by write endpoints.
//!
//! # Invariants
//! - The file is always read and written wholesale.
//! - A missing file is created as an empty map `{}` on load.
//! - Failures surface as [`PersistError`]; tree logic never sees them.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;

pub use json_file::{append_person, load_family, save_family};

pub type PersistResult<T> = Result<T, PersistError>;

#[derive(Debug)]
pub enum PersistError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl PersistError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "family_io_failed",
            Self::Json { .. } => "family_json_invalid",
        }
    }
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "family file io failed at {}: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "family file {} is not valid JSON: {source}", path.display())
            }
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}
