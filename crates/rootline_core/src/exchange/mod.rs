//! Family export and import.
//!
//! # Responsibility
//! - Export the current store snapshot as JSON or CSV.
//! - Merge an id-keyed JSON family map back into a store.
//!
//! # Invariants
//! - JSON export is the same id-keyed object the file store persists.
//! - CSV export has a fixed column set and header.
//! - Imported records keep every field except `updatedAt`, which refreshes.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::string::FromUtf8Error;

mod csv_export;
mod json;

pub use csv_export::{export_csv, CSV_COLUMNS, CSV_HEADER};
pub use json::{export_json, merge_family_json};

use crate::repo::person_repo::PersonLookup;
use log::warn;

/// Supported export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    /// Listed for completeness; not implemented.
    Gedcom,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Gedcom => "gedcom",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Gedcom => "ged",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "gedcom" | "ged" => Some(Self::Gedcom),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ExchangeError {
    Json(serde_json::Error),
    Csv(csv::Error),
    /// Writer produced bytes that are not UTF-8.
    Encoding(FromUtf8Error),
    Unsupported(ExportFormat),
}

impl Display for ExchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "csv export failed: {err}"),
            Self::Encoding(err) => write!(f, "csv export is not valid UTF-8: {err}"),
            Self::Unsupported(format) => {
                write!(f, "export format `{}` is not supported", format.as_str())
            }
        }
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Encoding(err) => Some(err),
            Self::Unsupported(_) => None,
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<csv::Error> for ExchangeError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<FromUtf8Error> for ExchangeError {
    fn from(value: FromUtf8Error) -> Self {
        Self::Encoding(value)
    }
}

/// Exports every person in `format`.
pub fn export<L: PersonLookup + ?Sized>(
    lookup: &L,
    format: ExportFormat,
) -> Result<String, ExchangeError> {
    match format {
        ExportFormat::Json => export_json(lookup),
        ExportFormat::Csv => export_csv(lookup),
        ExportFormat::Gedcom => {
            warn!(
                "event=family_export module=exchange status=skipped reason=unsupported format={}",
                format.as_str()
            );
            Err(ExchangeError::Unsupported(format))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{export, ExchangeError, ExportFormat};
    use crate::repo::person_repo::InMemoryPersonRepository;

    #[test]
    fn gedcom_is_unsupported() {
        let repo = InMemoryPersonRepository::new();
        let err = export(&repo, ExportFormat::Gedcom).unwrap_err();
        assert!(matches!(err, ExchangeError::Unsupported(ExportFormat::Gedcom)));
        assert_eq!(err.to_string(), "export format `gedcom` is not supported");
    }

    #[test]
    fn format_names_parse() {
        assert_eq!(ExportFormat::parse(" CSV "), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("ged"), Some(ExportFormat::Gedcom));
        assert_eq!(ExportFormat::parse("xml"), None);
    }
}
