//! Person domain model.
//!
//! # Responsibility
//! - Define the central person record with relationship references.
//! - Provide derived display helpers (name, life dates, age, status).
//! - Provide partial-update semantics through [`PersonPatch`].
//!
//! # Invariants
//! - `id` is stable and never rewritten by patches.
//! - `spouse_id`, `children` and `parents` may hold ids that do not resolve;
//!   consumers must filter them instead of failing.
//! - A literal date string wins over a bare year for display.
//!
//! # See also
//! - `crate::service::relationship` for cross-record cleanup

use crate::model::now_epoch_ms;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable identifier of a person record.
///
/// Kept as a string alias because imported family files use arbitrary keys.
pub type PersonId = String;

/// Gender used for card colouring and relationship captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

/// Marital status with free-form fallback.
///
/// Serialized as a plain string; unknown values round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaritalStatus {
    Married,
    Unmarried,
    Other(String),
}

impl From<String> for MaritalStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "married" => Self::Married,
            "unmarried" => Self::Unmarried,
            _ => Self::Other(value),
        }
    }
}

impl From<MaritalStatus> for String {
    fn from(value: MaritalStatus) -> Self {
        match value {
            MaritalStatus::Married => "married".to_string(),
            MaritalStatus::Unmarried => "unmarried".to_string(),
            MaritalStatus::Other(raw) => raw,
        }
    }
}

/// Validation errors for person records entering the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    /// `id` is blank after trim.
    EmptyId,
    /// Person lists itself as spouse.
    SelfSpouse(PersonId),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "person id must not be blank"),
            Self::SelfSpouse(id) => write!(f, "person {id} cannot be their own spouse"),
        }
    }
}

impl Error for PersonValidationError {}

/// Canonical person record.
///
/// Serialized in camelCase to match the persisted family file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Snapshot readers overwrite this with the map key.
    #[serde(default)]
    pub id: PersonId,
    /// Full display name as entered. Empty means "derive from parts".
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: String,
    /// Free text; does not have to resolve to a person id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse_id: Option<PersonId>,
    /// Ordered child ids. Uniqueness is expected, not enforced.
    #[serde(default)]
    pub children: Vec<PersonId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
    /// Image URL. `None` renders a placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Explicit liveness flag. `None` means "alive unless a death year exists".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_alive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Epoch ms creation timestamp.
    #[serde(default)]
    pub created_at: i64,
    /// Epoch ms update timestamp, refreshed on every mutation.
    #[serde(default)]
    pub updated_at: i64,
}

impl Person {
    /// Creates a person with a generated stable id.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), first_name, last_name)
    }

    /// Creates a person with a caller-provided id.
    ///
    /// Used by import paths and fixtures where identity already exists.
    /// `name` starts empty so the display name follows the name parts.
    pub fn with_id(
        id: impl Into<PersonId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = now_epoch_ms();
        Self {
            id: id.into(),
            name: String::new(),
            first_name: first_name.into(),
            middle_name: None,
            last_name: last_name.into(),
            father_name: None,
            mother_name: None,
            marital_status: None,
            spouse_id: None,
            children: Vec::new(),
            parents: Vec::new(),
            birth_date: None,
            birth_year: None,
            death_date: None,
            death_year: None,
            image: None,
            gender: None,
            occupation: None,
            location: None,
            is_alive: None,
            biography: None,
            notes: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks store-entry invariants.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.id.trim().is_empty() {
            return Err(PersonValidationError::EmptyId);
        }
        if self.spouse_id.as_deref() == Some(self.id.as_str()) {
            return Err(PersonValidationError::SelfSpouse(self.id.clone()));
        }
        Ok(())
    }

    /// Name shown on cards: explicit `name`, else first/middle/last joined.
    pub fn display_name(&self) -> String {
        let explicit = self.name.trim();
        if !explicit.is_empty() {
            return explicit.to_string();
        }
        join_name_parts(&[
            self.first_name.as_str(),
            self.middle_name.as_deref().unwrap_or(""),
            self.last_name.as_str(),
        ])
    }

    /// Lowercased, whitespace-collapsed display name used for duplicate checks.
    pub fn normalized_name(&self) -> String {
        WHITESPACE_RE
            .replace_all(self.display_name().trim(), " ")
            .to_lowercase()
    }

    /// Last whitespace-separated token of the display name, lowercased.
    ///
    /// Returns an empty string when no name is present.
    pub fn surname(&self) -> String {
        let name = self.display_name();
        WHITESPACE_RE
            .split(name.trim())
            .filter(|part| !part.is_empty())
            .last()
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    /// Explicit flag when set, otherwise alive when no death year is recorded.
    pub fn is_alive(&self) -> bool {
        self.is_alive.unwrap_or(self.death_year.is_none())
    }

    /// Birth label: literal date string, else `b. YEAR`.
    pub fn birth_label(&self) -> Option<String> {
        life_label(self.birth_date.as_deref(), self.birth_year, "b.")
    }

    /// Death label: literal date string, else `d. YEAR`.
    pub fn death_label(&self) -> Option<String> {
        life_label(self.death_date.as_deref(), self.death_year, "d.")
    }

    /// Age in years at death, or at `current_year` while alive.
    pub fn age(&self, current_year: i32) -> Option<i32> {
        let birth_year = self.birth_year?;
        let end_year = if self.is_alive() {
            current_year
        } else {
            self.death_year.unwrap_or(current_year)
        };
        Some(end_year - birth_year)
    }

    /// Human readable life status, e.g. `42 years old` or `Died at 60 (1940)`.
    pub fn life_status(&self, current_year: i32) -> String {
        let age = self.age(current_year).filter(|age| *age != 0);
        if self.is_alive() {
            return match age {
                Some(age) => format!("{age} years old"),
                None => "Age unknown".to_string(),
            };
        }
        let death = self
            .death_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "unknown year".to_string());
        match age {
            Some(age) if self.death_year.is_some() => format!("Died at {age} ({death})"),
            _ => format!("Died in {death}"),
        }
    }

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// The record id is never touched.
    pub fn apply(&mut self, patch: &PersonPatch) {
        apply_value(&mut self.name, &patch.name);
        apply_value(&mut self.first_name, &patch.first_name);
        apply_value(&mut self.last_name, &patch.last_name);
        apply_value(&mut self.middle_name, &patch.middle_name);
        apply_value(&mut self.father_name, &patch.father_name);
        apply_value(&mut self.mother_name, &patch.mother_name);
        apply_value(&mut self.marital_status, &patch.marital_status);
        apply_value(&mut self.spouse_id, &patch.spouse_id);
        apply_value(&mut self.children, &patch.children);
        apply_value(&mut self.parents, &patch.parents);
        apply_value(&mut self.birth_date, &patch.birth_date);
        apply_value(&mut self.birth_year, &patch.birth_year);
        apply_value(&mut self.death_date, &patch.death_date);
        apply_value(&mut self.death_year, &patch.death_year);
        apply_value(&mut self.image, &patch.image);
        apply_value(&mut self.gender, &patch.gender);
        apply_value(&mut self.occupation, &patch.occupation);
        apply_value(&mut self.location, &patch.location);
        apply_value(&mut self.is_alive, &patch.is_alive);
        apply_value(&mut self.biography, &patch.biography);
        apply_value(&mut self.notes, &patch.notes);
        apply_value(&mut self.tags, &patch.tags);
        self.updated_at = now_epoch_ms().max(self.updated_at);
    }
}

/// Partial person update.
///
/// Outer `None` leaves a field untouched. For optional fields the inner value
/// is the new state, so `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<Option<String>>,
    pub father_name: Option<Option<String>>,
    pub mother_name: Option<Option<String>>,
    pub marital_status: Option<Option<MaritalStatus>>,
    pub spouse_id: Option<Option<PersonId>>,
    pub children: Option<Vec<PersonId>>,
    pub parents: Option<Vec<PersonId>>,
    pub birth_date: Option<Option<String>>,
    pub birth_year: Option<Option<i32>>,
    pub death_date: Option<Option<String>>,
    pub death_year: Option<Option<i32>>,
    pub image: Option<Option<String>>,
    pub gender: Option<Option<Gender>>,
    pub occupation: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub is_alive: Option<Option<bool>>,
    pub biography: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl PersonPatch {
    /// Returns whether this patch changes the spouse link.
    pub fn touches_spouse(&self) -> bool {
        self.spouse_id.is_some()
    }
}

fn apply_value<T: Clone>(slot: &mut T, update: &Option<T>) {
    if let Some(value) = update {
        *slot = value.clone();
    }
}

fn life_label(date: Option<&str>, year: Option<i32>, prefix: &str) -> Option<String> {
    match date.map(str::trim).filter(|value| !value.is_empty()) {
        Some(date) => Some(date.to_string()),
        None => year.map(|year| format!("{prefix} {year}")),
    }
}

fn join_name_parts(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{Gender, MaritalStatus, Person, PersonPatch, PersonValidationError};

    #[test]
    fn display_name_prefers_explicit_name() {
        let mut person = Person::with_id("p1", "Ram", "Shrestha");
        person.middle_name = Some("Bahadur".to_string());
        assert_eq!(person.display_name(), "Ram Bahadur Shrestha");

        person.name = " Ram Shrestha ".to_string();
        assert_eq!(person.display_name(), "Ram Shrestha");

        person.name = "  ".to_string();
        assert_eq!(person.display_name(), "Ram Bahadur Shrestha");
    }

    #[test]
    fn display_name_follows_edited_name_parts() {
        let mut person = Person::with_id("p1", "Ram", "Shrestha");
        person.apply(&PersonPatch {
            first_name: Some("Hari".to_string()),
            middle_name: Some(Some("Bahadur".to_string())),
            ..PersonPatch::default()
        });
        assert!(person.name.is_empty());
        assert_eq!(person.display_name(), "Hari Bahadur Shrestha");
        assert_eq!(person.surname(), "shrestha");
    }

    #[test]
    fn normalized_name_collapses_whitespace_and_case() {
        let mut person = Person::with_id("p1", "", "");
        person.name = "  Sita   DEVI ".to_string();
        assert_eq!(person.normalized_name(), "sita devi");
        assert_eq!(person.surname(), "devi");
    }

    #[test]
    fn is_alive_defaults_to_missing_death_year() {
        let mut person = Person::with_id("p1", "A", "B");
        assert!(person.is_alive());
        person.death_year = Some(1990);
        assert!(!person.is_alive());
        person.is_alive = Some(true);
        assert!(person.is_alive());
    }

    #[test]
    fn life_labels_prefer_date_over_year() {
        let mut person = Person::with_id("p1", "A", "B");
        person.birth_year = Some(1910);
        assert_eq!(person.birth_label().as_deref(), Some("b. 1910"));
        person.birth_date = Some("1910-04-02".to_string());
        assert_eq!(person.birth_label().as_deref(), Some("1910-04-02"));
        assert_eq!(person.death_label(), None);
    }

    #[test]
    fn life_status_reports_age_or_death() {
        let mut person = Person::with_id("p1", "A", "B");
        assert_eq!(person.life_status(2026), "Age unknown");
        person.birth_year = Some(1980);
        assert_eq!(person.life_status(2026), "46 years old");
        person.death_year = Some(2020);
        assert_eq!(person.life_status(2026), "Died at 40 (2020)");
        person.birth_year = None;
        assert_eq!(person.life_status(2026), "Died in 2020");
    }

    #[test]
    fn apply_patch_keeps_id_and_clears_optional_fields() {
        let mut person = Person::with_id("p1", "A", "B");
        person.location = Some("Pokhara".to_string());
        person.updated_at = 1;
        let patch = PersonPatch {
            name: Some("Renamed".to_string()),
            location: Some(None),
            gender: Some(Some(Gender::Female)),
            ..PersonPatch::default()
        };
        person.apply(&patch);

        assert_eq!(person.id, "p1");
        assert_eq!(person.name, "Renamed");
        assert_eq!(person.location, None);
        assert_eq!(person.gender, Some(Gender::Female));
        assert!(person.updated_at > 1);
    }

    #[test]
    fn validate_rejects_blank_id_and_self_spouse() {
        let blank = Person::with_id(" ", "A", "B");
        assert_eq!(blank.validate(), Err(PersonValidationError::EmptyId));

        let mut selfish = Person::with_id("p1", "A", "B");
        selfish.spouse_id = Some("p1".to_string());
        assert!(matches!(
            selfish.validate(),
            Err(PersonValidationError::SelfSpouse(_))
        ));
    }

    #[test]
    fn marital_status_keeps_free_form_values() {
        let parsed: MaritalStatus = serde_json::from_str("\"Married\"").unwrap();
        assert_eq!(parsed, MaritalStatus::Married);
        let custom: MaritalStatus = serde_json::from_str("\"widowed\"").unwrap();
        assert_eq!(
            serde_json::to_string(&custom).unwrap(),
            "\"widowed\"".to_string()
        );
    }

    #[test]
    fn deserializes_sparse_camel_case_record() {
        let person: Person = serde_json::from_str(
            r#"{"id":"7","name":"Prakash Shrestha","spouseId":"8","children":["9"],"birthYear":1940,"gender":"male"}"#,
        )
        .unwrap();
        assert_eq!(person.spouse_id.as_deref(), Some("8"));
        assert_eq!(person.children, vec!["9".to_string()]);
        assert_eq!(person.birth_year, Some(1940));
        assert!(person.parents.is_empty());
    }
}
