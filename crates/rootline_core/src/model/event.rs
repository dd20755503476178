//! Family event model.
//!
//! # Responsibility
//! - Define date-stamped occurrences linked to zero or more persons.
//! - Provide a chronological sort key for timeline views.
//!
//! # Invariants
//! - Event lifecycle is independent from person lifecycle.
//! - Dates that cannot be parsed sort after every parseable date.

use crate::model::person::PersonId;
use crate::model::{now_epoch_ms, LinkedRecord};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Birthday,
    Anniversary,
    Wedding,
    Death,
    Graduation,
    Other,
}

/// Date-stamped family occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-like date string (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
    pub date: String,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub person_ids: Vec<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_days: Option<u32>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl FamilyEvent {
    /// Creates an event with a generated id.
    pub fn new(kind: EventKind, title: impl Into<String>, date: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            date: date.into(),
            kind,
            person_ids: Vec::new(),
            location: None,
            photos: Vec::new(),
            documents: Vec::new(),
            is_recurring: false,
            reminder_days: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style person link helper.
    pub fn with_persons<I, S>(mut self, person_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PersonId>,
    {
        self.person_ids = person_ids.into_iter().map(Into::into).collect();
        self
    }

    /// `(year, month, day)` key for `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    ///
    /// Missing month/day count as 1. Returns `None` for calendar-invalid
    /// dates, other layouts and trailing text.
    pub fn date_key(&self) -> Option<(i32, u32, u32)> {
        let trimmed = self.date.trim();
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
            .ok()
            .or_else(|| year_only(trimmed).and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)))?;
        Some((date.year(), date.month(), date.day()))
    }

    /// Applies a partial update and refreshes `updated_at`.
    pub fn apply(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(date) = &patch.date {
            self.date = date.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(person_ids) = &patch.person_ids {
            self.person_ids = person_ids.clone();
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(is_recurring) = patch.is_recurring {
            self.is_recurring = is_recurring;
        }
        if let Some(reminder_days) = patch.reminder_days {
            self.reminder_days = reminder_days;
        }
        self.touch(now_epoch_ms());
    }
}

fn year_only(value: &str) -> Option<i32> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Partial event update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub date: Option<String>,
    pub kind: Option<EventKind>,
    pub person_ids: Option<Vec<PersonId>>,
    pub location: Option<Option<String>>,
    pub is_recurring: Option<bool>,
    pub reminder_days: Option<Option<u32>>,
}

impl LinkedRecord for FamilyEvent {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn person_ids(&self) -> &[PersonId] {
        &self.person_ids
    }

    fn person_ids_mut(&mut self) -> &mut Vec<PersonId> {
        &mut self.person_ids
    }

    fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms.max(self.updated_at);
    }
}
