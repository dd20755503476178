//! Family document metadata model.
//!
//! File bytes live with an external storage collaborator; this record only
//! keeps the reference and descriptive metadata.

use crate::model::person::PersonId;
use crate::model::{now_epoch_ms, LinkedRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Photo,
    Certificate,
    Story,
    Document,
    Other,
}

/// Uploaded file metadata linked to zero or more persons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDocument {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub file_url: String,
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    pub mime_type: String,
    #[serde(default)]
    pub person_ids: Vec<PersonId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub uploaded_by: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl FamilyDocument {
    /// Creates document metadata with a generated id.
    pub fn new(
        kind: DocumentKind,
        title: impl Into<String>,
        file_url: impl Into<String>,
        file_size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        let file_url = file_url.into();
        let file_name = file_url
            .rsplit('/')
            .next()
            .unwrap_or(file_url.as_str())
            .to_string();
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            kind,
            file_url,
            file_name,
            file_size,
            mime_type: mime_type.into(),
            person_ids: Vec::new(),
            tags: Vec::new(),
            is_public: false,
            uploaded_by: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_persons<I, S>(mut self, person_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PersonId>,
    {
        self.person_ids = person_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Applies a partial update and refreshes `updated_at`.
    pub fn apply(&mut self, patch: &DocumentPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(person_ids) = &patch.person_ids {
            self.person_ids = person_ids.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }
        self.touch(now_epoch_ms());
    }
}

/// Partial document update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub kind: Option<DocumentKind>,
    pub person_ids: Option<Vec<PersonId>>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

impl LinkedRecord for FamilyDocument {
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
