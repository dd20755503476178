//! Family archive facade: persons, events and documents in one owner.
//!
//! # Responsibility
//! - Own the person store and the linked event/document collections.
//! - Validate person links on event/document writes.
//! - Unlink a deleted person from events and documents.
//!
//! # Invariants
//! - Deleting a person never deletes events or documents; it only removes
//!   the person id from their links.
//! - New or patched events/documents may only link persons that exist.

use crate::model::document::{DocumentPatch, FamilyDocument};
use crate::model::event::{EventPatch, FamilyEvent};
use crate::model::now_epoch_ms;
use crate::model::person::{Person, PersonId, PersonPatch};
use crate::model::snapshot::FamilySnapshot;
use crate::repo::person_repo::{InMemoryPersonRepository, PersonLookup, PersonRepository};
use crate::repo::record_repo::RecordRepository;
use crate::service::person_service::{AddOutcome, DeleteReport, PersonService};
use log::info;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from archive-level writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// A linked person id does not exist.
    PersonNotFound(PersonId),
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonNotFound(id) => write!(f, "linked person not found: {id}"),
        }
    }
}

impl Error for ArchiveError {}

/// Result of [`FamilyArchive::delete_person`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDeleteReport {
    pub person: DeleteReport,
    pub unlinked_events: usize,
    pub unlinked_documents: usize,
}

/// Single owner of all family records for one session.
pub struct FamilyArchive<R: PersonRepository = InMemoryPersonRepository> {
    persons: PersonService<R>,
    events: RecordRepository<FamilyEvent>,
    documents: RecordRepository<FamilyDocument>,
}

impl FamilyArchive<InMemoryPersonRepository> {
    /// Empty in-memory archive.
    pub fn in_memory() -> Self {
        Self::new(InMemoryPersonRepository::new())
    }

    /// In-memory archive seeded from a snapshot, keeping key order.
    pub fn from_snapshot(snapshot: FamilySnapshot) -> Self {
        Self::new(InMemoryPersonRepository::from_snapshot(snapshot))
    }

    /// Ordered copy of all person records.
    pub fn snapshot(&self) -> FamilySnapshot {
        self.persons.repo().snapshot()
    }
}

impl<R: PersonRepository> FamilyArchive<R> {
    pub fn new(repo: R) -> Self {
        Self {
            persons: PersonService::new(repo),
            events: RecordRepository::new(),
            documents: RecordRepository::new(),
        }
    }

    pub fn persons(&self) -> &PersonService<R> {
        &self.persons
    }

    pub fn persons_mut(&mut self) -> &mut PersonService<R> {
        &mut self.persons
    }

    /// Read-only person view for tree building.
    pub fn lookup(&self) -> &R {
        self.persons.repo()
    }

    pub fn add_person(&mut self, person: Person) -> AddOutcome {
        self.persons.add(person)
    }

    pub fn update_person(&mut self, id: &str, patch: &PersonPatch) -> bool {
        self.persons.update(id, patch)
    }

    /// Deletes a person, normalizes relationships and unlinks records.
    pub fn delete_person(&mut self, id: &str) -> Option<ArchiveDeleteReport> {
        let person = self.persons.delete(id)?;
        let now = now_epoch_ms();
        let person_id = person.removed.id.clone();
        let unlinked_events = self.events.unlink_person(&person_id, now);
        let unlinked_documents = self.documents.unlink_person(&person_id, now);
        info!(
            "event=archive_unlink module=archive status=ok person_id={} events={} documents={}",
            person_id, unlinked_events, unlinked_documents
        );
        Some(ArchiveDeleteReport {
            person,
            unlinked_events,
            unlinked_documents,
        })
    }

    pub fn add_event(&mut self, event: FamilyEvent) -> Result<(), ArchiveError> {
        self.ensure_persons_exist(&event.person_ids)?;
        info!(
            "event=event_add module=archive status=ok event_id={} links={}",
            event.id,
            event.person_ids.len()
        );
        self.events.put(event);
        Ok(())
    }

    /// Patches an event. Returns `Ok(false)` when the id is absent.
    pub fn update_event(&mut self, id: &str, patch: &EventPatch) -> Result<bool, ArchiveError> {
        if let Some(person_ids) = &patch.person_ids {
            self.ensure_persons_exist(person_ids)?;
        }
        Ok(match self.events.get_mut(id) {
            Some(event) => {
                event.apply(patch);
                true
            }
            None => false,
        })
    }

    pub fn delete_event(&mut self, id: &str) -> Option<FamilyEvent> {
        self.events.remove(id)
    }

    pub fn event(&self, id: &str) -> Option<&FamilyEvent> {
        self.events.get(id)
    }

    /// All events in chronological order; undated events come last.
    pub fn timeline(&self) -> Vec<&FamilyEvent> {
        let mut events: Vec<&FamilyEvent> = self.events.iter().collect();
        events.sort_by(|left, right| compare_event_dates(left, right));
        events
    }

    /// Events linked to one person, chronological.
    pub fn events_for<'a>(&'a self, person_id: &'a str) -> Vec<&'a FamilyEvent> {
        let mut events: Vec<&FamilyEvent> = self.events.linked_to(person_id).collect();
        events.sort_by(|left, right| compare_event_dates(left, right));
        events
    }

    pub fn add_document(&mut self, document: FamilyDocument) -> Result<(), ArchiveError> {
        self.ensure_persons_exist(&document.person_ids)?;
        info!(
            "event=document_add module=archive status=ok document_id={} size_bytes={}",
            document.id, document.file_size
        );
        self.documents.put(document);
        Ok(())
    }

    /// Patches document metadata. Returns `Ok(false)` when the id is absent.
    pub fn update_document(
        &mut self,
        id: &str,
        patch: &DocumentPatch,
    ) -> Result<bool, ArchiveError> {
        if let Some(person_ids) = &patch.person_ids {
            self.ensure_persons_exist(person_ids)?;
        }
        Ok(match self.documents.get_mut(id) {
            Some(document) => {
                document.apply(patch);
                true
            }
            None => false,
        })
    }

    pub fn delete_document(&mut self, id: &str) -> Option<FamilyDocument> {
        self.documents.remove(id)
    }

    pub fn document(&self, id: &str) -> Option<&FamilyDocument> {
        self.documents.get(id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &FamilyDocument> {
        self.documents.iter()
    }

    pub fn documents_for<'a>(
        &'a self,
        person_id: &'a str,
    ) -> impl Iterator<Item = &'a FamilyDocument> + 'a {
        self.documents.linked_to(person_id)
    }

    fn ensure_persons_exist(&self, person_ids: &[PersonId]) -> Result<(), ArchiveError> {
        match person_ids
            .iter()
            .find(|id| self.persons.repo().person(id).is_none())
        {
            Some(missing) => Err(ArchiveError::PersonNotFound(missing.clone())),
            None => Ok(()),
        }
    }
}

fn compare_event_dates(left: &FamilyEvent, right: &FamilyEvent) -> Ordering {
    match (left.date_key(), right.date_key()) {
        (Some(left_key), Some(right_key)) => left_key.cmp(&right_key),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.date.cmp(&right.date),
    }
    .then_with(|| left.id.cmp(&right.id))
}
