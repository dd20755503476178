//! In-memory repository for person-linked records (events, documents).

use crate::model::person::PersonId;
use crate::model::LinkedRecord;

/// Ordered collection of linked records keyed by `record_id`.
#[derive(Debug, Clone)]
pub struct RecordRepository<T> {
    records: Vec<T>,
}

impl<T> Default for RecordRepository<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: LinkedRecord> RecordRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing one with the same id in place.
    pub fn put(&mut self, record: T) {
        match self
            .records
            .iter_mut()
            .find(|slot| slot.record_id() == record.record_id())
        {
            Some(slot) => *slot = record,
            None => self.records.push(record),
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|record| record.record_id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.records
            .iter_mut()
            .find(|record| record.record_id() == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self
            .records
            .iter()
            .position(|record| record.record_id() == id)?;
        Some(self.records.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records linked to `person_id`, in insertion order.
    pub fn linked_to<'a>(&'a self, person_id: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.records
            .iter()
            .filter(move |record| record.person_ids().iter().any(|id| id == person_id))
    }

    /// Removes `person_id` from every record's links.
    ///
    /// Returns the number of records that changed; their `updated_at` is
    /// refreshed with `now_ms`.
    pub fn unlink_person(&mut self, person_id: &PersonId, now_ms: i64) -> usize {
        let mut changed = 0;
        for record in &mut self.records {
            let links = record.person_ids_mut();
            let before = links.len();
            links.retain(|id| id != person_id);
            if links.len() != before {
                record.touch(now_ms);
                changed += 1;
            }
        }
        changed
    }
}
