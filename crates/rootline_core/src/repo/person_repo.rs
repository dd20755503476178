//! Person repository contracts and in-memory implementation.
//!
//! # Responsibility
//! - Provide keyed CRUD over person records.
//! - Expose a read-only [`PersonLookup`] view for tree building and layout.
//!
//! # Invariants
//! - `put` keyed by `Person::id`; an existing record keeps its position.
//! - Listing is deterministic: insertion order.

use crate::model::person::{Person, PersonId};
use crate::model::snapshot::FamilySnapshot;
use std::collections::HashMap;

/// Read-only person access used by derived views.
pub trait PersonLookup {
    /// Loads one person by id.
    fn person(&self, id: &str) -> Option<&Person>;
    /// Iterates all persons in insertion order.
    fn persons(&self) -> Box<dyn Iterator<Item = &Person> + '_>;
    /// Number of stored persons.
    fn person_count(&self) -> usize;
}

/// Repository interface for person records.
pub trait PersonRepository: PersonLookup {
    /// Inserts or replaces a record keyed by its id.
    ///
    /// Returns the replaced record, if any.
    fn put(&mut self, person: Person) -> Option<Person>;
    /// Mutable access to one record.
    fn get_mut(&mut self, id: &str) -> Option<&mut Person>;
    /// Removes one record.
    fn remove(&mut self, id: &str) -> Option<Person>;
    /// Mutable iteration over all records.
    fn persons_mut(&mut self) -> Box<dyn Iterator<Item = &mut Person> + '_>;
}

/// Keyed in-memory person map preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersonRepository {
    records: HashMap<PersonId, Person>,
    order: Vec<PersonId>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from a snapshot, keeping its key order.
    pub fn from_snapshot(snapshot: FamilySnapshot) -> Self {
        let mut repo = Self::new();
        for person in snapshot.into_persons() {
            repo.put(person);
        }
        repo
    }

    /// Copies current records into an ordered snapshot.
    pub fn snapshot(&self) -> FamilySnapshot {
        FamilySnapshot::new(self.persons().cloned().collect())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }
}

impl PersonLookup for InMemoryPersonRepository {
    fn person(&self, id: &str) -> Option<&Person> {
        self.records.get(id)
    }

    fn persons(&self) -> Box<dyn Iterator<Item = &Person> + '_> {
        Box::new(self.order.iter().filter_map(|id| self.records.get(id)))
    }

    fn person_count(&self) -> usize {
        self.records.len()
    }
}

impl PersonRepository for InMemoryPersonRepository {
    fn put(&mut self, person: Person) -> Option<Person> {
        let id = person.id.clone();
        let replaced = self.records.insert(id.clone(), person);
        if replaced.is_none() {
            self.order.push(id);
        }
        replaced
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.records.get_mut(id)
    }

    fn remove(&mut self, id: &str) -> Option<Person> {
        let removed = self.records.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    fn persons_mut(&mut self) -> Box<dyn Iterator<Item = &mut Person> + '_> {
        Box::new(self.records.values_mut())
    }
}

impl PersonLookup for FamilySnapshot {
    fn person(&self, id: &str) -> Option<&Person> {
        self.get(id)
    }

    fn persons(&self) -> Box<dyn Iterator<Item = &Person> + '_> {
        Box::new(FamilySnapshot::persons(self).iter())
    }

    fn person_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryPersonRepository, PersonLookup, PersonRepository};
    use crate::model::person::Person;

    #[test]
    fn put_keeps_insertion_order_on_replace() {
        let mut repo = InMemoryPersonRepository::new();
        repo.put(Person::with_id("b", "B", "X"));
        repo.put(Person::with_id("a", "A", "X"));
        let replaced = repo.put(Person::with_id("b", "Bee", "X"));

        assert!(replaced.is_some());
        let ids: Vec<&str> = repo.persons().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(repo.person("b").unwrap().first_name, "Bee");
    }

    #[test]
    fn remove_drops_record_and_order_slot() {
        let mut repo = InMemoryPersonRepository::new();
        repo.put(Person::with_id("a", "A", "X"));
        repo.put(Person::with_id("b", "B", "X"));

        assert!(repo.remove("a").is_some());
        assert!(repo.remove("a").is_none());
        assert_eq!(repo.person_count(), 1);
        assert_eq!(repo.persons().next().unwrap().id, "b");
    }
}
