//! Id-keyed family snapshot used by JSON exchange and file persistence.
//!
//! # Invariants
//! - Serialized form is a JSON object keyed by person id.
//! - Key order is preserved in both directions; the first key is the
//!   fallback tree root.
//! - On read, the map key is authoritative for the person id.

use crate::model::person::Person;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Formatter;

/// Ordered collection of person records keyed by their ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilySnapshot {
    persons: Vec<Person>,
}

impl FamilySnapshot {
    pub fn new(persons: Vec<Person>) -> Self {
        Self { persons }
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn into_persons(self) -> Vec<Person> {
        self.persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.persons.iter().find(|person| person.id == id)
    }

    /// Inserts keyed by id, replacing an existing entry in place.
    pub fn upsert(&mut self, person: Person) {
        match self.persons.iter_mut().find(|slot| slot.id == person.id) {
            Some(slot) => *slot = person,
            None => self.persons.push(person),
        }
    }
}

impl Serialize for FamilySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.persons.len()))?;
        for person in &self.persons {
            map.serialize_entry(&person.id, person)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FamilySnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SnapshotVisitor)
    }
}

struct SnapshotVisitor;

impl<'de> Visitor<'de> for SnapshotVisitor {
    type Value = FamilySnapshot;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a JSON object mapping person ids to person records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut snapshot = FamilySnapshot {
            persons: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((key, mut person)) = access.next_entry::<String, Person>()? {
            person.id = key;
            snapshot.upsert(person);
        }
        Ok(snapshot)
    }
}
