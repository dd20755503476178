//! Per-node collapse state.
//!
//! Collapse state is local UI state keyed by person id and is never
//! persisted with family data.

use crate::repo::person_repo::PersonLookup;
use std::collections::HashSet;

/// Set of collapsed person ids; every node starts expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashSet<String>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips one node. Returns the new collapsed flag.
    pub fn toggle(&mut self, person_id: &str) -> bool {
        if self.collapsed.remove(person_id) {
            false
        } else {
            self.collapsed.insert(person_id.to_string());
            true
        }
    }

    pub fn is_collapsed(&self, person_id: &str) -> bool {
        self.collapsed.contains(person_id)
    }

    pub fn set_collapsed(&mut self, person_id: &str, collapsed: bool) {
        if collapsed {
            self.collapsed.insert(person_id.to_string());
        } else {
            self.collapsed.remove(person_id);
        }
    }

    /// Forgets a node, e.g. after its person was deleted.
    pub fn remove(&mut self, person_id: &str) -> bool {
        self.collapsed.remove(person_id)
    }

    /// Drops entries for persons no longer in the store.
    pub fn retain_existing<L: PersonLookup + ?Sized>(&mut self, lookup: &L) -> usize {
        let before = self.collapsed.len();
        self.collapsed.retain(|id| lookup.person(id).is_some());
        before - self.collapsed.len()
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    pub fn collapsed_count(&self) -> usize {
        self.collapsed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::CollapseState;
    use crate::model::person::Person;
    use crate::repo::person_repo::{InMemoryPersonRepository, PersonRepository};

    #[test]
    fn toggle_round_trips() {
        let mut state = CollapseState::new();
        assert!(!state.is_collapsed("a"));
        assert!(state.toggle("a"));
        assert!(state.is_collapsed("a"));
        assert!(!state.toggle("a"));
        assert!(!state.is_collapsed("a"));
    }

    #[test]
    fn retain_existing_drops_deleted_ids() {
        let mut repo = InMemoryPersonRepository::new();
        repo.put(Person::with_id("kept", "K", "X"));
        let mut state = CollapseState::new();
        state.set_collapsed("kept", true);
        state.set_collapsed("gone", true);
        assert_eq!(state.retain_existing(&repo), 1);
        assert!(state.is_collapsed("kept"));
        assert_eq!(state.collapsed_count(), 1);
    }
}
