//! Relationship normalization across person records.
//!
//! # Responsibility
//! - Strip a removed person from every spouse/children/parents reference.
//! - Keep spouse links symmetric after a spouse field changes.
//! - Report references that do not resolve, without failing on them.
//!
//! # Invariants
//! - After [`detach_person`], no remaining record references the removed id.
//! - Every changed record gets a refreshed `updated_at`.
//! - One full pass per call; O(n) over stored persons.

use crate::model::now_epoch_ms;
use crate::model::person::PersonId;
use crate::repo::person_repo::{PersonLookup, PersonRepository};

/// Counts of references removed by [`detach_person`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub spouse_links: usize,
    pub child_links: usize,
    pub parent_links: usize,
}

impl CleanupReport {
    pub fn total(&self) -> usize {
        self.spouse_links + self.child_links + self.parent_links
    }
}

/// Which relationship field holds a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceField {
    Spouse,
    Child,
    Parent,
}

/// One unresolved reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub owner: PersonId,
    pub field: ReferenceField,
    pub target: PersonId,
}

/// Removes `removed_id` from every remaining record.
///
/// Three independent checks per record: spouse equality, children filter,
/// parents filter.
pub fn detach_person<R: PersonRepository + ?Sized>(repo: &mut R, removed_id: &str) -> CleanupReport {
    let now = now_epoch_ms();
    let mut report = CleanupReport::default();
    for person in repo.persons_mut() {
        let mut changed = false;
        if person.spouse_id.as_deref() == Some(removed_id) {
            person.spouse_id = None;
            report.spouse_links += 1;
            changed = true;
        }

        let before = person.children.len();
        person.children.retain(|id| id != removed_id);
        if person.children.len() != before {
            report.child_links += before - person.children.len();
            changed = true;
        }

        let before = person.parents.len();
        person.parents.retain(|id| id != removed_id);
        if person.parents.len() != before {
            report.parent_links += before - person.parents.len();
            changed = true;
        }

        if changed {
            person.updated_at = now.max(person.updated_at);
        }
    }
    report
}

/// Mirrors the spouse link of `person_id` after its spouse field changed.
///
/// - A self-reference is cleared.
/// - The previous spouse loses its back-reference if it pointed here.
/// - The new spouse (when it exists) points back here, and its own previous
///   partner loses the back-reference.
/// - A dangling new spouse id is kept as-is; rendering tolerates it.
///
/// Returns the number of records changed besides `person_id`.
pub fn sync_spouse<R: PersonRepository + ?Sized>(
    repo: &mut R,
    person_id: &str,
    previous_spouse: Option<&str>,
) -> usize {
    let now = now_epoch_ms();
    let Some(person) = repo.get_mut(person_id) else {
        return 0;
    };
    if person.spouse_id.as_deref() == Some(person_id) {
        person.spouse_id = None;
    }
    let current = person.spouse_id.clone();
    let mut changed = 0;

    if let Some(previous) = previous_spouse.filter(|previous| Some(*previous) != current.as_deref())
    {
        changed += clear_back_reference(repo, previous, person_id, now);
    }

    let Some(current) = current else {
        return changed;
    };
    let displaced = match repo.person(&current) {
        Some(spouse) => spouse
            .spouse_id
            .clone()
            .filter(|existing| existing != person_id),
        None => return changed,
    };
    if let Some(displaced) = displaced {
        changed += clear_back_reference(repo, &displaced, &current, now);
    }
    if let Some(spouse) = repo.get_mut(&current) {
        if spouse.spouse_id.as_deref() != Some(person_id) {
            spouse.spouse_id = Some(person_id.to_string());
            spouse.updated_at = now.max(spouse.updated_at);
            changed += 1;
        }
    }
    changed
}

/// Lists every reference that does not resolve to a stored person.
pub fn dangling_references<L: PersonLookup + ?Sized>(lookup: &L) -> Vec<DanglingReference> {
    let mut dangling = Vec::new();
    for person in lookup.persons() {
        let mut push = |field: ReferenceField, target: &PersonId| {
            if lookup.person(target).is_none() {
                dangling.push(DanglingReference {
                    owner: person.id.clone(),
                    field,
                    target: target.clone(),
                });
            }
        };
        if let Some(spouse_id) = &person.spouse_id {
            push(ReferenceField::Spouse, spouse_id);
        }
        for child_id in &person.children {
            push(ReferenceField::Child, child_id);
        }
        for parent_id in &person.parents {
            push(ReferenceField::Parent, parent_id);
        }
    }
    dangling
}

fn clear_back_reference<R: PersonRepository + ?Sized>(
    repo: &mut R,
    owner_id: &str,
    target_id: &str,
    now: i64,
) -> usize {
    match repo.get_mut(owner_id) {
        Some(owner) if owner.spouse_id.as_deref() == Some(target_id) => {
            owner.spouse_id = None;
            owner.updated_at = now.max(owner.updated_at);
            1
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{dangling_references, detach_person, sync_spouse, ReferenceField};
    use crate::model::person::Person;
    use crate::repo::person_repo::{InMemoryPersonRepository, PersonLookup, PersonRepository};

    fn person(id: &str) -> Person {
        Person::with_id(id, id.to_uppercase(), "Test")
    }

    #[test]
    fn detach_counts_each_reference_kind() {
        let mut repo = InMemoryPersonRepository::new();
        let mut a = person("a");
        a.spouse_id = Some("x".to_string());
        a.children = vec!["x".to_string(), "b".to_string(), "x".to_string()];
        let mut b = person("b");
        b.parents = vec!["x".to_string(), "a".to_string()];
        repo.put(a);
        repo.put(b);

        let report = detach_person(&mut repo, "x");
        assert_eq!(report.spouse_links, 1);
        assert_eq!(report.child_links, 2);
        assert_eq!(report.parent_links, 1);
        assert_eq!(report.total(), 4);
        assert_eq!(repo.person("a").unwrap().children, vec!["b".to_string()]);
    }

    #[test]
    fn sync_spouse_mirrors_and_releases_previous_partners() {
        let mut repo = InMemoryPersonRepository::new();
        let mut a = person("a");
        let mut b = person("b");
        let mut c = person("c");
        let mut d = person("d");
        a.spouse_id = Some("b".to_string());
        b.spouse_id = Some("a".to_string());
        c.spouse_id = Some("d".to_string());
        d.spouse_id = Some("c".to_string());
        for p in [a, b, c, d] {
            repo.put(p);
        }

        repo.get_mut("a").unwrap().spouse_id = Some("c".to_string());
        let changed = sync_spouse(&mut repo, "a", Some("b"));

        assert_eq!(changed, 3);
        assert_eq!(repo.person("b").unwrap().spouse_id, None);
        assert_eq!(repo.person("c").unwrap().spouse_id.as_deref(), Some("a"));
        assert_eq!(repo.person("d").unwrap().spouse_id, None);
    }

    #[test]
    fn sync_spouse_clears_self_reference_and_keeps_dangling() {
        let mut repo = InMemoryPersonRepository::new();
        let mut a = person("a");
        a.spouse_id = Some("a".to_string());
        repo.put(a);
        assert_eq!(sync_spouse(&mut repo, "a", None), 0);
        assert_eq!(repo.person("a").unwrap().spouse_id, None);

        repo.get_mut("a").unwrap().spouse_id = Some("ghost".to_string());
        assert_eq!(sync_spouse(&mut repo, "a", None), 0);
        assert_eq!(repo.person("a").unwrap().spouse_id.as_deref(), Some("ghost"));
    }

    #[test]
    fn dangling_references_lists_unresolved_ids() {
        let mut repo = InMemoryPersonRepository::new();
        let mut a = person("a");
        a.spouse_id = Some("ghost".to_string());
        a.children = vec!["b".to_string(), "missing".to_string()];
        repo.put(a);
        repo.put(person("b"));

        let dangling = dangling_references(&repo);
        assert_eq!(dangling.len(), 2);
        assert_eq!(dangling[0].field, ReferenceField::Spouse);
        assert_eq!(dangling[1].target, "missing");
    }
}
