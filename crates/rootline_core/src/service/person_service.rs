//! Person store use-case service.
//!
//! # Responsibility
//! - Provide add/update/delete/search over the person repository.
//! - Reject duplicate inserts (same normalized name and birth year).
//! - Run relationship normalization on every delete and spouse change.
//!
//! # Invariants
//! - Duplicate inserts are no-ops reported as [`AddOutcome::Duplicate`] and
//!   logged at `warn`; they are not errors.
//! - `update` on a missing id is a no-op and never fails.
//! - An empty search query returns no results, not the full listing.

use crate::model::now_epoch_ms;
use crate::model::person::{Person, PersonId, PersonPatch, PersonValidationError};
use crate::repo::person_repo::{PersonLookup, PersonRepository};
use crate::service::relationship::{self, CleanupReport};
use crate::settings::SortBy;
use log::{debug, info, warn};
use std::cmp::Ordering;

/// Result of [`PersonService::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Record stored under this id.
    Inserted(PersonId),
    /// Skipped: a record with the same normalized name and birth year exists.
    Duplicate { existing: PersonId },
    /// Skipped: record failed validation.
    Invalid(PersonValidationError),
}

impl AddOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// Result of [`PersonService::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub removed: Person,
    pub cleanup: CleanupReport,
}

/// Living/deceased listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LifeStatusFilter {
    #[default]
    All,
    Living,
    Deceased,
}

/// Member listing filter.
///
/// A blank `query` lists everyone; a non-blank one narrows to search hits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub query: String,
    pub status: LifeStatusFilter,
    /// Inclusive; a missing birth year counts as 0.
    pub min_birth_year: Option<i32>,
    /// Inclusive; a missing birth year counts as 9999.
    pub max_birth_year: Option<i32>,
    pub sort_by: SortBy,
}

/// Person store facade over a repository implementation.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Read-only repository access for derived views.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn into_repo(self) -> R {
        self.repo
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.repo.person(id)
    }

    pub fn len(&self) -> usize {
        self.repo.person_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a person unless it duplicates an existing record.
    ///
    /// Duplicate means: equal normalized name AND both birth years present
    /// and equal.
    pub fn add(&mut self, person: Person) -> AddOutcome {
        if let Err(err) = person.validate() {
            warn!(
                "event=person_add module=person_service status=skipped reason=invalid error={}",
                err
            );
            return AddOutcome::Invalid(err);
        }

        if let Some(existing) = self.find_duplicate(&person) {
            warn!(
                "event=person_add module=person_service status=skipped reason=duplicate existing_id={} birth_year={}",
                existing,
                person.birth_year.unwrap_or_default()
            );
            return AddOutcome::Duplicate { existing };
        }

        let id = person.id.clone();
        let replaced = self.repo.put(person).is_some();
        info!(
            "event=person_add module=person_service status=ok person_id={} replaced={}",
            id, replaced
        );
        AddOutcome::Inserted(id)
    }

    /// Merges `patch` into an existing record and refreshes `updated_at`.
    ///
    /// Returns `false` without side effects when `id` is absent.
    pub fn update(&mut self, id: &str, patch: &PersonPatch) -> bool {
        let Some(person) = self.repo.get_mut(id) else {
            debug!(
                "event=person_update module=person_service status=skipped reason=not_found person_id={}",
                id
            );
            return false;
        };
        let previous_spouse = person.spouse_id.clone();
        person.apply(patch);

        let mirrored = if patch.touches_spouse() {
            relationship::sync_spouse(&mut self.repo, id, previous_spouse.as_deref())
        } else {
            0
        };
        info!(
            "event=person_update module=person_service status=ok person_id={} spouse_links_changed={}",
            id, mirrored
        );
        true
    }

    /// Removes a record and strips it from every remaining relationship list.
    pub fn delete(&mut self, id: &str) -> Option<DeleteReport> {
        let Some(removed) = self.repo.remove(id) else {
            debug!(
                "event=person_delete module=person_service status=skipped reason=not_found person_id={}",
                id
            );
            return None;
        };
        let cleanup = relationship::detach_person(&mut self.repo, id);
        info!(
            "event=person_delete module=person_service status=ok person_id={} spouse_links={} child_links={} parent_links={}",
            id, cleanup.spouse_links, cleanup.child_links, cleanup.parent_links
        );
        Some(DeleteReport { removed, cleanup })
    }

    /// Stores a record keyed by id without duplicate checks.
    ///
    /// Used by import paths; `updated_at` is refreshed. Returns whether an
    /// existing record was replaced.
    pub fn merge_record(&mut self, mut person: Person) -> bool {
        person.updated_at = now_epoch_ms().max(person.updated_at);
        self.repo.put(person).is_some()
    }

    /// Case-insensitive substring search over name, occupation and location.
    ///
    /// Blank queries return no results.
    pub fn search(&self, query: &str) -> Vec<&Person> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.repo
            .persons()
            .filter(|person| matches_query(person, &needle))
            .collect()
    }

    /// Lists members matching `filter`, sorted by `filter.sort_by`.
    pub fn filter(&self, filter: &MemberFilter) -> Vec<&Person> {
        let base = if filter.query.trim().is_empty() {
            self.repo.persons().collect()
        } else {
            self.search(&filter.query)
        };
        let mut members: Vec<&Person> = base
            .into_iter()
            .filter(|person| match filter.status {
                LifeStatusFilter::All => true,
                LifeStatusFilter::Living => person.is_alive(),
                LifeStatusFilter::Deceased => !person.is_alive(),
            })
            .filter(|person| {
                filter
                    .min_birth_year
                    .map_or(true, |min| person.birth_year.unwrap_or(0) >= min)
            })
            .filter(|person| {
                filter
                    .max_birth_year
                    .map_or(true, |max| person.birth_year.unwrap_or(9999) <= max)
            })
            .collect();
        sort_members(&mut members, filter.sort_by);
        members
    }

    /// Lists every member sorted by `sort_by`.
    pub fn list(&self, sort_by: SortBy) -> Vec<&Person> {
        let mut members: Vec<&Person> = self.repo.persons().collect();
        sort_members(&mut members, sort_by);
        members
    }

    fn find_duplicate(&self, candidate: &Person) -> Option<PersonId> {
        let birth_year = candidate.birth_year?;
        let name = candidate.normalized_name();
        self.repo
            .persons()
            .find(|existing| {
                existing.birth_year == Some(birth_year) && existing.normalized_name() == name
            })
            .map(|existing| existing.id.clone())
    }
}

fn matches_query(person: &Person, needle: &str) -> bool {
    let name = person.display_name();
    let matched = [
        Some(name.as_str()),
        person.occupation.as_deref(),
        person.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|value| value.to_lowercase().contains(needle));
    matched
}

fn sort_members(members: &mut [&Person], sort_by: SortBy) {
    members.sort_by(|left, right| {
        let primary = match sort_by {
            SortBy::Name => Ordering::Equal,
            SortBy::BirthYear => compare_birth_year(left.birth_year, right.birth_year),
            SortBy::CreatedAt => left.created_at.cmp(&right.created_at),
        };
        primary
            .then_with(|| {
                left.display_name()
                    .to_lowercase()
                    .cmp(&right.display_name().to_lowercase())
            })
            .then_with(|| left.id.cmp(&right.id))
    });
}

fn compare_birth_year(left: Option<i32>, right: Option<i32>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_birth_year, matches_query, AddOutcome, PersonService};
    use crate::model::person::Person;
    use crate::repo::person_repo::InMemoryPersonRepository;
    use std::cmp::Ordering;

    #[test]
    fn missing_birth_years_sort_last() {
        assert_eq!(compare_birth_year(Some(1990), None), Ordering::Less);
        assert_eq!(compare_birth_year(None, None), Ordering::Equal);
    }

    #[test]
    fn matches_query_checks_occupation_and_location() {
        let mut person = Person::with_id("p", "Mina", "Shrestha");
        person.occupation = Some("Nurse".to_string());
        assert!(matches_query(&person, "nur"));
        assert!(!matches_query(&person, "pokhara"));
    }

    #[test]
    fn names_without_birth_year_never_count_as_duplicates() {
        let mut service = PersonService::new(InMemoryPersonRepository::new());
        assert!(service.add(Person::with_id("a", "Ram", "Shrestha")).is_inserted());
        let outcome = service.add(Person::with_id("b", "Ram", "Shrestha"));
        assert_eq!(outcome, AddOutcome::Inserted("b".to_string()));
        assert_eq!(service.len(), 2);
    }
}
