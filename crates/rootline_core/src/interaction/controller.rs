//! Selection state machine.
//!
//! States are `None`, `Viewing(id)` and `Editing(id)`:
//! - card click selects that person for viewing;
//! - background click clears the selection;
//! - toggle and popover clicks leave the selection alone;
//! - edit toggles between viewing and editing the same person;
//! - save and cancel return to viewing;
//! - a confirmed delete removes the person and clears the selection.

use super::form::PersonForm;
use crate::layout::{CollapseState, HitTarget, Point, TreeLayout, Zoom};
use crate::model::person::{Person, PersonId};
use crate::repo::person_repo::{PersonLookup, PersonRepository};
use crate::service::archive::{ArchiveDeleteReport, FamilyArchive};
use log::{debug, info};

/// Active person selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Viewing(PersonId),
    Editing(PersonId),
}

impl Selection {
    pub fn person_id(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Viewing(id) | Self::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Viewing(_) => "viewing",
            Self::Editing(_) => "editing",
        }
    }
}

/// What a click or tap landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    Card(PersonId),
    Toggle(PersonId),
    /// Inside the detail popover of the active person.
    Popover,
    Background,
}

impl From<HitTarget> for ClickTarget {
    fn from(hit: HitTarget) -> Self {
        match hit {
            HitTarget::Card(id) => Self::Card(id),
            HitTarget::Toggle(id) => Self::Toggle(id),
            HitTarget::Background => Self::Background,
        }
    }
}

/// Result of one controller action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Nothing changed.
    Unchanged,
    Selected(PersonId),
    Deselected,
    Toggled { person_id: PersonId, collapsed: bool },
    EditStarted(PersonId),
    EditCancelled(PersonId),
    Saved(PersonId),
    /// The active person disappeared before the save landed.
    SaveDropped(PersonId),
    DeleteDeclined(PersonId),
    Deleted(ArchiveDeleteReport),
}

/// Confirmation step before a delete reaches the store.
pub trait DeleteConfirmation {
    fn confirm(&mut self, person: &Person) -> bool;
}

impl<F> DeleteConfirmation for F
where
    F: FnMut(&Person) -> bool,
{
    fn confirm(&mut self, person: &Person) -> bool {
        self(person)
    }
}

/// Owns all per-session interaction state.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    selection: Selection,
    collapse: CollapseState,
    zoom: Zoom,
    preferred_root: Option<PersonId>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_person(&self) -> Option<&str> {
        self.selection.person_id()
    }

    pub fn collapse(&self) -> &CollapseState {
        &self.collapse
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    pub fn preferred_root(&self) -> Option<&str> {
        self.preferred_root.as_deref()
    }

    /// Routes one click.
    pub fn click(&mut self, target: ClickTarget) -> InteractionOutcome {
        match target {
            ClickTarget::Card(id) => {
                if self.selection == Selection::Editing(id.clone()) {
                    return InteractionOutcome::Unchanged;
                }
                self.transition(Selection::Viewing(id.clone()));
                InteractionOutcome::Selected(id)
            }
            ClickTarget::Toggle(id) => {
                let collapsed = self.collapse.toggle(&id);
                debug!(
                    "event=node_toggle module=interaction status=ok person_id={} collapsed={}",
                    id, collapsed
                );
                InteractionOutcome::Toggled {
                    person_id: id,
                    collapsed,
                }
            }
            ClickTarget::Popover => InteractionOutcome::Unchanged,
            ClickTarget::Background => {
                if self.selection == Selection::None {
                    return InteractionOutcome::Unchanged;
                }
                self.transition(Selection::None);
                InteractionOutcome::Deselected
            }
        }
    }

    /// Hit-tests `point` (layout coordinates) and routes the result.
    pub fn click_at(&mut self, layout: &TreeLayout, point: Point) -> InteractionOutcome {
        self.click(layout.hit_test(point).into())
    }

    /// Viewing -> editing and back for the active person.
    pub fn toggle_edit(&mut self) -> InteractionOutcome {
        match self.selection.clone() {
            Selection::None => InteractionOutcome::Unchanged,
            Selection::Viewing(id) => {
                self.transition(Selection::Editing(id.clone()));
                InteractionOutcome::EditStarted(id)
            }
            Selection::Editing(id) => {
                self.transition(Selection::Viewing(id.clone()));
                InteractionOutcome::EditCancelled(id)
            }
        }
    }

    /// Leaves edit mode without touching the store.
    pub fn cancel_edit(&mut self) -> InteractionOutcome {
        match self.selection.clone() {
            Selection::Editing(id) => {
                self.transition(Selection::Viewing(id.clone()));
                InteractionOutcome::EditCancelled(id)
            }
            _ => InteractionOutcome::Unchanged,
        }
    }

    /// Writes the form to the store and returns to viewing.
    pub fn save<R: PersonRepository>(
        &mut self,
        archive: &mut FamilyArchive<R>,
        form: &PersonForm,
    ) -> InteractionOutcome {
        let Selection::Editing(id) = self.selection.clone() else {
            return InteractionOutcome::Unchanged;
        };
        if archive.update_person(&id, &form.to_patch()) {
            self.transition(Selection::Viewing(id.clone()));
            InteractionOutcome::Saved(id)
        } else {
            self.transition(Selection::None);
            InteractionOutcome::SaveDropped(id)
        }
    }

    /// Deletes the active person after `confirmer` agrees.
    pub fn delete<R, C>(
        &mut self,
        archive: &mut FamilyArchive<R>,
        confirmer: &mut C,
    ) -> InteractionOutcome
    where
        R: PersonRepository,
        C: DeleteConfirmation + ?Sized,
    {
        let Some(id) = self.selection.person_id().map(str::to_string) else {
            return InteractionOutcome::Unchanged;
        };
        let confirmed = match archive.persons().get(&id) {
            Some(person) => confirmer.confirm(person),
            None => false,
        };
        if !confirmed {
            info!(
                "event=person_delete module=interaction status=skipped reason=not_confirmed person_id={}",
                id
            );
            return InteractionOutcome::DeleteDeclined(id);
        }

        let report = archive.delete_person(&id);
        self.collapse.remove(&id);
        if self.preferred_root.as_deref() == Some(id.as_str()) {
            self.preferred_root = None;
        }
        self.transition(Selection::None);
        match report {
            Some(report) => InteractionOutcome::Deleted(report),
            None => InteractionOutcome::Deselected,
        }
    }

    pub fn zoom_in(&mut self) -> u16 {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> u16 {
        self.zoom.zoom_out()
    }

    pub fn reset_zoom(&mut self) {
        self.zoom.reset();
    }

    /// Sets the explicitly chosen tree root.
    pub fn set_root(&mut self, person_id: Option<PersonId>) {
        self.preferred_root = person_id;
    }

    /// Drops state that points at persons no longer in the store.
    pub fn sync_with<L: PersonLookup + ?Sized>(&mut self, lookup: &L) {
        let stale_selection = self
            .selection
            .person_id()
            .is_some_and(|id| lookup.person(id).is_none());
        if stale_selection {
            self.transition(Selection::None);
        }
        let dropped = self.collapse.retain_existing(lookup);
        if dropped > 0 {
            debug!(
                "event=collapse_sync module=interaction status=ok dropped={}",
                dropped
            );
        }
    }

    fn transition(&mut self, next: Selection) {
        debug!(
            "event=selection_change module=interaction status=ok from={} to={} person_id={}",
            self.selection.label(),
            next.label(),
            next.person_id().unwrap_or("-")
        );
        self.selection = next;
    }
}
