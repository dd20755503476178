//! Family tree builder.
//!
//! # Responsibility
//! - Resolve a person's spouse and children into a renderable node tree.
//! - Discover roots (persons nobody lists as a child) and build a forest.
//!
//! # Invariants
//! - Missing persons and dangling child/spouse ids are filtered, never errors.
//! - Recursion never goes deeper than `max_depth`.
//! - With the cycle guard on, a person is expanded at most once per tree.
//! - Nodes borrow from the store; they are disposable views.

use crate::model::person::Person;
use crate::repo::person_repo::PersonLookup;
use crate::settings::Settings;
use std::collections::HashSet;

/// Default generation bound.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Message shown when no tree can be rendered.
pub const EMPTY_STATE_MESSAGE: &str = "No family members found.";

/// Tree builder options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Deepest depth that still produces a node; the root is depth 0.
    pub max_depth: usize,
    /// Skip persons already expanded in the current tree.
    pub guard_cycles: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            guard_cycles: true,
        }
    }
}

impl BuildOptions {
    /// Shows `generation_limit` generations counting the root; cycle guard
    /// stays on.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_depth: settings.tree_display.generation_limit.saturating_sub(1),
            guard_cycles: true,
        }
    }
}

/// One resolved person with spouse and child subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyNode<'a> {
    pub person: &'a Person,
    pub spouse: Option<&'a Person>,
    pub children: Vec<FamilyNode<'a>>,
    /// Generation relative to the tree root.
    pub depth: usize,
    /// Display name of the parent node, `None` for roots.
    pub parent_name: Option<String>,
}

impl<'a> FamilyNode<'a> {
    pub fn id(&self) -> &'a str {
        &self.person.id
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of primary nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(FamilyNode::node_count).sum::<usize>()
    }

    /// Deepest `depth` value in this subtree.
    pub fn deepest(&self) -> usize {
        self.children
            .iter()
            .map(FamilyNode::deepest)
            .max()
            .unwrap_or(self.depth)
    }

    /// Finds a primary node by person id (spouses are not indexed).
    pub fn find(&self, person_id: &str) -> Option<&FamilyNode<'a>> {
        if self.person.id == person_id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(person_id))
    }
}

/// Independent trees rendered side by side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest<'a> {
    pub trees: Vec<FamilyNode<'a>>,
}

impl<'a> Forest<'a> {
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Text for the empty state, `None` when something renders.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_STATE_MESSAGE)
    }
}

/// Resolves `person.spouse_id`; `None` when unset or dangling.
pub fn get_spouse<'a, L: PersonLookup + ?Sized>(person: &Person, lookup: &'a L) -> Option<&'a Person> {
    person
        .spouse_id
        .as_deref()
        .and_then(|spouse_id| lookup.person(spouse_id))
}

/// Resolves `person.children` in order, dropping dangling ids.
pub fn get_children<'a, L: PersonLookup + ?Sized>(person: &Person, lookup: &'a L) -> Vec<&'a Person> {
    person
        .children
        .iter()
        .filter_map(|child_id| lookup.person(child_id))
        .collect()
}

/// Depth-bounded node resolution.
///
/// Returns `None` when `person_id` is absent or `depth > max_depth`. No cycle
/// guard is applied; the depth bound alone terminates cyclic graphs.
pub fn build_node<'a, L: PersonLookup + ?Sized>(
    person_id: &str,
    lookup: &'a L,
    depth: usize,
    max_depth: usize,
) -> Option<FamilyNode<'a>> {
    TreeBuilder::new(BuildOptions {
        max_depth,
        guard_cycles: false,
    })
    .build_at(person_id, lookup, depth)
}

/// Persons not listed in any other person's `children`, in store order.
///
/// A self-listed child does not count as a parent reference.
pub fn find_roots<L: PersonLookup + ?Sized>(lookup: &L) -> Vec<&Person> {
    let mut referenced: HashSet<&str> = HashSet::new();
    for person in lookup.persons() {
        for child_id in &person.children {
            if child_id != &person.id {
                referenced.insert(child_id.as_str());
            }
        }
    }
    lookup
        .persons()
        .filter(|person| !referenced.contains(person.id.as_str()))
        .collect()
}

/// Explicitly chosen root with fallback to the first stored person.
pub fn pick_root<'a, L: PersonLookup + ?Sized>(
    lookup: &'a L,
    preferred: Option<&str>,
) -> Option<&'a Person> {
    preferred
        .and_then(|id| lookup.person(id))
        .or_else(|| lookup.persons().next())
}

/// Tree builder with configured depth bound and cycle policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
}

impl TreeBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Builds the tree rooted at `person_id` at depth 0.
    pub fn build<'a, L: PersonLookup + ?Sized>(
        &self,
        person_id: &str,
        lookup: &'a L,
    ) -> Option<FamilyNode<'a>> {
        self.build_at(person_id, lookup, 0)
    }

    /// Builds one tree per discovered root.
    ///
    /// A fully cyclic store has no roots and yields an empty forest.
    pub fn build_forest<'a, L: PersonLookup + ?Sized>(&self, lookup: &'a L) -> Forest<'a> {
        let trees = find_roots(lookup)
            .into_iter()
            .filter_map(|root| self.build(&root.id, lookup))
            .collect();
        Forest { trees }
    }

    /// Builds a single-tree forest from an explicit root selection.
    pub fn build_selected<'a, L: PersonLookup + ?Sized>(
        &self,
        lookup: &'a L,
        preferred_root: Option<&str>,
    ) -> Forest<'a> {
        let trees = pick_root(lookup, preferred_root)
            .and_then(|root| self.build(&root.id, lookup))
            .into_iter()
            .collect();
        Forest { trees }
    }

    fn build_at<'a, L: PersonLookup + ?Sized>(
        &self,
        person_id: &str,
        lookup: &'a L,
        depth: usize,
    ) -> Option<FamilyNode<'a>> {
        let mut expanded = HashSet::new();
        self.resolve(person_id, lookup, depth, None, &mut expanded)
    }

    fn resolve<'a, L: PersonLookup + ?Sized>(
        &self,
        person_id: &str,
        lookup: &'a L,
        depth: usize,
        parent_name: Option<String>,
        expanded: &mut HashSet<&'a str>,
    ) -> Option<FamilyNode<'a>> {
        if depth > self.options.max_depth {
            return None;
        }
        let person = lookup.person(person_id)?;
        if self.options.guard_cycles && !expanded.insert(person.id.as_str()) {
            return None;
        }

        let spouse = get_spouse(person, lookup);
        let name = person.display_name();
        let children = get_children(person, lookup)
            .into_iter()
            .filter_map(|child| {
                self.resolve(&child.id, lookup, depth + 1, Some(name.clone()), expanded)
            })
            .collect();

        Some(FamilyNode {
            person,
            spouse,
            children,
            depth,
            parent_name,
        })
    }
}
