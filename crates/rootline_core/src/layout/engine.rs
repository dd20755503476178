//! Top-down genealogical layout.
//!
//! # Responsibility
//! - Place each node as a couple block (primary card, optional spouse card).
//! - Center children rows under their parents and emit connector segments.
//! - Stack independent trees of a forest vertically.
//!
//! # Invariants
//! - A node's width is `max(couple width, children row width)`.
//! - Single child: one vertical drop. Several children: drop, horizontal bar
//!   spanning at least `n * CHILD_UNIT_WIDTH`, one stub per child.
//! - Collapsed nodes keep their toggle; nothing below them is emitted.

use super::card::{card_content, resolve_card_color, CardColor, CardContent, CardOptions, CardRole};
use super::collapse::CollapseState;
use super::geometry::{Point, Rect, Size};
use crate::model::person::{Person, PersonId};
use crate::settings::{PhotoShape, Settings, SizeScale, TreeOrientation};
use crate::tree::labels::{generation_band, relationship_text, spouse_relationship_text};
use crate::tree::{FamilyNode, Forest};
use log::debug;

pub const CARD_WIDTH: f32 = 160.0;
pub const CARD_HEIGHT: f32 = 96.0;
/// Horizontal gap between a primary card and its spouse card.
pub const SPOUSE_GAP: f32 = 48.0;
/// Drop from a parent block to its only child.
pub const SINGLE_CHILD_DROP: f32 = 56.0;
/// Drop from a parent block to the sibling bar.
pub const MULTI_CHILD_DROP: f32 = 24.0;
/// Stub from the sibling bar to each child.
pub const CHILD_STUB: f32 = 32.0;
pub const CHILD_COLUMN_GAP: f32 = 40.0;
/// Minimum sibling bar width contributed per child.
pub const CHILD_UNIT_WIDTH: f32 = 140.0;
/// Vertical gap between independent trees.
pub const ROOT_GAP: f32 = 64.0;
pub const TOGGLE_SIZE: f32 = 20.0;

/// One positioned person card.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCard {
    pub person_id: PersonId,
    pub role: CardRole,
    pub rect: Rect,
    pub depth: usize,
    /// Generation band used for styling.
    pub band: usize,
    pub color: CardColor,
    pub content: CardContent,
    /// `Son of X` / `Wife of Y`; empty for roots.
    pub caption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Couple link between primary and spouse card.
    Spouse,
    /// Vertical line leaving a parent block.
    ParentDrop,
    /// Horizontal bar joining siblings.
    SiblingBar,
    /// Vertical line from the bar into one child.
    ChildStub,
}

/// Straight line segment owned by the node that emitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub kind: ConnectorKind,
    pub owner: PersonId,
    pub from: Point,
    pub to: Point,
}

/// Expand/collapse control on a node that has children.
#[derive(Debug, Clone, PartialEq)]
pub struct Toggle {
    pub person_id: PersonId,
    pub rect: Rect,
    pub collapsed: bool,
}

impl Toggle {
    /// `+` when collapsed, `-` when expanded.
    pub fn glyph(&self) -> char {
        if self.collapsed {
            '+'
        } else {
            '-'
        }
    }
}

/// Presentation values carried from settings to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutStyle {
    pub node_color: String,
    pub connection_line_color: String,
    pub text_size: SizeScale,
    pub photo_shape: PhotoShape,
    pub show_photos: bool,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl LayoutStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        let display = &settings.tree_display;
        Self {
            node_color: display.node_color.clone(),
            connection_line_color: display.connection_line_color.clone(),
            text_size: display.text_size,
            photo_shape: display.photo_shape,
            show_photos: display.show_photos,
        }
    }
}

/// What sits under a layout point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Toggle(PersonId),
    Card(PersonId),
    Background,
}

/// Fully positioned forest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeLayout {
    pub cards: Vec<PlacedCard>,
    pub connectors: Vec<Connector>,
    pub toggles: Vec<Toggle>,
    /// Natural (unscaled) size of the whole drawing.
    pub size: Size,
    pub style: LayoutStyle,
}

impl TreeLayout {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// First card showing `person_id`, primary cards before spouse cards.
    pub fn card(&self, person_id: &str) -> Option<&PlacedCard> {
        self.cards
            .iter()
            .find(|card| card.person_id == person_id && card.role == CardRole::Primary)
            .or_else(|| self.cards.iter().find(|card| card.person_id == person_id))
    }

    pub fn toggle(&self, person_id: &str) -> Option<&Toggle> {
        self.toggles.iter().find(|toggle| toggle.person_id == person_id)
    }

    pub fn connectors_of<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a Connector> + 'a {
        self.connectors
            .iter()
            .filter(move |connector| connector.owner == owner)
    }

    /// Toggles are drawn above cards and win overlapping hits.
    pub fn hit_test(&self, point: Point) -> HitTarget {
        if let Some(toggle) = self.toggles.iter().find(|toggle| toggle.rect.contains(point)) {
            return HitTarget::Toggle(toggle.person_id.clone());
        }
        match self.cards.iter().find(|card| card.rect.contains(point)) {
            Some(card) => HitTarget::Card(card.person_id.clone()),
            None => HitTarget::Background,
        }
    }
}

/// Subtree extent computed before placement.
struct Measure {
    width: f32,
    height: f32,
    couple_width: f32,
    expanded: bool,
    children: Vec<Measure>,
}

impl Measure {
    fn row_width(&self) -> f32 {
        row_width(&self.children)
    }
}

fn row_width(children: &[Measure]) -> f32 {
    if children.is_empty() {
        return 0.0;
    }
    let widths: f32 = children.iter().map(|child| child.width).sum();
    widths + CHILD_COLUMN_GAP * (children.len() - 1) as f32
}

/// Layout engine configured from settings.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    card_options: CardOptions,
    style: LayoutStyle,
}

impl LayoutEngine {
    pub fn new(card_options: CardOptions, style: LayoutStyle) -> Self {
        Self { card_options, style }
    }

    /// Non-vertical orientations fall back to the vertical layout.
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.tree_display.layout != TreeOrientation::Vertical {
            debug!(
                "event=layout_orientation module=layout status=fallback requested={:?} used=Vertical",
                settings.tree_display.layout
            );
        }
        Self::new(
            CardOptions::from_settings(settings),
            LayoutStyle::from_settings(settings),
        )
    }

    pub fn layout_tree(&self, root: &FamilyNode<'_>, collapse: &CollapseState) -> TreeLayout {
        self.layout_roots(std::slice::from_ref(root), collapse)
    }

    /// Lays out every tree of `forest`, stacked top to bottom.
    pub fn layout_forest(&self, forest: &Forest<'_>, collapse: &CollapseState) -> TreeLayout {
        self.layout_roots(&forest.trees, collapse)
    }

    fn layout_roots(&self, roots: &[FamilyNode<'_>], collapse: &CollapseState) -> TreeLayout {
        let mut layout = TreeLayout {
            style: self.style.clone(),
            ..TreeLayout::default()
        };
        let mut top = 0.0_f32;
        let mut width = 0.0_f32;
        for (index, root) in roots.iter().enumerate() {
            if index > 0 {
                top += ROOT_GAP;
            }
            let measure = measure(root, collapse);
            self.place(root, &measure, 0.0, top, &mut layout);
            top += measure.height;
            width = width.max(measure.width);
        }
        layout.size = Size::new(width, top);
        debug!(
            "event=layout_forest module=layout status=ok trees={} cards={} connectors={}",
            roots.len(),
            layout.cards.len(),
            layout.connectors.len()
        );
        layout
    }

    fn place(
        &self,
        node: &FamilyNode<'_>,
        measure: &Measure,
        left: f32,
        top: f32,
        layout: &mut TreeLayout,
    ) {
        let center_x = left + measure.width / 2.0;
        let couple_left = center_x - measure.couple_width / 2.0;
        let owner = node.person.id.clone();

        let primary_rect = Rect::new(couple_left, top, CARD_WIDTH, CARD_HEIGHT);
        layout.cards.push(self.card(
            node.person,
            CardRole::Primary,
            primary_rect,
            node.depth,
            node.spouse,
            relationship_text(node.person, node.parent_name.as_deref()),
        ));

        if let Some(spouse) = node.spouse {
            let spouse_rect = Rect::new(
                primary_rect.right() + SPOUSE_GAP,
                top,
                CARD_WIDTH,
                CARD_HEIGHT,
            );
            layout.cards.push(self.card(
                spouse,
                CardRole::Spouse,
                spouse_rect,
                node.depth,
                Some(node.person),
                spouse_relationship_text(spouse, node.person),
            ));
            let link_y = top + CARD_HEIGHT / 2.0;
            layout.connectors.push(Connector {
                kind: ConnectorKind::Spouse,
                owner: owner.clone(),
                from: Point::new(primary_rect.right(), link_y),
                to: Point::new(spouse_rect.x, link_y),
            });
        }

        if node.has_children() {
            layout.toggles.push(Toggle {
                person_id: owner.clone(),
                rect: Rect::centered(
                    Point::new(primary_rect.center().x, primary_rect.bottom()),
                    Size::new(TOGGLE_SIZE, TOGGLE_SIZE),
                ),
                collapsed: !measure.expanded,
            });
        }
        if !measure.expanded {
            return;
        }

        let block_bottom = top + CARD_HEIGHT;
        if let ([child], [child_measure]) = (node.children.as_slice(), measure.children.as_slice()) {
            let child_top = block_bottom + SINGLE_CHILD_DROP;
            layout.connectors.push(Connector {
                kind: ConnectorKind::ParentDrop,
                owner,
                from: Point::new(center_x, block_bottom),
                to: Point::new(center_x, child_top),
            });
            self.place(
                child,
                child_measure,
                center_x - child_measure.width / 2.0,
                child_top,
                layout,
            );
            return;
        }

        let bar_y = block_bottom + MULTI_CHILD_DROP;
        let child_top = bar_y + CHILD_STUB;
        layout.connectors.push(Connector {
            kind: ConnectorKind::ParentDrop,
            owner: owner.clone(),
            from: Point::new(center_x, block_bottom),
            to: Point::new(center_x, bar_y),
        });

        let mut cursor = center_x - measure.row_width() / 2.0;
        let mut child_centers = Vec::with_capacity(node.children.len());
        for (child, child_measure) in node.children.iter().zip(&measure.children) {
            let child_center = cursor + child_measure.width / 2.0;
            child_centers.push(child_center);
            layout.connectors.push(Connector {
                kind: ConnectorKind::ChildStub,
                owner: owner.clone(),
                from: Point::new(child_center, bar_y),
                to: Point::new(child_center, child_top),
            });
            self.place(child, child_measure, cursor, child_top, layout);
            cursor += child_measure.width + CHILD_COLUMN_GAP;
        }

        let half_unit_span = node.children.len() as f32 * CHILD_UNIT_WIDTH / 2.0;
        let first = child_centers.first().copied().unwrap_or(center_x);
        let last = child_centers.last().copied().unwrap_or(center_x);
        layout.connectors.push(Connector {
            kind: ConnectorKind::SiblingBar,
            owner,
            from: Point::new((center_x - half_unit_span).min(first), bar_y),
            to: Point::new((center_x + half_unit_span).max(last), bar_y),
        });
    }

    fn card(
        &self,
        person: &Person,
        role: CardRole,
        rect: Rect,
        depth: usize,
        partner: Option<&Person>,
        caption: String,
    ) -> PlacedCard {
        PlacedCard {
            person_id: person.id.clone(),
            role,
            rect,
            depth,
            band: generation_band(depth),
            color: resolve_card_color(person, depth, role, partner),
            content: card_content(person, &self.card_options),
            caption,
        }
    }
}

fn measure(node: &FamilyNode<'_>, collapse: &CollapseState) -> Measure {
    let couple_width = if node.spouse.is_some() {
        CARD_WIDTH * 2.0 + SPOUSE_GAP
    } else {
        CARD_WIDTH
    };
    let expanded = node.has_children() && !collapse.is_collapsed(node.id());
    if !expanded {
        return Measure {
            width: couple_width,
            height: CARD_HEIGHT,
            couple_width,
            expanded: false,
            children: Vec::new(),
        };
    }

    let children: Vec<Measure> = node
        .children
        .iter()
        .map(|child| measure(child, collapse))
        .collect();
    let connector_height = if children.len() == 1 {
        SINGLE_CHILD_DROP
    } else {
        MULTI_CHILD_DROP + CHILD_STUB
    };
    let tallest_child = children
        .iter()
        .map(|child| child.height)
        .fold(0.0_f32, f32::max);
    Measure {
        width: couple_width.max(row_width(&children)),
        height: CARD_HEIGHT + connector_height + tallest_child,
        couple_width,
        expanded: true,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConnectorKind, HitTarget, LayoutEngine, CARD_HEIGHT, CARD_WIDTH, CHILD_STUB,
        MULTI_CHILD_DROP, ROOT_GAP, SPOUSE_GAP,
    };
    use crate::layout::card::CardRole;
    use crate::layout::collapse::CollapseState;
    use crate::layout::geometry::{Point, Size};
    use crate::model::person::Person;
    use crate::repo::person_repo::{InMemoryPersonRepository, PersonRepository};
    use crate::tree::TreeBuilder;

    fn repo_with(persons: Vec<Person>) -> InMemoryPersonRepository {
        let mut repo = InMemoryPersonRepository::new();
        for person in persons {
            repo.put(person);
        }
        repo
    }

    fn person(id: &str, children: &[&str]) -> Person {
        let mut person = Person::with_id(id, id.to_uppercase(), "Rai");
        person.children = children.iter().map(|id| id.to_string()).collect();
        person
    }

    #[test]
    fn lone_person_is_one_card() {
        let repo = repo_with(vec![person("a", &[])]);
        let forest = TreeBuilder::default().build_forest(&repo);
        let layout = LayoutEngine::default().layout_forest(&forest, &CollapseState::new());
        assert_eq!(layout.cards.len(), 1);
        assert!(layout.connectors.is_empty());
        assert!(layout.toggles.is_empty());
        assert_eq!(layout.size, Size::new(CARD_WIDTH, CARD_HEIGHT));
    }

    #[test]
    fn couple_gets_spouse_card_and_link() {
        let mut husband = person("h", &[]);
        husband.spouse_id = Some("w".to_string());
        let mut wife = person("w", &[]);
        wife.spouse_id = Some("h".to_string());
        let repo = repo_with(vec![husband, wife]);
        let node = TreeBuilder::default().build("h", &repo).unwrap();
        let layout = LayoutEngine::default().layout_tree(&node, &CollapseState::new());

        assert_eq!(layout.cards.len(), 2);
        assert_eq!(layout.cards[1].role, CardRole::Spouse);
        assert_eq!(layout.size.width, CARD_WIDTH * 2.0 + SPOUSE_GAP);
        let link: Vec<_> = layout.connectors_of("h").collect();
        assert_eq!(link.len(), 1);
        assert_eq!(link[0].kind, ConnectorKind::Spouse);
        assert_eq!(link[0].to.x - link[0].from.x, SPOUSE_GAP);
    }

    #[test]
    fn siblings_share_a_bar_at_least_unit_wide() {
        let repo = repo_with(vec![person("p", &["a", "b"]), person("a", &[]), person("b", &[])]);
        let node = TreeBuilder::default().build("p", &repo).unwrap();
        let layout = LayoutEngine::default().layout_tree(&node, &CollapseState::new());

        let bar = layout
            .connectors
            .iter()
            .find(|connector| connector.kind == ConnectorKind::SiblingBar)
            .unwrap();
        assert_eq!(bar.from, Point::new(40.0, CARD_HEIGHT + MULTI_CHILD_DROP));
        assert_eq!(bar.to, Point::new(320.0, CARD_HEIGHT + MULTI_CHILD_DROP));
        let stubs = layout
            .connectors
            .iter()
            .filter(|connector| connector.kind == ConnectorKind::ChildStub)
            .count();
        assert_eq!(stubs, 2);
        assert_eq!(
            layout.size.height,
            CARD_HEIGHT * 2.0 + MULTI_CHILD_DROP + CHILD_STUB
        );
        assert_eq!(layout.card("p").unwrap().rect.center().x, 180.0);
    }

    #[test]
    fn collapsed_node_keeps_toggle_only() {
        let repo = repo_with(vec![person("p", &["a"]), person("a", &[])]);
        let node = TreeBuilder::default().build("p", &repo).unwrap();
        let mut collapse = CollapseState::new();
        collapse.toggle("p");
        let layout = LayoutEngine::default().layout_tree(&node, &collapse);

        assert_eq!(layout.cards.len(), 1);
        assert!(layout.connectors.is_empty());
        let toggle = layout.toggle("p").unwrap();
        assert!(toggle.collapsed);
        assert_eq!(toggle.glyph(), '+');
    }

    #[test]
    fn hit_test_prefers_toggle_over_card() {
        let repo = repo_with(vec![person("p", &["a"]), person("a", &[])]);
        let node = TreeBuilder::default().build("p", &repo).unwrap();
        let layout = LayoutEngine::default().layout_tree(&node, &CollapseState::new());
        let toggle_center = layout.toggle("p").unwrap().rect.center();
        assert_eq!(layout.hit_test(toggle_center), HitTarget::Toggle("p".to_string()));
        let card_center = layout.card("a").unwrap().rect.center();
        assert_eq!(layout.hit_test(card_center), HitTarget::Card("a".to_string()));
        assert_eq!(layout.hit_test(Point::new(-5.0, -5.0)), HitTarget::Background);
    }

    #[test]
    fn forest_trees_stack_vertically() {
        let repo = repo_with(vec![person("x", &[]), person("y", &[])]);
        let forest = TreeBuilder::default().build_forest(&repo);
        let layout = LayoutEngine::default().layout_forest(&forest, &CollapseState::new());
        assert_eq!(layout.card("y").unwrap().rect.y, CARD_HEIGHT + ROOT_GAP);
        assert_eq!(layout.size.height, CARD_HEIGHT * 2.0 + ROOT_GAP);
    }
}
