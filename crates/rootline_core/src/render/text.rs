//! Indented outline renderer.
//!
//! One line per primary node, spouse joined with `&`, children below with
//! box-drawing connectors. Nodes with children carry `[-]` or `[+]`.

use crate::layout::card::{card_content, CardContent, CardOptions};
use crate::layout::collapse::CollapseState;
use crate::tree::{FamilyNode, Forest, EMPTY_STATE_MESSAGE};

pub const DEFAULT_NAME_WIDTH: usize = 32;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

pub fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if text.chars().count() <= max_len {
        return text.to_owned();
    }
    if max_len == 1 {
        return "…".to_owned();
    }
    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    card_options: CardOptions,
    name_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(CardOptions::default())
    }
}

impl TextRenderer {
    pub fn new(card_options: CardOptions) -> Self {
        Self {
            card_options,
            name_width: DEFAULT_NAME_WIDTH,
        }
    }

    pub fn with_name_width(mut self, name_width: usize) -> Self {
        self.name_width = name_width;
        self
    }

    /// Renders every tree; an empty forest renders the empty-state message.
    pub fn render_forest(&self, forest: &Forest<'_>, collapse: &CollapseState) -> String {
        if forest.is_empty() {
            return EMPTY_STATE_MESSAGE.to_string();
        }
        forest
            .trees
            .iter()
            .map(|tree| self.render_tree(tree, collapse))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn render_tree(&self, root: &FamilyNode<'_>, collapse: &CollapseState) -> String {
        let mut lines = Vec::with_capacity(root.node_count());
        lines.push(self.node_line(root, collapse));
        self.render_children(root, collapse, "", &mut lines);
        lines.join("\n")
    }

    fn render_children(
        &self,
        node: &FamilyNode<'_>,
        collapse: &CollapseState,
        prefix: &str,
        lines: &mut Vec<String>,
    ) {
        if collapse.is_collapsed(node.id()) {
            return;
        }
        let last_index = node.children.len().saturating_sub(1);
        for (index, child) in node.children.iter().enumerate() {
            let is_last = index == last_index;
            let branch = if is_last { LAST_BRANCH } else { BRANCH };
            lines.push(format!("{prefix}{branch}{}", self.node_line(child, collapse)));
            let nested = format!("{prefix}{}", if is_last { BLANK } else { PIPE });
            self.render_children(child, collapse, &nested, lines);
        }
    }

    fn node_line(&self, node: &FamilyNode<'_>, collapse: &CollapseState) -> String {
        let mut line = self.label(&card_content(node.person, &self.card_options));
        if let Some(spouse) = node.spouse {
            line.push_str(" & ");
            line.push_str(&self.label(&card_content(spouse, &self.card_options)));
        }
        if node.has_children() {
            line.push_str(if collapse.is_collapsed(node.id()) {
                " [+]"
            } else {
                " [-]"
            });
        }
        line
    }

    fn label(&self, content: &CardContent) -> String {
        let name = truncate_with_ellipsis(&content.name, self.name_width);
        let dates: Vec<&str> = [content.birth.as_deref(), content.death.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if dates.is_empty() {
            name
        } else {
            format!("{name} ({})", dates.join(", "))
        }
    }
}
