//! The document tree rendered into the terminal.
//!
//! A [`Node`] is the unit of rendered content: a tag, text, an optional
//! class, an optional owning post id, and children. A [`Fragment`] is an
//! unattached list of nodes prepared for single-step insertion by the
//! caller. Neither talks to a terminal; rendering lives in `bulletin-tui`.

use serde::{Deserialize, Serialize};

use crate::ids::PostId;

/// Structural role of a node. Controls styling only, never behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    /// Post title.
    Heading,
    /// Comment author heading.
    Subheading,
    /// Generic text block. The default when no tag is given.
    #[default]
    Text,
    /// Comment toggle control.
    Button,
    /// Comment container for one post.
    Section,
    /// One post or one comment.
    Article,
}

/// A single rendered element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub tag: Tag,
    pub text: String,
    pub class: Option<String>,
    pub post_id: Option<PostId>,
    pub children: Vec<Node>,
}

impl Node {
    /// Build an element from its parts. The tag defaults to a generic text
    /// block, the text to empty. Never fails.
    #[must_use]
    pub fn element(tag: Option<Tag>, text: Option<&str>, class: Option<&str>) -> Self {
        Self {
            tag: tag.unwrap_or_default(),
            text: text.unwrap_or_default().to_string(),
            class: class.map(ToString::to_string),
            post_id: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_post_id(mut self, id: PostId) -> Self {
        self.post_id = Some(id);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.class.as_deref() == Some(class)
    }
}

/// An unattached collection of nodes, inserted in one step by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment(Vec<Node>);

impl Fragment {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, node: Node) {
        self.0.push(node);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.0
    }
}

impl From<Vec<Node>> for Fragment {
    fn from(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }
}

impl FromIterator<Node> for Fragment {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Fragment {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Per-post comment visibility.
///
/// The toggle button label and the section's hidden state are both derived
/// from this enum, so they cannot disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentVisibility {
    #[default]
    Collapsed,
    Expanded,
}

impl CommentVisibility {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }

    /// Label shown on the comment toggle for this state.
    #[must_use]
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Collapsed => "Show Comments",
            Self::Expanded => "Hide Comments",
        }
    }

    #[must_use]
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_defaults_to_empty_text_block() {
        let node = Node::element(None, None, None);
        assert_eq!(node.tag, Tag::Text);
        assert_eq!(node.text, "");
        assert!(node.class.is_none());
        assert!(node.children.is_empty());
    }

    #[test]
    fn element_applies_tag_text_and_class() {
        let node = Node::element(Some(Tag::Button), Some("Show Comments"), Some("toggle"));
        assert_eq!(node.tag, Tag::Button);
        assert_eq!(node.text, "Show Comments");
        assert!(node.has_class("toggle"));
    }

    #[test]
    fn visibility_round_trips_in_two_toggles() {
        let start = CommentVisibility::Collapsed;
        let flipped = start.toggled();
        assert_eq!(flipped, CommentVisibility::Expanded);
        assert_eq!(flipped.button_label(), "Hide Comments");
        assert!(!flipped.is_hidden());
        assert_eq!(flipped.toggled(), start);
        assert_eq!(flipped.toggled().button_label(), "Show Comments");
    }
}
