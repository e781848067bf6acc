//! # Content Nodes
//!
//! A minimal content tree standing in for the host's view hierarchy.
//!
//! Controllers produce a `ContentNode`; the mount wraps it in a root node
//! tagged with the mount's `MountId`, which is what the render surface holds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node kind used for controller roots.
pub const ROOT_KIND: &str = "controller-root";

/// Identity of one mounted controller instance.
///
/// Allocated by the navigator, never reused within a navigator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MountId(pub u64);

/// One node of displayable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Node kind (e.g. `text`, `column`).
    pub kind: String,

    /// Optional text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Free-form attributes, ordered.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Set only on controller roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount: Option<MountId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    /// Create an empty node of the given kind.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: None,
            attributes: BTreeMap::new(),
            mount: None,
            children: Vec::new(),
        }
    }

    /// Shorthand for a `text` node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new("text").with_text(text)
    }

    /// Root node wrapping a controller's content.
    #[must_use]
    pub fn root(mount: MountId, content: ContentNode) -> Self {
        Self {
            mount: Some(mount),
            children: vec![content],
            ..Self::new(ROOT_KIND)
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: ContentNode) -> Self {
        self.children.push(child);
        self
    }

    /// Whether this node is the root of the given mount.
    #[must_use]
    pub fn is_root_of(&self, mount: MountId) -> bool {
        self.mount == Some(mount)
    }

    /// Total number of nodes in this subtree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ContentNode::node_count).sum::<usize>()
    }

    /// Render the subtree as an indented outline, one node per line.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_into(0, &mut out);
        out
    }

    fn outline_into(&self, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.kind);
        if let Some(mount) = self.mount {
            out.push_str(&format!(" [mount {}]", mount.0));
        }
        if let Some(text) = &self.text {
            out.push_str(&format!(" \"{}\"", text));
        }
        for (k, v) in &self.attributes {
            out.push_str(&format!(" {}={}", k, v));
        }
        out.push('\n');
        for child in &self.children {
            child.outline_into(depth + 1, out);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_wraps_content_and_tags_mount() {
        let root = ContentNode::root(MountId(4), ContentNode::text("hello"));

        assert_eq!(root.kind, ROOT_KIND);
        assert!(root.is_root_of(MountId(4)));
        assert!(!root.is_root_of(MountId(5)));
        assert_eq!(root.node_count(), 2);
    }

    #[test]
    fn outline_indents_children() {
        let node = ContentNode::new("column")
            .with_attribute("gap", "2")
            .with_child(ContentNode::text("a"))
            .with_child(ContentNode::text("b"));

        assert_eq!(node.outline(), "column gap=2\n  text \"a\"\n  text \"b\"\n");
    }
}
