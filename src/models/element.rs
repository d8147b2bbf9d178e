use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Classes given to the root container of every new project.
pub const DEFAULT_ROOT_CLASSES: &str = "w-full min-h-screen bg-white p-4";

/// Maximum nesting depth accepted from imported documents.
///
/// Page trees built in the editor stay far below this. Anything deeper is
/// treated as hostile or corrupt input by [`ElementNode::validate_tree`].
pub const MAX_TREE_DEPTH: usize = 64;

/// Kind of UI element a node renders as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Container,
    Row,
    Column,
    Button,
    Text,
    Heading,
    Image,
    Input,
    Textarea,
    Select,
}

impl ElementType {
    pub const ALL: [ElementType; 10] = [
        ElementType::Container,
        ElementType::Row,
        ElementType::Column,
        ElementType::Button,
        ElementType::Text,
        ElementType::Heading,
        ElementType::Image,
        ElementType::Input,
        ElementType::Textarea,
        ElementType::Select,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Container => "container",
            ElementType::Row => "row",
            ElementType::Column => "column",
            ElementType::Button => "button",
            ElementType::Text => "text",
            ElementType::Heading => "heading",
            ElementType::Image => "image",
            ElementType::Input => "input",
            ElementType::Textarea => "textarea",
            ElementType::Select => "select",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown element type: {}", s))
    }
}

/// One node of the composed page tree.
///
/// Children are owned by their parent, so a tree can never contain a cycle or
/// a node with two parents. Id uniqueness across the tree is maintained by
/// [`ProjectStore`](crate::state::ProjectStore), not by this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub classes: String,
    #[serde(default)]
    pub children: Vec<ElementNode>,
    /// Free-form attributes such as `text`, `href`, `alt`, `placeholder`.
    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

impl ElementNode {
    pub fn new(id: impl Into<String>, element_type: ElementType, classes: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            element_type,
            classes: classes.into(),
            children: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    /// Build the root container used by freshly created projects.
    pub fn root_container(id: impl Into<String>) -> Self {
        Self::new(id, ElementType::Container, DEFAULT_ROOT_CLASSES)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    /// Pre-order depth-first search returning the first node with `id`.
    pub fn find(&self, id: &str) -> Option<&ElementNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable counterpart of [`find`](Self::find), same traversal order.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut ElementNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Remove the first descendant whose id matches.
    ///
    /// Only children are ever matched, so calling this on the root can never
    /// remove the root itself. Sibling order is preserved.
    pub fn remove_descendant(&mut self, id: &str) -> Option<ElementNode> {
        if let Some(index) = self.children.iter().position(|child| child.id == id) {
            return Some(self.children.remove(index));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_descendant(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ElementNode::count).sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(ElementNode::depth).max().unwrap_or(0)
    }

    /// Level of the first node with `id` in this subtree, counting `self` as 1.
    pub fn level_of(&self, id: &str) -> Option<usize> {
        if self.id == id {
            return Some(1);
        }
        self.children
            .iter()
            .find_map(|child| child.level_of(id))
            .map(|level| level + 1)
    }

    /// Visit every node in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ElementNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Ids of every node in this subtree, in pre-order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.walk(&mut |node| ids.push(node.id.as_str()));
        ids
    }

    /// First id that occurs more than once in this subtree, if any.
    pub fn first_duplicate_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.ids().into_iter().find(|id| !seen.insert(*id))
    }

    /// Structural checks applied to untrusted trees.
    ///
    /// Depth is checked before ids so an absurdly deep tree is rejected
    /// without walking it twice.
    pub fn validate_tree(&self) -> Result<(), String> {
        let depth = self.depth();
        if depth > MAX_TREE_DEPTH {
            return Err(format!(
                "element tree depth {} exceeds maximum of {}",
                depth, MAX_TREE_DEPTH
            ));
        }
        if let Some(id) = self.first_duplicate_id() {
            return Err(format!("duplicate element id: {}", id));
        }
        Ok(())
    }
}

/// Partial update for an [`ElementNode`].
///
/// Each `Some` field overwrites the node's value; `None` leaves it untouched.
/// The id is deliberately absent: ids are immutable once a node is in a tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementUpdate {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<ElementType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ElementNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, String>>,
}

impl ElementUpdate {
    pub fn classes(classes: impl Into<String>) -> Self {
        Self {
            classes: Some(classes.into()),
            ..Self::default()
        }
    }

    pub fn properties(properties: IndexMap<String, String>) -> Self {
        Self {
            properties: Some(properties),
            ..Self::default()
        }
    }

    /// Apply the provided fields to `node`.
    pub fn apply_to(self, node: &mut ElementNode) {
        if let Some(element_type) = self.element_type {
            node.element_type = element_type;
        }
        if let Some(classes) = self.classes {
            node.classes = classes;
        }
        if let Some(children) = self.children {
            node.children = children;
        }
        if let Some(properties) = self.properties {
            node.properties = properties;
        }
    }
}
