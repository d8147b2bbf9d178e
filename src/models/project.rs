use super::element::{ElementNode, ElementType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Responsive viewport used for previewing the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl Breakpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Breakpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mobile" => Ok(Breakpoint::Mobile),
            "tablet" => Ok(Breakpoint::Tablet),
            "desktop" => Ok(Breakpoint::Desktop),
            other => Err(format!("unknown breakpoint: {}", other)),
        }
    }
}

/// A page-builder project as persisted and exported.
///
/// Field order matters: it is the order of keys in exported JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub root_element: ElementNode,
    /// Raw Tailwind config text, JSON or a simple `module.exports` literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailwind_config: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn element_count(&self) -> usize {
        self.root_element.count()
    }

    pub fn find_element(&self, id: &str) -> Option<&ElementNode> {
        self.root_element.find(id)
    }

    /// Structural checks for documents coming from outside the editor.
    pub fn validate(&self) -> Result<(), String> {
        if self.root_element.element_type != ElementType::Container {
            return Err(format!(
                "root element must be a container, got {}",
                self.root_element.element_type
            ));
        }
        self.root_element.validate_tree()
    }
}

/// Partial update for a [`Project`].
///
/// Identity and timestamps are not mergeable; the store stamps `updated_at`
/// itself on every update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement root. Must be a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_element: Option<ElementNode>,
    /// `Some(None)` clears the config, `Some(Some(..))` replaces it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailwind_config: Option<Option<String>>,
}

impl ProjectUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn tailwind_config(config: Option<String>) -> Self {
        Self {
            tailwind_config: Some(config),
            ..Self::default()
        }
    }

    /// Check that applying this update keeps the project well formed.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(root) = &self.root_element {
            if root.element_type != ElementType::Container {
                return Err(format!(
                    "root element must be a container, got {}",
                    root.element_type
                ));
            }
            root.validate_tree()?;
        }
        Ok(())
    }

    pub fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(root) = self.root_element {
            project.root_element = root;
        }
        if let Some(config) = self.tailwind_config {
            project.tailwind_config = config;
        }
    }
}
