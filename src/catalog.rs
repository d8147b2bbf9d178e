//! Static palette of components the editor can insert.
//!
//! Each [`ComponentDefinition`] describes how to instantiate a new
//! [`ElementNode`] of its type with sensible default classes and properties.
//! The catalog is read-only reference data and is never persisted.

use crate::host::IdSource;
use crate::models::{ElementNode, ElementType};
use indexmap::IndexMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDefinition {
    pub element_type: ElementType,
    pub label: &'static str,
    pub icon: &'static str,
    pub default_classes: &'static str,
    pub default_properties: IndexMap<String, String>,
    pub can_have_children: bool,
}

impl ComponentDefinition {
    fn new(
        element_type: ElementType,
        label: &'static str,
        icon: &'static str,
        default_classes: &'static str,
        default_properties: &[(&str, &str)],
        can_have_children: bool,
    ) -> Self {
        Self {
            element_type,
            label,
            icon,
            default_classes,
            default_properties: default_properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            can_have_children,
        }
    }

    /// Build a fresh childless node with this component's defaults.
    pub fn instantiate(&self, ids: &dyn IdSource) -> ElementNode {
        ElementNode {
            id: ids.generate_id(),
            element_type: self.element_type,
            classes: self.default_classes.to_string(),
            children: Vec::new(),
            properties: self.default_properties.clone(),
        }
    }
}

static COMPONENT_DEFINITIONS: LazyLock<Vec<ComponentDefinition>> = LazyLock::new(|| {
    const FIELD: &str = "px-4 py-2 border border-gray-300 rounded focus:ring-2 focus:ring-blue-500";

    vec![
        ComponentDefinition::new(
            ElementType::Container,
            "Container",
            "📦",
            "container mx-auto px-4",
            &[],
            true,
        ),
        ComponentDefinition::new(ElementType::Row, "Row (Flex)", "➡️", "flex flex-row gap-4", &[], true),
        ComponentDefinition::new(ElementType::Column, "Column", "⬇️", "flex flex-col gap-4", &[], true),
        ComponentDefinition::new(
            ElementType::Button,
            "Button",
            "🔘",
            "px-4 py-2 bg-blue-600 text-white rounded hover:bg-blue-700",
            &[("text", "Button")],
            false,
        ),
        ComponentDefinition::new(
            ElementType::Heading,
            "Heading",
            "🔤",
            "text-3xl font-bold text-gray-900",
            &[("text", "Heading"), ("level", "h1")],
            false,
        ),
        ComponentDefinition::new(
            ElementType::Text,
            "Text",
            "📝",
            "text-base text-gray-700",
            &[("text", "Lorem ipsum dolor sit amet.")],
            false,
        ),
        ComponentDefinition::new(
            ElementType::Image,
            "Image",
            "🖼️",
            "w-full h-64 object-cover rounded",
            &[
                ("src", "https://via.placeholder.com/400x300"),
                ("alt", "Placeholder image"),
            ],
            false,
        ),
        ComponentDefinition::new(
            ElementType::Input,
            "Input",
            "✏️",
            FIELD,
            &[("type", "text"), ("placeholder", "Enter text...")],
            false,
        ),
        ComponentDefinition::new(
            ElementType::Textarea,
            "Textarea",
            "📄",
            "px-4 py-2 border border-gray-300 rounded focus:ring-2 focus:ring-blue-500 w-full",
            &[("placeholder", "Enter text..."), ("rows", "4")],
            false,
        ),
        ComponentDefinition::new(
            ElementType::Select,
            "Select",
            "📋",
            FIELD,
            &[("options", "Option 1,Option 2,Option 3")],
            false,
        ),
    ]
});

/// All component definitions in palette order.
pub fn component_definitions() -> &'static [ComponentDefinition] {
    &COMPONENT_DEFINITIONS
}

/// First definition whose type name equals `element_type`.
pub fn get_component_definition(element_type: &str) -> Option<&'static ComponentDefinition> {
    component_definitions()
        .iter()
        .find(|def| def.element_type.as_str() == element_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SequentialIds;

    #[test]
    fn test_every_type_has_a_definition() {
        for t in ElementType::ALL {
            assert!(get_component_definition(t.as_str()).is_some(), "missing {}", t);
        }
        assert_eq!(component_definitions().len(), ElementType::ALL.len());
    }

    #[test]
    fn test_lookup_unknown_type() {
        assert!(get_component_definition("video").is_none());
    }

    #[test]
    fn test_only_layout_types_have_children() {
        let parents: Vec<ElementType> = component_definitions()
            .iter()
            .filter(|d| d.can_have_children)
            .map(|d| d.element_type)
            .collect();
        assert_eq!(
            parents,
            vec![ElementType::Container, ElementType::Row, ElementType::Column]
        );
    }

    #[test]
    fn test_instantiate_uses_defaults() {
        let ids = SequentialIds::new("el");
        let heading = get_component_definition("heading").unwrap().instantiate(&ids);

        assert_eq!(heading.id, "el-1");
        assert_eq!(heading.element_type, ElementType::Heading);
        assert_eq!(heading.classes, "text-3xl font-bold text-gray-900");
        assert_eq!(heading.properties.get("level").map(String::as_str), Some("h1"));
        assert!(heading.children.is_empty());
    }
}
