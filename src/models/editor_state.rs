use super::element::ElementNode;
use super::project::{Breakpoint, Project};

/// Single source of truth for the editor.
///
/// Holds the active project together with the editor-only state derived from
/// it: the selection, the preview breakpoint and the dirty flag. Nothing here
/// is persisted except through explicit save/export calls on the store.
///
/// # Thread Safety
///
/// `EditorState` is wrapped in `Arc<RwLock<EditorState>>` by
/// [`crate::state::ProjectStore`]. Mutate it only through the store so change
/// events are emitted and the invariants below hold.
///
/// # Invariants
///
/// - `selected_element_id` is `None` whenever `current_project` is `None`.
/// - `is_dirty` is `false` right after a project is created, loaded or saved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorState {
    pub current_project: Option<Project>,

    /// Id of the selected node. Resolved against the tree on read so the
    /// selection always reflects the node's latest contents.
    pub selected_element_id: Option<String>,

    pub current_breakpoint: Breakpoint,

    /// True iff the project has unsaved mutations since the last load or save.
    pub is_dirty: bool,
}

impl EditorState {
    pub fn has_project(&self) -> bool {
        self.current_project.is_some()
    }

    /// The selected node, if it still exists in the current tree.
    pub fn selected_element(&self) -> Option<&ElementNode> {
        let id = self.selected_element_id.as_deref()?;
        self.current_project.as_ref()?.find_element(id)
    }

    pub fn element_count(&self) -> usize {
        self.current_project
            .as_ref()
            .map(Project::element_count)
            .unwrap_or(0)
    }

    /// Replace the current project and reset editor-only state.
    ///
    /// The breakpoint is a viewing preference and survives project switches.
    pub fn replace_project(&mut self, project: Project) {
        self.current_project = Some(project);
        self.selected_element_id = None;
        self.is_dirty = false;
    }

    /// Drop the current project and everything derived from it.
    pub fn close_project(&mut self) {
        self.current_project = None;
        self.selected_element_id = None;
        self.is_dirty = false;
    }

    /// Clear the selection when it points into the subtree rooted at `removed`.
    pub fn clear_selection_within(&mut self, removed: &ElementNode) {
        if let Some(selected) = self.selected_element_id.as_deref() {
            if removed.contains(selected) {
                self.selected_element_id = None;
            }
        }
    }

    /// Short human-readable description used in logs and the CLI.
    pub fn summary(&self) -> String {
        match &self.current_project {
            Some(project) => format!(
                "{} ({} elements{})",
                project.name,
                project.element_count(),
                if self.is_dirty { ", unsaved changes" } else { "" }
            ),
            None => "no project loaded".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ElementType;
    use chrono::Utc;

    fn project_with_button() -> Project {
        let now = Utc::now();
        Project {
            id: "p".to_string(),
            name: "Demo".to_string(),
            description: String::new(),
            root_element: ElementNode::root_container("root")
                .with_child(ElementNode::new("btn", ElementType::Button, "px-4")),
            tailwind_config: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_default_state() {
        let state = EditorState::default();
        assert!(!state.has_project());
        assert!(!state.is_dirty);
        assert_eq!(state.current_breakpoint, Breakpoint::Desktop);
        assert_eq!(state.summary(), "no project loaded");
    }

    #[test]
    fn test_replace_project_resets_selection_and_dirty() {
        let mut state = EditorState::default();
        state.current_breakpoint = Breakpoint::Mobile;
        state.selected_element_id = Some("old".to_string());
        state.is_dirty = true;

        state.replace_project(project_with_button());

        assert!(state.selected_element_id.is_none());
        assert!(!state.is_dirty);
        assert_eq!(state.current_breakpoint, Breakpoint::Mobile);
    }

    #[test]
    fn test_selected_element_resolves_against_tree() {
        let mut state = EditorState::default();
        state.replace_project(project_with_button());
        state.selected_element_id = Some("btn".to_string());
        assert_eq!(state.selected_element().unwrap().classes, "px-4");

        state.selected_element_id = Some("gone".to_string());
        assert!(state.selected_element().is_none());
    }

    #[test]
    fn test_summary() {
        let mut state = EditorState::default();
        state.replace_project(project_with_button());
        assert_eq!(state.summary(), "Demo (2 elements)");
        state.is_dirty = true;
        assert_eq!(state.summary(), "Demo (2 elements, unsaved changes)");
    }
}
