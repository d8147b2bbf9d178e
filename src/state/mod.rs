// State management module
//
// This module provides the ProjectStore which owns the active project and the
// editor state derived from it, and emits change events for the presentation layer.

use crate::catalog;
use crate::host::{Clock, IdSource, SystemClock, UuidSource};
use crate::models::{
    Breakpoint, EditorState, ElementNode, ElementType, ElementUpdate, MAX_TREE_DEPTH, Project,
    ProjectUpdate, StudioSettings,
};
use crate::services::tailwind;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// These events let the presentation layer react to mutations without
/// polling the store.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// A project was created, loaded or imported
    ProjectLoaded { project_id: String, name: String },

    /// The current project was closed
    ProjectClosed,

    /// The project was saved and its `updated_at` stamped
    ProjectSaved { project_id: String },

    /// Project metadata (name, description, Tailwind config) was updated
    ProjectUpdated { name: String },

    /// The element tree changed shape or content
    TreeChanged { element_count: usize },

    SelectionChanged { element_id: Option<String> },

    BreakpointChanged { breakpoint: Breakpoint },

    DirtyChanged { is_dirty: bool },
}

/// Why a strict store operation did nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No project loaded")]
    NoProject,

    #[error("Element {0} not found")]
    ElementNotFound(String),

    #[error("Element id {0} already exists in the tree")]
    DuplicateElementId(String),

    #[error("Element tree depth {depth} would exceed maximum of {max}")]
    TreeTooDeep { depth: usize, max: usize },

    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
}

pub type StoreResult = Result<Vec<StateChange>, StoreError>;

/// Owner of the active project and the only mutation surface for its tree.
///
/// The store is created by the application shell and handed to whichever
/// components need it; there is no global instance.
///
/// # Permissive and strict operations
///
/// Mutations come in two flavors:
/// - `add_element`, `remove_element`, `update_element`, `update_project` never
///   fail. When there is no project, the target id does not exist, or the
///   change would break a tree invariant, they do nothing and return no events.
/// - `try_add_element`, `try_remove_element`, `try_update_element`,
///   `try_update_project` apply the same change but report the reason as a
///   [`StoreError`]. A failed call leaves the state untouched.
///
/// # Usage
///
/// - [`read()`](Self::read) / [`snapshot()`](Self::snapshot) for reading state
/// - [`update()`](Self::update) for raw mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
pub struct ProjectStore {
    state: Arc<RwLock<EditorState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,

    ids: Arc<dyn IdSource>,
    clock: Arc<dyn Clock>,
}

impl ProjectStore {
    /// Create an empty store using random UUIDs and the system clock
    pub fn new() -> Self {
        Self::with_host(Arc::new(UuidSource), Arc::new(SystemClock))
    }

    /// Create an empty store with custom id and time sources
    pub fn with_host(ids: Arc<dyn IdSource>, clock: Arc<dyn Clock>) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(EditorState::default())),
            state_tx,
            ids,
            clock,
        }
    }

    /// Clone of the whole editor state
    pub fn snapshot(&self) -> EditorState {
        self.read(EditorState::clone)
    }

    /// Execute a function with read access to the state
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EditorState) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// Captures the old state, applies `update_fn`, diffs the two and
    /// broadcasts one event per detected change.
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut EditorState),
    {
        self.try_update(|state| {
            update_fn(state);
            Ok(())
        })
        .unwrap_or_default()
    }

    /// Fallible variant of [`update()`](Self::update)
    ///
    /// If `update_fn` returns an error the previous state is restored and no
    /// events are emitted.
    fn try_update<F>(&self, update_fn: F) -> StoreResult
    where
        F: FnOnce(&mut EditorState) -> Result<(), StoreError>,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let old_state = state.clone();

        if let Err(e) = update_fn(&mut state) {
            *state = old_state;
            return Err(e);
        }

        let changes = Self::detect_changes(&old_state, &state);
        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        Ok(changes)
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Push `event` unless an equal event was already detected
    fn emit_once(&self, changes: &mut Vec<StateChange>, event: StateChange) {
        if !changes.contains(&event) {
            let _ = self.state_tx.send(event.clone());
            changes.push(event);
        }
    }

    /// Detect what changed between two states and generate events
    fn detect_changes(old: &EditorState, new: &EditorState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        let old_id = old.current_project.as_ref().map(|p| p.id.as_str());

        match (&old.current_project, &new.current_project) {
            (_, Some(project)) if old_id != Some(project.id.as_str()) => {
                changes.push(StateChange::ProjectLoaded {
                    project_id: project.id.clone(),
                    name: project.name.clone(),
                });
            }
            (Some(_), None) => changes.push(StateChange::ProjectClosed),
            (Some(before), Some(after)) => {
                if before.name != after.name
                    || before.description != after.description
                    || before.tailwind_config != after.tailwind_config
                {
                    changes.push(StateChange::ProjectUpdated {
                        name: after.name.clone(),
                    });
                }
                if before.root_element != after.root_element {
                    changes.push(StateChange::TreeChanged {
                        element_count: after.element_count(),
                    });
                }
            }
            (None, _) => {}
        }

        if old.selected_element_id != new.selected_element_id {
            changes.push(StateChange::SelectionChanged {
                element_id: new.selected_element_id.clone(),
            });
        }

        if old.current_breakpoint != new.current_breakpoint {
            changes.push(StateChange::BreakpointChanged {
                breakpoint: new.current_breakpoint,
            });
        }

        if old.is_dirty != new.is_dirty {
            changes.push(StateChange::DirtyChanged {
                is_dirty: new.is_dirty,
            });
        }

        changes
    }

    /// Log why a permissive operation did nothing
    fn permissive(operation: &str, result: StoreResult) -> Vec<StateChange> {
        match result {
            Ok(changes) => changes,
            Err(
                e @ (StoreError::DuplicateElementId(_)
                | StoreError::TreeTooDeep { .. }
                | StoreError::InvalidUpdate(_)),
            ) => {
                tracing::warn!("{} rejected: {}", operation, e);
                Vec::new()
            }
            Err(e) => {
                tracing::debug!("{} ignored: {}", operation, e);
                Vec::new()
            }
        }
    }

    // Project lifecycle

    /// Create a project with an empty root container and make it current
    ///
    /// Clears the selection and the dirty flag. Never fails.
    pub fn create_new_project(&self, name: &str, description: &str) -> Project {
        let now = self.clock.now();
        let project = Project {
            id: self.ids.generate_id(),
            name: name.to_string(),
            description: description.to_string(),
            root_element: ElementNode::root_container(self.ids.generate_id()),
            tailwind_config: None,
            created_at: now,
            updated_at: now,
        };

        tracing::info!("Created project {} ({})", project.name, project.id);
        self.load_project(project.clone());
        project
    }

    /// Replace the current project verbatim
    ///
    /// No structural validation is performed; use
    /// [`import_project_json()`](Self::import_project_json) for untrusted input.
    pub fn load_project(&self, project: Project) -> Vec<StateChange> {
        let event = StateChange::ProjectLoaded {
            project_id: project.id.clone(),
            name: project.name.clone(),
        };

        let mut changes = self.update(|state| state.replace_project(project));

        // Reloading a project with the same id is still a load
        self.emit_once(&mut changes, event);
        changes
    }

    /// Drop the current project
    pub fn close_project(&self) -> Vec<StateChange> {
        self.update(EditorState::close_project)
    }

    /// Stamp `updated_at`, clear the dirty flag and return the saved project
    ///
    /// Returns `None` when no project is loaded.
    pub fn save_project(&self) -> Option<Project> {
        let now = self.clock.now();
        let mut saved = None;

        let mut changes = self.update(|state| {
            if let Some(project) = state.current_project.as_mut() {
                project.updated_at = now;
                saved = Some(project.clone());
                state.is_dirty = false;
            }
        });

        let project = saved?;
        self.emit_once(
            &mut changes,
            StateChange::ProjectSaved {
                project_id: project.id.clone(),
            },
        );
        tracing::info!("Saved project {} ({})", project.name, project.id);
        Some(project)
    }

    /// Pretty-printed JSON of the current project, or `None` without one
    pub fn export_project_json(&self) -> Option<String> {
        self.read(|state| {
            let project = state.current_project.as_ref()?;
            match serde_json::to_string_pretty(project) {
                Ok(json) => Some(json),
                Err(e) => {
                    tracing::error!("Failed to export project {}: {}", project.id, e);
                    None
                }
            }
        })
    }

    /// Parse `json` as a project and load it
    ///
    /// Returns `false` and leaves the current project untouched when the text
    /// is not a project document, or when its tree is too deep, contains
    /// duplicate ids or has a non-container root.
    pub fn import_project_json(&self, json: &str) -> bool {
        let project: Project = match serde_json::from_str(json) {
            Ok(project) => project,
            Err(e) => {
                tracing::error!("Failed to import project: {}", e);
                return false;
            }
        };

        if let Err(reason) = project.validate() {
            tracing::error!("Rejected imported project {}: {}", project.id, reason);
            return false;
        }

        tracing::info!("Imported project {} ({})", project.name, project.id);
        self.load_project(project);
        true
    }

    // Element tree mutations

    /// Append `element` to the children of `parent_id`, or of the root when
    /// `parent_id` is `None` or empty
    pub fn try_add_element(&self, element: ElementNode, parent_id: Option<&str>) -> StoreResult {
        let parent_id = parent_id.filter(|id| !id.is_empty());

        self.try_update(|state| {
            let project = state.current_project.as_mut().ok_or(StoreError::NoProject)?;

            if let Some(id) = element.first_duplicate_id() {
                return Err(StoreError::DuplicateElementId(id.to_string()));
            }
            if let Some(id) = element
                .ids()
                .into_iter()
                .find(|id| project.root_element.contains(id))
            {
                return Err(StoreError::DuplicateElementId(id.to_string()));
            }

            let parent_level = match parent_id {
                None => 1,
                Some(id) => project
                    .root_element
                    .level_of(id)
                    .ok_or_else(|| StoreError::ElementNotFound(id.to_string()))?,
            };
            check_depth(parent_level + element.depth())?;

            let parent = match parent_id {
                None => &mut project.root_element,
                Some(id) => project
                    .root_element
                    .find_mut(id)
                    .ok_or_else(|| StoreError::ElementNotFound(id.to_string()))?,
            };

            parent.children.push(element);
            state.is_dirty = true;
            Ok(())
        })
    }

    pub fn add_element(&self, element: ElementNode, parent_id: Option<&str>) -> Vec<StateChange> {
        Self::permissive("add_element", self.try_add_element(element, parent_id))
    }

    /// Remove the first node with `element_id` below the root
    ///
    /// The root itself can never be removed. A selection inside the removed
    /// subtree is cleared.
    pub fn try_remove_element(&self, element_id: &str) -> StoreResult {
        self.try_update(|state| {
            let project = state.current_project.as_mut().ok_or(StoreError::NoProject)?;

            let removed = project
                .root_element
                .remove_descendant(element_id)
                .ok_or_else(|| StoreError::ElementNotFound(element_id.to_string()))?;

            state.clear_selection_within(&removed);
            state.is_dirty = true;
            Ok(())
        })
    }

    pub fn remove_element(&self, element_id: &str) -> Vec<StateChange> {
        Self::permissive("remove_element", self.try_remove_element(element_id))
    }

    /// Merge `update` into the node with `element_id`
    ///
    /// Fields absent from the update are left as they are. Replacement
    /// children may not reuse ids found elsewhere in the tree, and the root
    /// must stay a container.
    pub fn try_update_element(&self, element_id: &str, update: ElementUpdate) -> StoreResult {
        self.try_update(|state| {
            let project = state.current_project.as_mut().ok_or(StoreError::NoProject)?;

            if project.root_element.id == element_id {
                if let Some(element_type) = update.element_type {
                    if element_type != ElementType::Container {
                        return Err(StoreError::InvalidUpdate(format!(
                            "root element must be a container, got {}",
                            element_type
                        )));
                    }
                }
            }

            if let Some(children) = &update.children {
                check_replacement_children(&project.root_element, element_id, children)?;

                let level = project
                    .root_element
                    .level_of(element_id)
                    .ok_or_else(|| StoreError::ElementNotFound(element_id.to_string()))?;
                let below = children.iter().map(ElementNode::depth).max().unwrap_or(0);
                check_depth(level + below)?;
            }

            let node = project
                .root_element
                .find_mut(element_id)
                .ok_or_else(|| StoreError::ElementNotFound(element_id.to_string()))?;

            update.apply_to(node);

            if let Some(selected) = state.selected_element_id.as_deref() {
                if !project.root_element.contains(selected) {
                    state.selected_element_id = None;
                }
            }
            state.is_dirty = true;
            Ok(())
        })
    }

    pub fn update_element(&self, element_id: &str, update: ElementUpdate) -> Vec<StateChange> {
        Self::permissive("update_element", self.try_update_element(element_id, update))
    }

    /// Merge `update` into the project, stamp `updated_at` and mark dirty
    ///
    /// The stamp and dirty flag are applied even when no field changes.
    pub fn try_update_project(&self, update: ProjectUpdate) -> StoreResult {
        let now = self.clock.now();

        let mut changes = self.try_update(|state| {
            let project = state.current_project.as_mut().ok_or(StoreError::NoProject)?;
            update.validate().map_err(StoreError::InvalidUpdate)?;

            update.apply_to(project);
            project.updated_at = now;

            if let Some(selected) = state.selected_element_id.as_deref() {
                if !project.root_element.contains(selected) {
                    state.selected_element_id = None;
                }
            }
            state.is_dirty = true;
            Ok(())
        })?;

        let name = self.read(|state| {
            state
                .current_project
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_default()
        });
        self.emit_once(&mut changes, StateChange::ProjectUpdated { name });
        Ok(changes)
    }

    pub fn update_project(&self, update: ProjectUpdate) -> Vec<StateChange> {
        Self::permissive("update_project", self.try_update_project(update))
    }

    // Editor state setters

    /// Select a node by id, or clear the selection with `None`
    ///
    /// The id is not checked against the tree.
    pub fn select_element(&self, element_id: Option<&str>) -> Vec<StateChange> {
        let element_id = element_id.map(str::to_string);
        self.update(|state| state.selected_element_id = element_id)
    }

    pub fn set_breakpoint(&self, breakpoint: Breakpoint) -> Vec<StateChange> {
        self.update(|state| state.current_breakpoint = breakpoint)
    }

    /// Apply editor preferences from the settings file
    pub fn load_from_settings(&self, settings: &StudioSettings) -> Vec<StateChange> {
        tracing::info!(
            "Loaded settings: default_breakpoint={}, debug={}",
            settings.default_breakpoint,
            settings.debug_mode
        );
        self.set_breakpoint(settings.default_breakpoint)
    }

    // Readers

    pub fn current_project(&self) -> Option<Project> {
        self.read(|state| state.current_project.clone())
    }

    pub fn selected_element(&self) -> Option<ElementNode> {
        self.read(|state| state.selected_element().cloned())
    }

    pub fn current_breakpoint(&self) -> Breakpoint {
        self.read(|state| state.current_breakpoint)
    }

    pub fn is_dirty(&self) -> bool {
        self.read(|state| state.is_dirty)
    }

    pub fn find_element(&self, element_id: &str) -> Option<ElementNode> {
        self.read(|state| {
            state
                .current_project
                .as_ref()?
                .find_element(element_id)
                .cloned()
        })
    }

    /// Build a new node from the component catalog using the store's id source
    ///
    /// The node is not inserted; pass it to [`add_element()`](Self::add_element).
    pub fn instantiate_component(&self, element_type: &str) -> Option<ElementNode> {
        catalog::get_component_definition(element_type).map(|def| def.instantiate(self.ids.as_ref()))
    }

    /// Utility classes defined by the current project's Tailwind config
    pub fn custom_classes(&self) -> Vec<String> {
        let config_text = self.read(|state| {
            state
                .current_project
                .as_ref()
                .and_then(|p| p.tailwind_config.clone())
        });

        config_text
            .as_deref()
            .and_then(tailwind::parse_tailwind_config)
            .map(|config| tailwind::extract_custom_classes(&config))
            .unwrap_or_default()
    }
}

/// Reject a tree that would grow deeper than [`MAX_TREE_DEPTH`] levels.
fn check_depth(depth: usize) -> Result<(), StoreError> {
    if depth > MAX_TREE_DEPTH {
        return Err(StoreError::TreeTooDeep {
            depth,
            max: MAX_TREE_DEPTH,
        });
    }
    Ok(())
}

/// Reject replacement children that would duplicate an id already in the tree.
///
/// Ids inside the target's current subtree are about to be replaced, so they
/// may be reused.
fn check_replacement_children(
    root: &ElementNode,
    target_id: &str,
    children: &[ElementNode],
) -> Result<(), StoreError> {
    let target = root
        .find(target_id)
        .ok_or_else(|| StoreError::ElementNotFound(target_id.to_string()))?;

    let mut taken: HashSet<&str> = root.ids().into_iter().collect();
    for id in target.ids().into_iter().skip(1) {
        taken.remove(id);
    }

    let mut seen = HashSet::new();
    for child in children {
        for id in child.ids() {
            if taken.contains(id) || !seen.insert(id) {
                return Err(StoreError::DuplicateElementId(id.to_string()));
            }
        }
    }

    Ok(())
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the same state and channel
impl Clone for ProjectStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
            ids: Arc::clone(&self.ids),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockClock, SequentialIds};
    use chrono::{TimeZone, Utc};

    fn fixed_store() -> ProjectStore {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        ProjectStore::with_host(Arc::new(SequentialIds::new("id")), Arc::new(clock))
    }

    fn button(id: &str) -> ElementNode {
        ElementNode::new(id, ElementType::Button, "px-4").with_property("text", "Go")
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ProjectStore::new();
        let state = store.snapshot();

        assert!(state.current_project.is_none());
        assert!(!state.is_dirty);
        assert_eq!(state.current_breakpoint, Breakpoint::Desktop);
    }

    #[test]
    fn test_create_new_project() {
        let store = fixed_store();
        let project = store.create_new_project("Landing", "");

        assert_eq!(project.id, "id-1");
        assert_eq!(project.root_element.id, "id-2");
        assert_eq!(project.root_element.element_type, ElementType::Container);
        assert_eq!(project.root_element.classes, "w-full min-h-screen bg-white p-4");
        assert!(project.root_element.children.is_empty());
        assert!(project.root_element.properties.is_empty());
        assert_eq!(project.created_at, project.updated_at);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_create_clears_selection_and_dirty() {
        let store = fixed_store();
        store.create_new_project("First", "");
        store.add_element(button("b"), None);
        store.select_element(Some("b"));
        assert!(store.is_dirty());

        store.create_new_project("Second", "");
        let state = store.snapshot();
        assert!(state.selected_element_id.is_none());
        assert!(!state.is_dirty);
    }

    #[test]
    fn test_add_and_remove_scenario() {
        let store = fixed_store();
        store.create_new_project("Landing", "");

        let changes = store.add_element(button("btn1"), None);
        assert!(changes.contains(&StateChange::TreeChanged { element_count: 2 }));
        assert!(changes.contains(&StateChange::DirtyChanged { is_dirty: true }));

        let root = store.current_project().unwrap().root_element;
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].id, "btn1");

        store.select_element(Some("btn1"));
        store.remove_element("btn1");

        let root = store.current_project().unwrap().root_element;
        assert!(root.children.is_empty());
        assert!(store.selected_element().is_none());
    }

    #[test]
    fn test_add_to_nested_parent() {
        let store = fixed_store();
        store.create_new_project("Nested", "");
        store.add_element(ElementNode::new("row", ElementType::Row, "flex"), None);
        store.add_element(button("a"), Some("row"));
        store.add_element(button("b"), Some("row"));

        let row = store.find_element("row").unwrap();
        let ids: Vec<&str> = row.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_add_with_empty_parent_id_targets_root() {
        let store = fixed_store();
        store.create_new_project("Root", "");
        store.add_element(button("a"), Some(""));
        assert_eq!(store.current_project().unwrap().root_element.children.len(), 1);
    }

    #[test]
    fn test_add_to_missing_parent_is_noop() {
        let store = fixed_store();
        store.create_new_project("Missing", "");

        let changes = store.add_element(button("a"), Some("nope"));
        assert!(changes.is_empty());
        assert!(!store.is_dirty());
        assert_eq!(
            store.try_add_element(button("a"), Some("nope")),
            Err(StoreError::ElementNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_add_duplicate_id_is_rejected() {
        let store = fixed_store();
        store.create_new_project("Dup", "");
        store.add_element(button("a"), None);

        assert_eq!(
            store.try_add_element(button("a"), None),
            Err(StoreError::DuplicateElementId("a".to_string()))
        );
        assert_eq!(store.current_project().unwrap().element_count(), 2);
    }

    #[test]
    fn test_mutations_without_project_are_noops() {
        let store = fixed_store();

        assert!(store.add_element(button("a"), None).is_empty());
        assert!(store.remove_element("a").is_empty());
        assert!(store.update_element("a", ElementUpdate::classes("x")).is_empty());
        assert!(store.update_project(ProjectUpdate::name("x")).is_empty());
        assert!(store.save_project().is_none());
        assert!(store.export_project_json().is_none());
        assert_eq!(store.try_remove_element("a"), Err(StoreError::NoProject));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_remove_missing_element_keeps_dirty_flag() {
        let store = fixed_store();
        store.create_new_project("Clean", "");

        assert!(store.remove_element("ghost").is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_remove_root_is_impossible() {
        let store = fixed_store();
        let project = store.create_new_project("Root", "");

        assert_eq!(
            store.try_remove_element(&project.root_element.id),
            Err(StoreError::ElementNotFound(project.root_element.id.clone()))
        );
        assert!(store.current_project().is_some());
    }

    #[test]
    fn test_remove_parent_clears_nested_selection() {
        let store = fixed_store();
        store.create_new_project("Sel", "");
        store.add_element(ElementNode::new("col", ElementType::Column, ""), None);
        store.add_element(button("inner"), Some("col"));
        store.select_element(Some("inner"));

        let changes = store.remove_element("col");
        assert!(changes.contains(&StateChange::SelectionChanged { element_id: None }));
    }

    #[test]
    fn test_update_element_merges_fields() {
        let store = fixed_store();
        store.create_new_project("Upd", "");
        store.add_element(ElementNode::new("row", ElementType::Row, "flex"), None);
        store.add_element(button("a"), Some("row"));

        store.update_element("row", ElementUpdate::classes("flex gap-2"));

        let row = store.find_element("row").unwrap();
        assert_eq!(row.classes, "flex gap-2");
        assert_eq!(row.element_type, ElementType::Row);
        assert_eq!(row.children, vec![button("a")]);
        assert!(store.is_dirty());
    }

    #[test]
    fn test_update_element_rejects_colliding_children() {
        let store = fixed_store();
        store.create_new_project("Upd", "");
        store.add_element(ElementNode::new("row", ElementType::Row, ""), None);
        store.add_element(button("a"), Some("row"));
        store.add_element(button("b"), None);

        let reuse_own = ElementUpdate {
            children: Some(vec![button("a")]),
            ..ElementUpdate::default()
        };
        assert!(store.try_update_element("row", reuse_own).is_ok());

        let steal = ElementUpdate {
            children: Some(vec![button("b")]),
            ..ElementUpdate::default()
        };
        assert_eq!(
            store.try_update_element("row", steal),
            Err(StoreError::DuplicateElementId("b".to_string()))
        );
    }

    #[test]
    fn test_update_project_always_marks_dirty() {
        let store = fixed_store();
        let project = store.create_new_project("Same", "");

        let changes = store.update_project(ProjectUpdate::default());
        assert!(changes.contains(&StateChange::DirtyChanged { is_dirty: true }));
        assert!(changes.contains(&StateChange::ProjectUpdated {
            name: "Same".to_string()
        }));
        assert_eq!(store.current_project().unwrap().id, project.id);
    }

    #[test]
    fn test_update_project_rejects_non_container_root() {
        let store = fixed_store();
        store.create_new_project("Root", "");

        let update = ProjectUpdate {
            root_element: Some(button("x")),
            ..ProjectUpdate::default()
        };
        assert!(matches!(
            store.try_update_project(update),
            Err(StoreError::InvalidUpdate(_))
        ));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_update_project_without_project_reports_no_project() {
        let store = fixed_store();
        let update = ProjectUpdate {
            root_element: Some(button("x")),
            ..ProjectUpdate::default()
        };
        assert_eq!(store.try_update_project(update), Err(StoreError::NoProject));
    }

    #[test]
    fn test_root_type_cannot_change() {
        let store = fixed_store();
        let project = store.create_new_project("Landing", "");
        let root_id = project.root_element.id.clone();

        let update = ElementUpdate {
            element_type: Some(ElementType::Button),
            ..ElementUpdate::default()
        };
        assert!(matches!(
            store.try_update_element(&root_id, update.clone()),
            Err(StoreError::InvalidUpdate(_))
        ));
        assert!(store.update_element(&root_id, update).is_empty());

        let root = store.current_project().unwrap().root_element;
        assert_eq!(root.element_type, ElementType::Container);
        assert!(!store.is_dirty());

        // Classes on the root stay editable, and the result still imports
        store.update_element(&root_id, ElementUpdate::classes("bg-gray-50"));
        let json = store.export_project_json().unwrap();
        assert!(fixed_store().import_project_json(&json));
    }

    #[test]
    fn test_add_element_stops_at_max_depth() {
        let store = fixed_store();
        store.create_new_project("Deep", "");

        // The root is level 1, so levels 2..=MAX_TREE_DEPTH fit
        let mut parent: Option<String> = None;
        for level in 2..=MAX_TREE_DEPTH {
            let id = format!("n{}", level);
            let node = ElementNode::new(id.clone(), ElementType::Container, "");
            assert!(store.try_add_element(node, parent.as_deref()).is_ok());
            parent = Some(id);
        }

        let too_deep = ElementNode::new("overflow", ElementType::Text, "");
        assert_eq!(
            store.try_add_element(too_deep, parent.as_deref()),
            Err(StoreError::TreeTooDeep {
                depth: MAX_TREE_DEPTH + 1,
                max: MAX_TREE_DEPTH
            })
        );
        assert!(store.find_element("overflow").is_none());

        let project = store.current_project().unwrap();
        assert_eq!(project.root_element.depth(), MAX_TREE_DEPTH);
        let json = store.export_project_json().unwrap();
        assert!(fixed_store().import_project_json(&json));
    }

    #[test]
    fn test_add_nested_subtree_counts_its_depth() {
        let store = fixed_store();
        store.create_new_project("Deep", "");

        let mut subtree = ElementNode::new("leaf", ElementType::Text, "");
        for i in 0..MAX_TREE_DEPTH {
            subtree = ElementNode::new(format!("s{}", i), ElementType::Container, "").with_child(subtree);
        }

        assert!(matches!(
            store.try_add_element(subtree, None),
            Err(StoreError::TreeTooDeep { .. })
        ));
        assert_eq!(store.current_project().unwrap().element_count(), 1);
    }

    #[test]
    fn test_replacement_children_respect_max_depth() {
        let store = fixed_store();
        store.create_new_project("Deep", "");
        store.add_element(ElementNode::new("row", ElementType::Row, ""), None);

        // "row" sits at level 2, so its children may be at most MAX_TREE_DEPTH - 2 deep
        let mut child = ElementNode::new("c0", ElementType::Text, "");
        for i in 1..(MAX_TREE_DEPTH - 1) {
            child = ElementNode::new(format!("c{}", i), ElementType::Container, "").with_child(child);
        }
        assert_eq!(child.depth(), MAX_TREE_DEPTH - 1);

        let update = ElementUpdate {
            children: Some(vec![child]),
            ..ElementUpdate::default()
        };
        assert!(matches!(
            store.try_update_element("row", update),
            Err(StoreError::TreeTooDeep { .. })
        ));
        assert!(store.find_element("row").unwrap().children.is_empty());
    }

    #[test]
    fn test_save_clears_dirty_and_emits_saved() {
        let store = fixed_store();
        store.create_new_project("Save", "");
        store.add_element(button("a"), None);

        let mut rx = store.subscribe();
        let saved = store.save_project().unwrap();

        assert!(!store.is_dirty());
        assert_eq!(saved.root_element.children.len(), 1);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(events.contains(&StateChange::DirtyChanged { is_dirty: false }));
        assert!(events.contains(&StateChange::ProjectSaved {
            project_id: saved.id.clone()
        }));
    }

    #[test]
    fn test_reload_same_project_emits_loaded() {
        let store = fixed_store();
        let project = store.create_new_project("Again", "");

        let changes = store.load_project(project.clone());
        assert!(changes.contains(&StateChange::ProjectLoaded {
            project_id: project.id,
            name: "Again".to_string()
        }));
    }

    #[test]
    fn test_import_rejects_garbage_and_keeps_state() {
        let store = fixed_store();
        let project = store.create_new_project("Keep", "");

        assert!(!store.import_project_json("{ not json"));
        assert!(!store.import_project_json(r#"{"id": 5}"#));
        assert_eq!(store.current_project().unwrap().id, project.id);
    }

    #[test]
    fn test_instantiate_component_uses_store_ids() {
        let store = fixed_store();
        let node = store.instantiate_component("button").unwrap();
        assert_eq!(node.id, "id-1");
        assert_eq!(node.properties.get("text").map(String::as_str), Some("Button"));
        assert!(store.instantiate_component("video").is_none());
    }

    #[test]
    fn test_custom_classes_from_project_config() {
        let store = fixed_store();
        store.create_new_project("Theme", "");
        assert!(store.custom_classes().is_empty());

        store.update_project(ProjectUpdate::tailwind_config(Some(
            r##"{"theme":{"extend":{"colors":{"brand":"#fff"}}}}"##.to_string(),
        )));
        assert_eq!(
            store.custom_classes(),
            vec!["bg-brand", "text-brand", "border-brand"]
        );
    }

    #[test]
    fn test_breakpoint_change_event() {
        let store = fixed_store();
        let changes = store.set_breakpoint(Breakpoint::Tablet);
        assert_eq!(
            changes,
            vec![StateChange::BreakpointChanged {
                breakpoint: Breakpoint::Tablet
            }]
        );
        assert!(store.set_breakpoint(Breakpoint::Tablet).is_empty());
    }

    #[test]
    fn test_load_from_settings() {
        let store = fixed_store();
        let settings = StudioSettings {
            default_breakpoint: Breakpoint::Mobile,
            ..StudioSettings::default()
        };
        store.load_from_settings(&settings);
        assert_eq!(store.current_breakpoint(), Breakpoint::Mobile);
    }

    #[test]
    fn test_clone_shares_state() {
        let store1 = fixed_store();
        let store2 = store1.clone();

        store1.create_new_project("Shared", "");
        assert_eq!(store2.current_project().unwrap().name, "Shared");
    }
}
