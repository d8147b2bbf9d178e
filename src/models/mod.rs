//! Data models for Tailwind Studio.
//!
//! - [`ElementNode`] / [`ElementType`]: one node of the composed page tree
//! - [`Project`]: the persisted document owning exactly one root container
//! - [`ElementUpdate`] / [`ProjectUpdate`]: typed partial updates
//! - [`EditorState`]: the active project plus selection, breakpoint and dirty flag
//! - [`StudioSettings`]: editor preferences loaded from `Studio Settings.yaml`
//!
//! # Architecture Note
//!
//! Documents (`Project`, `ElementNode`) serialize to the camelCase JSON export
//! format. `EditorState` is never serialized; it lives inside
//! [`ProjectStore`](crate::state::ProjectStore) and is mutated only through it.

pub mod editor_state;
pub mod element;
pub mod project;
pub mod settings;

pub use editor_state::EditorState;
pub use element::{DEFAULT_ROOT_CLASSES, ElementNode, ElementType, ElementUpdate, MAX_TREE_DEPTH};
pub use project::{Breakpoint, Project, ProjectUpdate};
pub use settings::{MAX_RECENT_PROJECTS, StudioSettings};
