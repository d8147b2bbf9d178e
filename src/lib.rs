// Tailwind Studio - project model and element tree store for a visual page builder
//
// This is the library crate containing the data model, the project store and its helpers.
// The binary crate (main.rs) provides a headless command-line shell.

pub mod catalog;
pub mod config;
pub mod host;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use catalog::{ComponentDefinition, component_definitions, get_component_definition};
pub use config::ConfigManager;
pub use models::{
    Breakpoint, EditorState, ElementNode, ElementType, ElementUpdate, Project, ProjectUpdate,
    StudioSettings,
};
pub use state::{ProjectStore, StateChange, StoreError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
