//! Services module - helpers that sit around the project store.
//!
//! # Components
//!
//! - [`tailwind`]: best-effort reader for Tailwind config text and extraction
//!   of the utility classes its `theme.extend` section defines
//! - [`persistence`]: saving and opening project documents on disk on behalf
//!   of the shell
//!
//! Neither service holds editor state. Persistence talks to the store only
//! through its public save/export/import operations.

pub mod persistence;
pub mod tailwind;

pub use persistence::{
    PersistenceError, default_file_name, export_project_file, open_project_file, save_project_file,
};
pub use tailwind::{
    TailwindConfig, TailwindConfigParser, TailwindTheme, extract_custom_classes,
    format_tailwind_config, parse_tailwind_config,
};
