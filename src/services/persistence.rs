use crate::models::Project;
use crate::state::ProjectStore;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// Conventional extension for project documents.
pub const PROJECT_FILE_EXTENSION: &str = "studio.json";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("No project loaded")]
    NoProject,

    #[error("Failed to read project file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write project file {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("{0} is not a valid project document")]
    InvalidDocument(Utf8PathBuf),
}

/// Save the current project to `path`.
///
/// Stamps `updated_at` and clears the dirty flag through
/// [`ProjectStore::save_project`], then writes the exported JSON.
pub fn save_project_file(store: &ProjectStore, path: &Utf8Path) -> Result<Project, PersistenceError> {
    let project = store.save_project().ok_or(PersistenceError::NoProject)?;
    export_project_file(store, path)?;
    tracing::info!("Wrote project {} to {}", project.id, path);
    Ok(project)
}

/// Write the current project to `path` without stamping or clearing dirty.
pub fn export_project_file(store: &ProjectStore, path: &Utf8Path) -> Result<(), PersistenceError> {
    let json = store.export_project_json().ok_or(PersistenceError::NoProject)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, json).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the project stored at `path` into `store`.
///
/// The store is left untouched when the file cannot be read or is rejected by
/// [`ProjectStore::import_project_json`].
pub fn open_project_file(store: &ProjectStore, path: &Utf8Path) -> Result<Project, PersistenceError> {
    let json = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if !store.import_project_json(&json) {
        return Err(PersistenceError::InvalidDocument(path.to_path_buf()));
    }

    store
        .current_project()
        .ok_or_else(|| PersistenceError::InvalidDocument(path.to_path_buf()))
}

/// Default file name for a project: its name slugified plus the extension.
pub fn default_file_name(project: &Project) -> String {
    let slug: String = project
        .name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        format!("{}.{}", project.id, PROJECT_FILE_EXTENSION)
    } else {
        format!("{}.{}", slug, PROJECT_FILE_EXTENSION)
    }
}
