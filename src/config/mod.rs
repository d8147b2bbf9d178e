use crate::models::StudioSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the editor settings inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "Studio Settings.yaml";

/// Prefix of environment variables overriding settings
/// (e.g. `TAILWIND_STUDIO_DEBUG_MODE=true`).
pub const ENV_PREFIX: &str = "TAILWIND_STUDIO";

/// Configuration manager for loading and saving editor settings.
///
/// Settings are read from `Studio Settings.yaml` in the config directory,
/// with `TAILWIND_STUDIO_*` environment variables layered on top. Saving
/// writes only the YAML file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager, creating `config_dir` if needed.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE_NAME),
            config_dir,
        })
    }

    /// Load settings from the YAML file and the environment.
    ///
    /// # Returns
    /// The merged settings; defaults fill anything neither source provides
    pub fn load_settings(&self) -> Result<StudioSettings> {
        self.load_settings_with_env(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Load settings with an explicit environment source.
    ///
    /// Tests use this to inject variables without touching the process
    /// environment.
    pub fn load_settings_with_env(&self, env: config::Environment) -> Result<StudioSettings> {
        self.load_settings_from(Some(env))
    }

    /// Load settings from the YAML file alone, ignoring environment overrides.
    ///
    /// Use this for read-modify-write cycles so overrides never end up in
    /// the file.
    pub fn load_settings_file(&self) -> Result<StudioSettings> {
        self.load_settings_from(None)
    }

    fn load_settings_from(&self, env: Option<config::Environment>) -> Result<StudioSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let mut builder = config::Config::builder().add_source(
            config::File::from(self.settings_path.as_std_path())
                .format(config::FileFormat::Yaml)
                .required(false),
        );
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        let settings: StudioSettings = builder
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Save settings to the YAML file.
    pub fn save_settings(&self, settings: &StudioSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Record `project_path` as most recently used and persist the settings.
    ///
    /// Returns the settings as stored in the file, without environment
    /// overrides.
    pub fn record_recent_project(&self, project_path: &Utf8Path) -> Result<StudioSettings> {
        let mut settings = self.load_settings_file()?;
        settings.record_recent_project(project_path.as_str());
        self.save_settings(&settings)?;
        Ok(settings)
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
