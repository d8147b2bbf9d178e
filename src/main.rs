//! Tailwind Studio - headless shell for the project store.
//!
//! # Overview
//!
//! This binary owns a single [`ProjectStore`] and drives it from the command
//! line, playing the role the desktop editor plays interactively:
//! - Logging infrastructure (rotating log file, console mirror in debug mode)
//! - Settings loading ([`ConfigManager`])
//! - Project file persistence (save, open, export)
//!
//! # Commands
//!
//! - `new <NAME>`: create a project, optionally seeded with catalog components
//! - `info <FILE>`: print a project's metadata and element tree
//! - `theme <FILE> <CONFIG>`: attach a Tailwind config to a project
//! - `classes <CONFIG>`: list utility classes a Tailwind config defines
//! - `catalog`: list insertable components

use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use std::fs;
use tailwind_studio::logging::{self, LogOptions};
use tailwind_studio::services::{self, persistence};
use tailwind_studio::{
    APP_NAME, ConfigManager, ElementNode, ProjectStore, ProjectUpdate, VERSION,
    component_definitions,
};

#[derive(Parser)]
#[command(name = "tailwind-studio")]
#[command(about = "Create and inspect Tailwind Studio page-builder projects", version)]
struct Cli {
    /// Directory holding `Studio Settings.yaml`
    #[arg(long, value_name = "DIR", default_value = "Tailwind Studio Data")]
    config_dir: Utf8PathBuf,

    /// Log at debug level and mirror logs to the console
    #[arg(short, long)]
    debug: bool,

    /// Write the log file as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new project file
    New {
        name: String,

        #[arg(short = 'D', long)]
        description: Option<String>,

        /// Output path (defaults to a slug of the name in the projects directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<Utf8PathBuf>,

        /// Component types to append to the root, in order (e.g. heading,button)
        #[arg(long = "with", value_delimiter = ',', value_name = "TYPES")]
        components: Vec<String>,
    },

    /// Print a project's metadata and element tree
    Info { file: Utf8PathBuf },

    /// Attach a Tailwind config file to a project and save it
    Theme {
        file: Utf8PathBuf,
        config: Utf8PathBuf,
    },

    /// List the custom utility classes defined by a Tailwind config file
    Classes { config: Utf8PathBuf },

    /// List the components that can be inserted into a page
    Catalog,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let settings = config_manager.load_settings()?;

    let _guard = logging::setup_logging_with_options(
        &settings.log_dir,
        "tailwind-studio",
        LogOptions {
            debug_mode: cli.debug || settings.debug_mode,
            console_output: cli.debug,
            json_file: cli.json_logs,
        },
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    // The shell owns the store for the lifetime of the process
    let store = ProjectStore::new();
    store.load_from_settings(&settings);

    match cli.command {
        Command::New {
            name,
            description,
            output,
            components,
        } => {
            let description =
                description.unwrap_or_else(|| settings.default_project_description.clone());
            let project = store.create_new_project(&name, &description);

            for element_type in &components {
                let Some(element) = store.instantiate_component(element_type) else {
                    bail!("Unknown component type: {}", element_type);
                };
                store.add_element(element, None);
            }

            let path = output.unwrap_or_else(|| {
                Utf8PathBuf::from(&settings.projects_dir).join(persistence::default_file_name(&project))
            });
            let saved = services::save_project_file(&store, &path)?;
            config_manager.record_recent_project(&path)?;

            println!(
                "Created {} with {} elements at {}",
                saved.name,
                saved.element_count(),
                path
            );
        }

        Command::Info { file } => {
            let project = services::open_project_file(&store, &file)?;
            config_manager.record_recent_project(&file)?;

            println!("{} ({})", project.name, project.id);
            if !project.description.is_empty() {
                println!("{}", project.description);
            }
            println!("Created: {}", project.created_at.to_rfc3339());
            println!("Updated: {}", project.updated_at.to_rfc3339());
            println!();
            print_tree(&project.root_element, 0);

            let classes = store.custom_classes();
            if !classes.is_empty() {
                println!();
                println!("Custom classes: {}", classes.join(" "));
            }
        }

        Command::Theme { file, config } => {
            let config_text = fs::read_to_string(&config)
                .with_context(|| format!("Failed to read Tailwind config: {}", config))?;
            if services::parse_tailwind_config(&config_text).is_none() {
                bail!("{} is not a Tailwind config this importer understands", config);
            }

            services::open_project_file(&store, &file)?;
            store.try_update_project(ProjectUpdate::tailwind_config(Some(config_text)))?;
            services::save_project_file(&store, &file)?;

            println!("Attached {} to {}", config, file);
            for class in store.custom_classes() {
                println!("  {}", class);
            }
        }

        Command::Classes { config } => {
            let config_text = fs::read_to_string(&config)
                .with_context(|| format!("Failed to read Tailwind config: {}", config))?;
            let Some(parsed) = services::parse_tailwind_config(&config_text) else {
                bail!("{} is not a Tailwind config this importer understands", config);
            };

            for class in services::extract_custom_classes(&parsed) {
                println!("{}", class);
            }
        }

        Command::Catalog => {
            for def in component_definitions() {
                println!(
                    "{} {:<10} {:<12} {}{}",
                    def.icon,
                    def.element_type,
                    def.label,
                    def.default_classes,
                    if def.can_have_children { "  [container]" } else { "" }
                );
            }
        }
    }

    tracing::info!("Shutdown complete: {}", store.snapshot().summary());
    Ok(())
}

fn print_tree(node: &ElementNode, depth: usize) {
    let text = node
        .properties
        .get("text")
        .map(|t| format!(" \"{}\"", t))
        .unwrap_or_default();
    println!(
        "{}{} #{} [{}]{}",
        "  ".repeat(depth),
        node.element_type,
        node.id,
        node.classes,
        text
    );
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}
