use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How log output is produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// Use debug level instead of info
    pub debug_mode: bool,
    /// Mirror log lines to the console with ANSI colors
    pub console_output: bool,
    /// Write the log file as JSON lines
    pub json_file: bool,
}

/// Setup logging with a daily rotating file appender.
///
/// # Arguments
/// * `log_dir` - Directory for log files (e.g., "logs"), created if missing
/// * `log_prefix` - Prefix for log files (e.g., "tailwind-studio")
/// * `debug_mode` - If true, use debug level; otherwise use info level
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(
    log_dir: &str,
    log_prefix: &str,
    debug_mode: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    setup_logging_with_options(
        log_dir,
        log_prefix,
        LogOptions {
            debug_mode,
            ..LogOptions::default()
        },
    )
}

/// Setup logging with optional console and JSON output.
///
/// Fails if a global subscriber is already installed.
pub fn setup_logging_with_options(
    log_dir: &str,
    log_prefix: &str,
    options: LogOptions,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    ensure_log_dir(log_dir)?;

    let file_appender = rolling::daily(log_dir, log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = if options.debug_mode {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Option<Layer> is itself a layer, so exactly one file format is active
    let json_layer = options.json_file.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking.clone())
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    let text_layer = (!options.json_file).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking.clone())
            .with_ansi(false) // No ANSI codes in log files
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    let console_layer = options.console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}, json={}",
        log_dir,
        log_prefix,
        options.debug_mode,
        options.console_output,
        options.json_file
    );

    Ok(guard)
}

fn ensure_log_dir(log_dir: &str) -> Result<()> {
    let log_path = Utf8Path::new(log_dir);
    if !log_path.exists() {
        fs::create_dir_all(log_path)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}
