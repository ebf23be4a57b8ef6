use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};

/// Configuration for reading scheduler trace logs.
///
/// The tracer writes one whitespace-separated record per line. `columns`
/// names the zero-based field index of each value the converter consumes;
/// every other field is ignored.
///
/// # Example
///
/// ```toml
/// [columns]
/// task = 0      # task name
/// resource = 3  # "<node>-C<core>"
/// wakeup = 5    # wakeup time (us)
/// start = 6     # start time (us)
/// stop = 7      # stop time (us)
/// ```
///
/// Config file location:
/// - Linux: `$XDG_CONFIG_HOME/schedtrace/config.toml` or `~/.config/schedtrace/config.toml`
/// - macOS: `$XDG_CONFIG_HOME/schedtrace/config.toml` or `~/.config/schedtrace/config.toml`
/// - Windows: `%APPDATA%\schedtrace\config.toml`
///
/// Environment variables: `SCHEDTRACE_COLUMNS_TASK`, `SCHEDTRACE_COLUMNS_START`, ...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedTraceConfig {
    #[serde(default)]
    pub columns: ColumnLayout,
}

/// Field positions within a trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub task: usize,
    pub resource: usize,
    pub wakeup: usize,
    pub start: usize,
    pub stop: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            task: 0,
            resource: 3,
            wakeup: 5,
            start: 6,
            stop: 7,
        }
    }
}

impl ColumnLayout {
    fn indices(&self) -> [(&'static str, usize); 5] {
        [
            ("task", self.task),
            ("resource", self.resource),
            ("wakeup", self.wakeup),
            ("start", self.start),
            ("stop", self.stop),
        ]
    }

    /// Fewest fields a line needs to carry every consumed column.
    pub fn min_fields(&self) -> usize {
        self.indices()
            .iter()
            .map(|(_, idx)| idx + 1)
            .max()
            .unwrap_or(0)
    }

    /// Reject layouts where two values would be read from the same field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let indices = self.indices();
        for (i, (name, idx)) in indices.iter().enumerate() {
            if let Some((other, _)) = indices[i + 1..].iter().find(|(_, o)| o == idx) {
                return Err(ConfigError::Message(format!(
                    "columns.{name} and columns.{other} both read field {idx}"
                )));
            }
        }
        Ok(())
    }
}

impl SchedTraceConfig {
    /// Load configuration from a config file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. Config file (`explicit_path`, else `SCHEDTRACE_CONFIG_PATH`, else the platform path)
    /// 3. Environment variables (SCHEDTRACE_*)
    ///
    /// A config file that does not exist is skipped.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = ColumnLayout::default();

        let mut builder = Config::builder()
            .set_default("columns.task", defaults.task as i64)?
            .set_default("columns.resource", defaults.resource as i64)?
            .set_default("columns.wakeup", defaults.wakeup as i64)?
            .set_default("columns.start", defaults.start as i64)?
            .set_default("columns.stop", defaults.stop as i64)?;

        match config_path(explicit_path) {
            Some(path) if path.exists() => {
                log::debug!("Loading config from {}", path.display());
                builder = builder.add_source(File::from(path));
            }
            Some(path) => log::debug!("No config file at {}", path.display()),
            None => log::debug!("No config directory available"),
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SCHEDTRACE")
                .separator("_")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.columns.validate()?;

        Ok(config)
    }
}

fn config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("SCHEDTRACE_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    // choose_base_strategy uses:
    // - XDG on Linux (respects XDG_CONFIG_HOME, falls back to ~/.config)
    // - XDG on macOS (~/.config instead of ~/Library/Application Support)
    // - Windows conventions on Windows (%APPDATA%)
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("schedtrace").join("config.toml"))
}
