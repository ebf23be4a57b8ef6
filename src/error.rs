//! Error types for schedtrace.
//!
//! **`TraceError`** is a typed enum for the failures that abort a run. Use
//! `.into()` to convert to `anyhow::Error` while preserving the type for
//! pattern matching. Display produces styled output for users.
//!
//! Malformed log lines are never errors: the parser skips them.

use std::path::PathBuf;

use color_print::cwrite;

use crate::styling::{ERROR_EMOJI, HINT_EMOJI};

/// Fatal errors for a conversion run.
///
/// ```ignore
/// return Err(TraceError::ReadInput { path, error: e.to_string() }.into());
///
/// if let Some(TraceError::ReadInput { path, .. }) = err.downcast_ref() {
///     println!("could not read {}", path.display());
/// }
/// ```
#[derive(Debug, Clone)]
pub enum TraceError {
    /// An input log could not be opened or read.
    ReadInput { path: PathBuf, error: String },
    /// The trace document could not be written.
    WriteOutput { path: PathBuf, error: String },
    /// The configuration layer rejected a file or value.
    InvalidConfig { message: String },
}

impl std::error::Error for TraceError {}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceError::ReadInput { path, error } => {
                let path = path.display();
                cwrite!(
                    f,
                    "{ERROR_EMOJI} <red>Cannot read input file <bold>{path}</>: {error}</>"
                )
            }

            TraceError::WriteOutput { path, error } => {
                let path = path.display();
                cwrite!(
                    f,
                    "{ERROR_EMOJI} <red>Cannot write trace file <bold>{path}</>: {error}</>\n\n{HINT_EMOJI} <dim>Check that the parent directory exists and is writable</>"
                )
            }

            TraceError::InvalidConfig { message } => {
                cwrite!(
                    f,
                    "{ERROR_EMOJI} <red>Invalid configuration: {message}</>\n\n{HINT_EMOJI} <dim>Config is read from <bright-black>--config</><dim>, </><bright-black>SCHEDTRACE_CONFIG_PATH</><dim>, or the platform config directory</>"
                )
            }
        }
    }
}
