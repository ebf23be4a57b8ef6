//! Terminal output helpers.
//!
//! - **stdout**: progress and completion messages
//! - **stderr**: errors and log output
//!
//! `anstream` strips styling automatically when the stream is not a terminal
//! or `NO_COLOR` is set, so callers can always emit styled text.

// Re-exports from anstream (auto-detecting output)
pub use anstream::{eprintln, println};

/// Error marker
pub const ERROR_EMOJI: &str = "❌";

/// Hint marker
pub const HINT_EMOJI: &str = "💡";

/// Marker for an in-progress step
pub const PROGRESS_EMOJI: &str = "🔄";

/// Marker for a completed run
pub const SUCCESS_EMOJI: &str = "✅";
