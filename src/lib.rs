//! Convert scheduling trace logs into Chrome Trace Format.
//!
//! The library parses the whitespace-separated records written by the
//! scheduler tracer and emits a single JSON document that a trace viewer
//! (chrome://tracing, <https://ui.perfetto.dev>) can show grouped either by
//! task or by CPU core.
//!
//! ```ignore
//! use schedtrace::trace::{self, ParseOptions};
//!
//! let options = ParseOptions { include_wakeup: true, ..Default::default() };
//! let events = trace::parse_lines(&log_output, &options);
//! let json = trace::to_chrome_trace(&events)?;
//! ```

pub mod config;
pub mod error;
pub mod styling;
pub mod trace;

pub use error::TraceError;
