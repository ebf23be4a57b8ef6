//! Scheduler trace parsing and Chrome Trace Format export.
//!
//! # Features
//!
//! - **Record parsing**: Turn tracer log lines into execution and wakeup-latency events
//! - **Resource parsing**: Extract node and core from `<node>-C<core>` identifiers
//! - **Chrome Trace Format**: Export both a per-task and a per-CPU view for
//!   chrome://tracing or Perfetto
//!
//! # Usage
//!
//! ```bash
//! # Convert one or more logs
//! schedtrace -i node01.log node02.log -o trace.json
//!
//! # Visualize: open trace.json in chrome://tracing or https://ui.perfetto.dev
//!
//! # Analyze with SQL (requires: curl -LO https://get.perfetto.dev/trace_processor)
//! trace_processor trace.json -Q "SELECT name, COUNT(*), SUM(dur) FROM slice GROUP BY name"
//! ```

pub mod chrome;
pub mod parse;
pub mod resource;

// Re-export main types for convenience
pub use chrome::{ChromeTrace, TraceEvent, View, build_trace, to_chrome_trace, write_chrome_trace};
pub use parse::{
    EventKind, ParseOptions, SchedEvent, SchedRecord, parse_line, parse_lines, read_all_events,
    read_events,
};
pub use resource::Resource;
