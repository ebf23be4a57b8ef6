//! Chrome Trace Format output for scheduler events.
//!
//! Converts events to Chrome Trace Event Format JSON, which can be
//! visualized in chrome://tracing or <https://ui.perfetto.dev>.
//!
//! Every event is emitted twice, once per [`View`]:
//!
//! - **Per task**: `pid` is `Tasks on <node>`, `tid` is the task name
//! - **Per CPU**: `pid` is `<node> Core <n>`, `tid` is the task name
//!
//! All per-task records come first, followed by all per-CPU records, each in
//! input order. The viewer then lets you collapse either set of swimlanes.
//!
//! # Format Reference
//!
//! - [Trace Event Format](https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU/)
//! - [Perfetto UI](https://ui.perfetto.dev)

use std::path::Path;

use serde::Serialize;

use super::SchedEvent;
use super::resource::{NOT_APPLICABLE, lanes};
use crate::error::TraceError;

/// Category shared by every record.
pub const CATEGORY: &str = "Task Scheduling";

/// Swimlane grouping applied to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum View {
    /// Group by node, one row per task
    PerTask,
    /// Group by CPU core, one row per task
    PerCpu,
}

impl View {
    /// Views in emission order.
    pub const ALL: [View; 2] = [View::PerTask, View::PerCpu];
}

/// A complete event (`ph: "X"`) in the Trace Event Format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    /// "Execution" or "Wakeup Latency"
    pub name: &'static str,
    pub cat: &'static str,
    /// Always "X"
    pub ph: &'static str,
    /// Start timestamp in microseconds
    pub ts: i64,
    /// Duration in microseconds
    pub dur: i64,
    /// Process-level swimlane label
    pub pid: String,
    /// Thread-level row label
    pub tid: String,
    /// Shown when the event is selected in the UI
    pub args: TraceEventArgs,
}

/// Custom arguments attached to trace events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEventArgs {
    pub task: String,
    /// Core label in the per-CPU view, "N/A" in the per-task view
    pub cpu_core: String,
    /// Raw resource identifier, or "N/A"
    pub resource: String,
    pub start_time: i64,
    pub end_time: i64,
    pub duration_us: i64,
    /// "execution" or "wakeup_latency"
    #[serde(rename = "type")]
    pub event_type: &'static str,
}

/// The top-level Chrome Trace Format structure.
#[derive(Debug, Serialize)]
pub struct ChromeTrace {
    #[serde(rename = "traceEvents")]
    pub trace_events: Vec<TraceEvent>,
    /// Timestamps in the logs are already microseconds
    #[serde(rename = "displayTimeUnit")]
    pub display_time_unit: &'static str,
}

impl ChromeTrace {
    /// Pretty-printed JSON (2-space indent).
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize and write in one go, replacing any existing file.
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, &json).map_err(|e| TraceError::WriteOutput {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        log::debug!("Wrote {} bytes to {}", json.len(), path.display());
        Ok(())
    }
}

/// Project one event into a record for `view`.
pub fn project(event: &SchedEvent, view: View) -> TraceEvent {
    let lanes = lanes(event.resource.as_ref(), &event.task, view);
    let duration = event.duration_us();

    TraceEvent {
        name: event.kind.label(),
        cat: CATEGORY,
        ph: "X", // Complete event (has duration)
        ts: event.start_us,
        dur: duration,
        pid: lanes.pid,
        tid: lanes.tid,
        args: TraceEventArgs {
            task: event.task.clone(),
            cpu_core: lanes.cpu_core,
            resource: event
                .resource
                .as_ref()
                .map_or_else(|| NOT_APPLICABLE.to_string(), ToString::to_string),
            start_time: event.start_us,
            end_time: event.stop_us,
            duration_us: duration,
            event_type: event.kind.type_tag(),
        },
    }
}

/// Build the trace document: every view over the full event list, in order.
pub fn build_trace(events: &[SchedEvent]) -> ChromeTrace {
    let trace_events = View::ALL
        .iter()
        .flat_map(|&view| events.iter().map(move |event| project(event, view)))
        .collect();

    ChromeTrace {
        trace_events,
        display_time_unit: "us",
    }
}

/// Convert events to Chrome Trace Format JSON.
pub fn to_chrome_trace(events: &[SchedEvent]) -> anyhow::Result<String> {
    build_trace(events).to_json()
}

/// Write the trace document for `events` to `path`.
///
/// Returns the number of trace records written.
pub fn write_chrome_trace(events: &[SchedEvent], path: &Path) -> anyhow::Result<usize> {
    let trace = build_trace(events);
    log::debug!(
        "Emitting {} records for {} events across views [{}, {}]",
        trace.trace_events.len(),
        events.len(),
        View::PerTask,
        View::PerCpu
    );
    trace.write(path)?;
    Ok(trace.trace_events.len())
}
