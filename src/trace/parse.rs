//! Parse scheduler trace records into events.
//!
//! Each line is one whitespace-separated record. With the default column
//! layout the tracer writes:
//! ```text
//! taskname event ignored resource priority wakeuptime starttime stoptime ...
//! sensor_fusion run x node01-C2 90 1000 1150 1400 ok
//! ```
//!
//! Columns 0 (task), 3 (resource), 5 (wakeup), 6 (start) and 7 (stop) are
//! consumed; timestamps are integer microseconds. Lines that are too short,
//! carry a non-integer timestamp, or whose intervals do not fit in an `i64`
//! are skipped without comment, so noisy logs still convert. Both `\n` and a
//! lone `\r` end a line.

use std::borrow::Cow;
use std::io::{IsTerminal, Read};
use std::path::Path;

use color_print::cformat;
use strum::IntoStaticStr;

use super::resource::Resource;
use crate::config::ColumnLayout;
use crate::error::TraceError;
use crate::styling::{HINT_EMOJI, eprintln};

/// Suffix that marks a wakeup-latency event in its conventional name.
pub const WAKEUP_SUFFIX: &str = "_wakeup";

/// What an event interval measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    /// The task was running on its resource
    Execution,
    /// The task was runnable but had not started yet
    WakeupLatency,
}

impl EventKind {
    /// Event name shown in the viewer.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Execution => "Execution",
            EventKind::WakeupLatency => "Wakeup Latency",
        }
    }

    /// Machine-readable tag: "execution" or "wakeup_latency".
    pub fn type_tag(self) -> &'static str {
        self.into()
    }
}

/// One raw record from the tracer.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedRecord {
    pub task: String,
    pub resource: Option<Resource>,
    pub wakeup_us: i64,
    pub start_us: i64,
    pub stop_us: i64,
}

/// A timed interval for one task, ready for emission.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedEvent {
    pub kind: EventKind,
    /// Task name, never carrying the wakeup suffix
    pub task: String,
    pub resource: Option<Resource>,
    pub start_us: i64,
    pub stop_us: i64,
}

impl SchedEvent {
    pub fn execution(
        start_us: i64,
        stop_us: i64,
        task: impl Into<String>,
        resource: Option<Resource>,
    ) -> Self {
        Self {
            kind: EventKind::Execution,
            task: task.into(),
            resource,
            start_us,
            stop_us,
        }
    }

    pub fn wakeup(
        start_us: i64,
        stop_us: i64,
        task: impl Into<String>,
        resource: Option<Resource>,
    ) -> Self {
        Self {
            kind: EventKind::WakeupLatency,
            ..Self::execution(start_us, stop_us, task, resource)
        }
    }

    /// Conventional name: `<task>` or `<task>_wakeup`.
    pub fn name(&self) -> Cow<'_, str> {
        match self.kind {
            EventKind::Execution => Cow::Borrowed(&self.task),
            EventKind::WakeupLatency => Cow::Owned(format!("{}{WAKEUP_SUFFIX}", self.task)),
        }
    }

    /// `stop - start`. Negative when the log has them inverted.
    ///
    /// Saturates at the `i64` bounds; [`parse_line`] never yields such a pair.
    pub fn duration_us(&self) -> i64 {
        self.stop_us.saturating_sub(self.start_us)
    }
}

impl SchedRecord {
    /// Expand into the execution event and, when enabled and the task woke
    /// strictly before it started, a wakeup-latency event right after it.
    pub fn into_events(self, include_wakeup: bool) -> impl Iterator<Item = SchedEvent> {
        let wakeup = (include_wakeup && self.wakeup_us < self.start_us).then(|| {
            SchedEvent::wakeup(
                self.wakeup_us,
                self.start_us,
                self.task.clone(),
                self.resource.clone(),
            )
        });
        let execution =
            SchedEvent::execution(self.start_us, self.stop_us, self.task, self.resource);

        std::iter::once(execution).chain(wakeup)
    }
}

/// How to read records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub columns: ColumnLayout,
    /// Synthesize wakeup-latency events
    pub include_wakeup: bool,
}

/// Parse a single record.
///
/// Returns `None` if the line has too few fields, a timestamp column is not
/// an integer, or an interval it describes overflows `i64`.
pub fn parse_line(line: &str, columns: &ColumnLayout) -> Option<SchedRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < columns.min_fields() {
        return None;
    }

    let field = |idx: usize| fields.get(idx).copied();

    let wakeup_us: i64 = field(columns.wakeup)?.parse().ok()?;
    let start_us: i64 = field(columns.start)?.parse().ok()?;
    let stop_us: i64 = field(columns.stop)?.parse().ok()?;

    stop_us.checked_sub(start_us)?;
    if wakeup_us < start_us {
        start_us.checked_sub(wakeup_us)?;
    }

    Some(SchedRecord {
        task: field(columns.task)?.to_string(),
        resource: Resource::parse(field(columns.resource)?),
        wakeup_us,
        start_us,
        stop_us,
    })
}

/// Parse multiple lines, keeping line order and skipping malformed records.
pub fn parse_lines(input: &str, options: &ParseOptions) -> Vec<SchedEvent> {
    input
        .split(['\n', '\r'])
        .filter_map(|line| parse_line(line, &options.columns))
        .flat_map(|record| record.into_events(options.include_wakeup))
        .collect()
}

/// Shown before blocking on an interactive stdin.
pub fn stdin_prompt() -> String {
    cformat!(
        "Reading from stdin... (pipe log data or use Ctrl+D to end)\n{HINT_EMOJI} <dim>ssh node01 cat /var/log/sched.log | schedtrace -i - -o trace.json</>"
    )
}

/// Read a log from `path`, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    let read = if path.as_os_str() == "-" {
        if std::io::stdin().is_terminal() {
            eprintln!("{}", stdin_prompt());
        }

        let mut content = String::new();
        std::io::stdin()
            .lock()
            .read_to_string(&mut content)
            .map(|_| content)
    } else {
        std::fs::read_to_string(path)
    };

    read.map_err(|e| {
        TraceError::ReadInput {
            path: path.to_path_buf(),
            error: e.to_string(),
        }
        .into()
    })
}

/// Read and parse one log file.
pub fn read_events(path: &Path, options: &ParseOptions) -> anyhow::Result<Vec<SchedEvent>> {
    let content = read_input(path)?;
    let events = parse_lines(&content, options);
    log::debug!("Parsed {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Read every log in order and concatenate their events.
///
/// Stops at the first file that cannot be read.
pub fn read_all_events<P: AsRef<Path>>(
    paths: &[P],
    options: &ParseOptions,
) -> anyhow::Result<Vec<SchedEvent>> {
    let mut events = Vec::new();
    for path in paths {
        events.extend(read_events(path.as_ref(), options)?);
    }
    Ok(events)
}
