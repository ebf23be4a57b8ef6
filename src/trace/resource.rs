//! Resource identifiers and swimlane assignment.
//!
//! The tracer names the CPU a task ran on as `<node>-C<core>`, e.g.
//! `node01-C2`. Only the first two hyphen-separated parts are looked at, and
//! the core part must start with a literal `C`. Anything else still yields a
//! node name but no core.

use super::chrome::View;

/// Label used when a resource carries no recognisable core.
pub const UNKNOWN_CORE: &str = "Unknown";

/// Swimlane key for the per-task view when an event has no resource.
pub const UNPLACED_TASKS: &str = "Tasks";

/// Placeholder for values an event or view does not carry.
pub const NOT_APPLICABLE: &str = "N/A";

/// A parsed `<node>-C<core>` resource identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    raw: String,
    node: String,
    core: Option<String>,
}

impl Resource {
    /// Parse a resource identifier. Returns `None` for an empty string.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        let mut parts = raw.split('-');
        let node = parts.next().unwrap_or_default().to_string();
        let core = parts
            .next()
            .and_then(|part| part.strip_prefix('C'))
            .map(str::to_string);

        Some(Self {
            raw: raw.to_string(),
            node,
            core,
        })
    }

    /// The identifier exactly as it appeared in the log.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Node name (text before the first hyphen).
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Core designator with the `C` stripped (e.g. `"2"` for `node01-C2`).
    pub fn core(&self) -> Option<&str> {
        self.core.as_deref()
    }

    /// `"<node> Core <core>"`, or `None` when no core could be extracted.
    pub fn core_label(&self) -> Option<String> {
        self.core
            .as_ref()
            .map(|core| format!("{} Core {}", self.node, core))
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Where a record lands in the viewer, plus the core label it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lanes {
    /// Process-level swimlane.
    pub pid: String,
    /// Thread-level row within `pid`.
    pub tid: String,
    /// Value recorded in `args.cpu_core`.
    pub cpu_core: String,
}

/// Resolve the core label for a resource, falling back to [`UNKNOWN_CORE`].
pub fn core_label(resource: Option<&Resource>) -> String {
    resource
        .and_then(Resource::core_label)
        .unwrap_or_else(|| UNKNOWN_CORE.to_string())
}

/// Assign swimlanes for one event in the given view.
///
/// The per-task view records `N/A` as the core even when one is known, so
/// CPU information only appears in the per-CPU view.
pub fn lanes(resource: Option<&Resource>, task: &str, view: View) -> Lanes {
    match view {
        View::PerTask => Lanes {
            pid: match resource {
                Some(resource) => format!("Tasks on {}", resource.node()),
                None => UNPLACED_TASKS.to_string(),
            },
            tid: task.to_string(),
            cpu_core: NOT_APPLICABLE.to_string(),
        },
        View::PerCpu => {
            let label = core_label(resource);
            Lanes {
                pid: label.clone(),
                tid: task.to_string(),
                cpu_core: label,
            }
        }
    }
}
