//! Integration tests for converting trace logs.

use std::io::Write;
use std::process::Stdio;

use rstest::rstest;

use crate::common::{TestDir, convert, dir, trace_events};

const SCENARIO: &str = "taskA X X node01-C2 X 100 150 400 X\n";

/// The reference record expands into four trace events.
#[rstest]
fn test_single_record_four_events(dir: TestDir) {
    dir.write_log("sched.log", SCENARIO);

    let output = convert(&dir, &["sched.log"], "trace.json");
    assert!(output.status.success(), "schedtrace should succeed");

    let trace = dir.read_trace("trace.json");
    assert_eq!(trace["displayTimeUnit"], "us");

    let events = trace_events(&trace);
    assert_eq!(events.len(), 4);

    // Per-task execution
    assert_eq!(events[0]["name"], "Execution");
    assert_eq!(events[0]["pid"], "Tasks on node01");
    assert_eq!(events[0]["tid"], "taskA");
    assert_eq!(events[0]["ts"], 150);
    assert_eq!(events[0]["dur"], 250);
    assert_eq!(events[0]["args"]["cpu_core"], "N/A");

    // Per-task wakeup
    assert_eq!(events[1]["name"], "Wakeup Latency");
    assert_eq!(events[1]["pid"], "Tasks on node01");
    assert_eq!(events[1]["ts"], 100);
    assert_eq!(events[1]["dur"], 50);
    assert_eq!(events[1]["args"]["type"], "wakeup_latency");

    // Per-CPU execution
    assert_eq!(events[2]["name"], "Execution");
    assert_eq!(events[2]["pid"], "node01 Core 2");
    assert_eq!(events[2]["tid"], "taskA");
    assert_eq!(events[2]["args"]["cpu_core"], "node01 Core 2");

    // Per-CPU wakeup
    assert_eq!(events[3]["name"], "Wakeup Latency");
    assert_eq!(events[3]["pid"], "node01 Core 2");

    for event in events {
        assert_eq!(event["ph"], "X");
        assert_eq!(event["cat"], "Task Scheduling");
        assert_eq!(event["args"]["task"], "taskA");
        assert_eq!(event["args"]["resource"], "node01-C2");
    }
}

#[rstest]
fn test_progress_output(dir: TestDir) {
    dir.write_log("a.log", SCENARIO);
    dir.write_log("b.log", SCENARIO);

    let output = convert(&dir, &["a.log", "b.log"], "trace.json");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4, "unexpected stdout: {stdout}");
    assert!(lines[0].contains("Processing input file: a.log"));
    assert!(lines[1].contains("Processing input file: b.log"));
    assert!(lines[2].contains("Generating Chrome JSON trace file: trace.json"));
    assert!(lines[3].contains("Wrote 8 trace events"));
}

/// Malformed and short lines are dropped without affecting the run.
#[rstest]
fn test_noisy_log(dir: TestDir) {
    dir.write_log(
        "noisy.log",
        "\
taskA X X node01-C2 X
garbage
taskB X X node01-C1 X 10 20 30
taskC X X node01-C1 X ten 20 30

taskD X X node02 X 50 50 70
",
    );

    let output = convert(&dir, &["noisy.log"], "trace.json");
    assert!(output.status.success());
    assert!(output.stderr.is_empty(), "No warnings for dropped lines");

    let trace = dir.read_trace("trace.json");
    let events = trace_events(&trace);

    // taskB (execution + wakeup) and taskD (execution only), in both views
    assert_eq!(events.len(), 6);
    let per_cpu_pids: Vec<_> = events[3..].iter().map(|e| e["pid"].clone()).collect();
    assert_eq!(per_cpu_pids, ["node01 Core 1", "node01 Core 1", "Unknown"]);
    assert_eq!(events[2]["pid"], "Tasks on node02");
}

#[rstest]
fn test_multiple_inputs_keep_argument_order(dir: TestDir) {
    dir.write_log("first.log", "t1 X X n1-C0 X 5 5 10\n");
    dir.write_log("second.log", "t2 X X n2-C1 X 1 1 3\n");

    let output = convert(&dir, &["second.log", "first.log"], "trace.json");
    assert!(output.status.success());

    let trace = dir.read_trace("trace.json");
    let tids: Vec<_> = trace_events(&trace)
        .iter()
        .map(|e| e["tid"].as_str().unwrap().to_string())
        .collect();
    // No sorting by timestamp: argument order, then view order
    assert_eq!(tids, ["t2", "t1", "t2", "t1"]);
}

#[rstest]
fn test_empty_log_produces_empty_trace(dir: TestDir) {
    dir.write_log("empty.log", "");

    let output = convert(&dir, &["empty.log"], "trace.json");
    assert!(output.status.success());

    let trace = dir.read_trace("trace.json");
    assert!(trace_events(&trace).is_empty());
    assert_eq!(trace["displayTimeUnit"], "us");
}

#[rstest]
fn test_missing_input_fails(dir: TestDir) {
    dir.write_log("present.log", SCENARIO);

    let output = convert(&dir, &["present.log", "absent.log"], "trace.json");
    assert!(!output.status.success(), "Should fail with missing input");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Cannot read input file"),
        "Should show error message: {stderr}"
    );
    assert!(stderr.contains("absent.log"));
    assert!(!dir.path("trace.json").exists(), "No partial output");
}

#[rstest]
fn test_unwritable_output_fails(dir: TestDir) {
    dir.write_log("sched.log", SCENARIO);

    let output = convert(&dir, &["sched.log"], "missing-dir/trace.json");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot write trace file"), "{stderr}");
}

#[rstest]
fn test_output_overwritten_and_idempotent(dir: TestDir) {
    dir.write_log("sched.log", SCENARIO);
    std::fs::write(dir.path("trace.json"), "old").unwrap();

    assert!(convert(&dir, &["sched.log"], "trace.json").status.success());
    let first = std::fs::read(dir.path("trace.json")).unwrap();

    assert!(convert(&dir, &["sched.log"], "trace.json").status.success());
    let second = std::fs::read(dir.path("trace.json")).unwrap();

    assert_ne!(first, b"old");
    assert_eq!(first, second, "Identical input should give identical bytes");
}

#[rstest]
fn test_pretty_printed_output(dir: TestDir) {
    dir.write_log("sched.log", SCENARIO);
    assert!(convert(&dir, &["sched.log"], "trace.json").status.success());

    let content = std::fs::read_to_string(dir.path("trace.json")).unwrap();
    assert!(content.starts_with("{\n  \"traceEvents\": [\n    {\n"));
    assert!(content.ends_with("\"displayTimeUnit\": \"us\"\n}"));
}

#[rstest]
fn test_read_from_stdin(dir: TestDir) {
    let mut child = dir
        .command()
        .args(["-i", "-", "-o", "trace.json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn schedtrace");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(SCENARIO.as_bytes())
        .expect("Failed to write to stdin");

    let output = child.wait_with_output().expect("Failed to read output");
    assert!(output.status.success());

    // Piped stdin is read without the interactive prompt
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("Reading from stdin"), "{stderr}");

    let trace = dir.read_trace("trace.json");
    assert_eq!(trace_events(&trace).len(), 4);
}

#[rstest]
fn test_verbose_logs_to_stderr(dir: TestDir) {
    dir.write_log("sched.log", SCENARIO);

    let output = dir
        .command()
        .args(["-v", "-i", "sched.log", "-o", "trace.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[debug]"), "{stderr}");
    assert!(stderr.contains("Parsed 2 events from sched.log"), "{stderr}");
}

#[rstest]
#[case::no_args(&[])]
#[case::no_output(&["-i", "sched.log"])]
#[case::no_input(&["-o", "trace.json"])]
fn test_usage_errors(dir: TestDir, #[case] args: &[&str]) {
    let output = dir.command().args(args).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}
