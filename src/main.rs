//! Convert scheduler trace logs to Chrome Trace Format.
//!
//! # Usage
//!
//! ```bash
//! # Convert logs from every node into one trace
//! schedtrace -i node01.log node02.log -o trace.json
//!
//! # Read from stdin
//! ssh node01 cat /var/log/sched.log | schedtrace -i - -o trace.json
//!
//! # Visualize: open trace.json in chrome://tracing or https://ui.perfetto.dev
//! ```

use std::path::PathBuf;
use std::process;

use clap::Parser;
use color_print::cformat;
use schedtrace::TraceError;
use schedtrace::config::SchedTraceConfig;
use schedtrace::styling::{PROGRESS_EMOJI, SUCCESS_EMOJI, eprintln, println};
use schedtrace::trace::{self, ParseOptions};

/// Convert scheduling log data to Chrome JSON trace format
#[derive(Parser)]
#[command(name = "schedtrace")]
#[command(about = "Convert scheduling log data to Chrome JSON trace format")]
#[command(version)]
#[command(after_long_help = r#"EXAMPLES:
  # Convert logs from two nodes
  schedtrace -i node01.log node02.log -o trace.json

  # Then either:
  #   - Open trace.json in chrome://tracing or https://ui.perfetto.dev
  #   - Query with: trace_processor trace.json -Q 'SELECT * FROM slice LIMIT 10'

  # Longest wakeup latencies
  trace_processor trace.json -Q "SELECT name, dur FROM slice WHERE name = 'Wakeup Latency' ORDER BY dur DESC LIMIT 10"

CONFIGURATION:
  Column positions are read from --config, SCHEDTRACE_CONFIG_PATH, or
  ~/.config/schedtrace/config.toml, and may be overridden with
  SCHEDTRACE_COLUMNS_<TASK|RESOURCE|WAKEUP|START|STOP>.
"#)]
struct Cli {
    /// Input log files (`-` reads from stdin)
    #[arg(short, long, value_name = "FILE", num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// Output JSON trace file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose output (show debug logs)
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --verbose flag or RUST_LOG env var
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "off" }),
    )
    .format(|buf, record| {
        use anstyle::Style;
        use std::io::Write;

        let dim = Style::new().dimmed();
        let level = record.level().as_str().to_lowercase();
        writeln!(buf, "{dim}[{level}]{dim:#} {}", record.args())
    })
    .init();

    if let Err(e) = run(cli) {
        // Error messages are already formatted with emoji and colors
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SchedTraceConfig::load(cli.config.as_deref()).map_err(|e| {
        TraceError::InvalidConfig {
            message: e.to_string(),
        }
    })?;
    log::debug!("Column layout: {:?}", config.columns);

    let options = ParseOptions {
        columns: config.columns,
        include_wakeup: true,
    };

    let mut events = Vec::new();
    for input in &cli.input {
        let input_display = input.display();
        println!(
            "{}",
            cformat!("{PROGRESS_EMOJI} Processing input file: <bold>{input_display}</>")
        );
        events.extend(trace::read_events(input, &options)?);
    }
    log::debug!("Collected {} events from {} inputs", events.len(), cli.input.len());

    let output_display = cli.output.display();
    println!(
        "{}",
        cformat!("{PROGRESS_EMOJI} Generating Chrome JSON trace file: <bold>{output_display}</>")
    );
    let written = trace::write_chrome_trace(&events, &cli.output)?;

    println!(
        "{}",
        cformat!("{SUCCESS_EMOJI} <green>Wrote <bold>{written}</> trace events to <bold>{output_display}</></>")
    );

    Ok(())
}
