// src/bin/hat.rs

//! Driver program _hat_ (HA timeline) drives the [_hatlib_].
//!
//! Processes user-passed command-line arguments, then:
//!
//! 1. validates the input selection and the time window, before any file
//!    is read
//! 2. resolves plain log files and support bundles to log sources, one per
//!    log file per node
//! 3. classifies each source's lines into an event stream, one stream per
//!    source, optionally one thread per source
//! 4. merges all event streams into one timeline and filters it to the time
//!    window
//! 5. writes the timeline to the output file, replacing it atomically
//!
//! Any fatal error is printed to stderr and no output file is written.
//!
//! [_hatlib_]: hatlib

#![allow(non_camel_case_types)]

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use ::anyhow::Context;
use ::clap::Parser;
use ::const_format::concatcp;
use ::itertools::Itertools;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use ::hatlib::common::{Count, FPath};
use ::hatlib::data::datetime::{year_now, Year};
use ::hatlib::data::event::Events;
use ::hatlib::data::rules::PatternTable;
use ::hatlib::debug::printers::e_err;
use ::hatlib::printer::printers::{write_timeline_file, OUTPUT_FPATH_DEFAULT};
use ::hatlib::printer::summary::print_summary;
use ::hatlib::readers::filepreprocessor::{
    resolve_selection,
    InputSelection,
    LogSource,
    HB_REPORTS_MAX,
    PACEMAKER_LOGS_MAX,
    SOSREPORTS_MAX,
    SYSTEM_LOGS_MAX,
};
use ::hatlib::readers::summary::Summary;
use ::hatlib::readers::timefilter::TimeWindow;
use ::hatlib::readers::timelineprocessor::{process_sources, timeline, ProcessedStream};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
Each event is one line of the output file:

    YYYY-MM-DD HH:MM:SS NODE COMPONENT MESSAGE

Events are in chronological order. Events with the same datetime are in
node order, then in log file order.

Event categories:
    fencing, resource-action, failed-operation, corosync-communication,
    maintenance-mode-change, resource-agent-alert, high-load-or-critical,
    migration-threshold, location-constraint-change

Pass at most ",
    PACEMAKER_LOGS_MAX,
    " pacemaker logs, ",
    SYSTEM_LOGS_MAX,
    " system logs, ",
    HB_REPORTS_MAX,
    " hb_report, or ",
    SOSREPORTS_MAX,
    " sosreports.
Bundles may be .tar files compressed with bzip2, gzip, or xz.

BEGIN and END are formatted YYYY-MM-DD or YYYY-MM-DD-HH:MM. Both are
inclusive; an END date includes that whole day.
"
);

// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "hat",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(HA timeline)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Pacemaker log file of a node, e.g. "pacemaker.log".
    /// Pass once per node.
    #[clap(
        short = 'p',
        long = "pacemaker-log",
        verbatim_doc_comment,
        value_name = "FILE",
    )]
    pacemaker_logs: Vec<String>,

    /// System log file of a node, e.g. "messages".
    /// Pass once per node.
    #[clap(
        short = 's',
        long = "system-log",
        verbatim_doc_comment,
        value_name = "FILE",
    )]
    system_logs: Vec<String>,

    /// hb_report (crm_report) bundle of the cluster, e.g.
    /// "hb_report-Fri-26-Mar-2021.tar.bz2".
    #[clap(
        long = "hb-report",
        verbatim_doc_comment,
        value_name = "FILE",
    )]
    hb_reports: Vec<String>,

    /// sosreport bundle of a node, e.g. "sosreport-node1-2021-03-26.tar.xz".
    /// Pass once per node.
    #[clap(
        long = "sosreport",
        verbatim_doc_comment,
        value_name = "FILE",
    )]
    sosreports: Vec<String>,

    /// Write only events at or after BEGIN.
    /// For example, "2021-03-26" or "2021-03-26-03:10".
    #[clap(
        short = 'b',
        long,
        verbatim_doc_comment,
    )]
    begin: Option<String>,

    /// Write only events at or before END.
    /// For example, "2021-03-26" or "2021-03-26-03:15".
    #[clap(
        short = 'e',
        long,
        verbatim_doc_comment,
    )]
    end: Option<String>,

    /// Path of the output file. Replaced if it exists.
    #[clap(
        short = 'o',
        long,
        verbatim_doc_comment,
        default_value_t = String::from(OUTPUT_FPATH_DEFAULT),
    )]
    output: String,

    /// Year of syslog datetimes without a year, e.g. "Mar 26 03:10:38".
    /// Defaults to the current year.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = year_now(),
        value_parser = clap::value_parser!(i32).range(1970..=9999),
    )]
    year: Year,

    /// Process each log file on its own thread.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    threads: bool,

    /// Print a summary of files processed to stderr.
    #[clap(
        long,
        verbatim_doc_comment,
    )]
    summary: bool,

    /// Do not print progress messages to stderr.
    #[clap(
        short = 'q',
        long,
        verbatim_doc_comment,
    )]
    quiet: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// main
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn main() -> ExitCode {
    let start_time = Instant::now();
    defn!();
    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    let exitcode = match run(args, start_time) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

/// Print the distinct nodes of `sources`, in order.
fn print_nodes(sources: &[LogSource]) {
    for node in sources
        .iter()
        .map(|source| &source.node)
        .unique()
    {
        eprintln!("Found node {}", node);
    }
}

fn run(args: CLI_Args, start_time: Instant) -> anyhow::Result<()> {
    defn!();
    let verbose: bool = !args.quiet;

    // validate everything user-passed before reading any file
    let selection = InputSelection::new(
        args.pacemaker_logs,
        args.system_logs,
        args.hb_reports,
        args.sosreports,
    )?;
    let window: TimeWindow = TimeWindow::from_cli(args.begin.as_deref(), args.end.as_deref())?;
    defo!("window {}", window);
    let table: Arc<PatternTable> = Arc::new(PatternTable::new(args.year));

    let sources: Vec<LogSource> = resolve_selection(&selection).context("cannot read input")?;
    if verbose {
        print_nodes(&sources);
    }
    let streams: Vec<ProcessedStream> =
        process_sources(table, sources, args.threads, verbose).context("cannot read input")?;
    let (events, summaries): (Events, Vec<Summary>) = timeline(streams, &window);

    let output: FPath = args.output;
    let written: Count = write_timeline_file(&output, &events)
        .with_context(|| format!("cannot write output {:?}", output))?;
    if verbose {
        eprintln!("Output written to {} ({} events)", output, written);
    }
    if args.summary {
        print_summary(&summaries, &events, &window, &output, start_time.elapsed());
    }
    defx!();

    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
