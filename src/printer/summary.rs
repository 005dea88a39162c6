// src/printer/summary.rs

//! CLI option `--summary` printing functions.
//! Only used by `hat.rs`.

use std::collections::BTreeSet;
use std::time::Duration;

use ::itertools::Itertools;
use ::si_trace_print::defñ;

use crate::common::{Count, FPath};
use crate::data::datetime::DATETIME_FORMAT_OUT;
use crate::data::event::{Category, Event};
use crate::readers::summary::Summary;
use crate::readers::timefilter::TimeWindow;

/// For printing various levels of indentation.
const OPT_SUMMARY_PRINT_INDENT1: &str = "  ";
const OPT_SUMMARY_PRINT_INDENT2: &str = "      ";

/// Distinct values of `events`, sorted, e.g. the nodes of all events.
pub fn distinct<'a, F>(events: &'a [Event], field: F) -> BTreeSet<&'a str>
where
    F: Fn(&'a Event) -> &'a str,
{
    events.iter().map(field).filter(|value| !value.is_empty()).collect()
}

/// Print the statistics of one processed source.
fn print_source_summary(summary: &Summary) {
    let indent1 = OPT_SUMMARY_PRINT_INDENT1;
    let indent2 = OPT_SUMMARY_PRINT_INDENT2;
    eprintln!("{}{}", indent1, summary.source);
    eprintln!("{}node          : {}", indent2, summary.node);
    eprintln!("{}dialect       : {}", indent2, summary.dialect);
    eprintln!("{}bytes         : {}", indent2, summary.linereader.LineReader_bytes);
    eprintln!("{}lines         : {}", indent2, summary.linereader.LineReader_lines);
    eprintln!("{}lines skipped : {} (not UTF-8)", indent2, summary.linereader.LineReader_lines_undecodable);
    eprintln!("{}lines stamped : {}", indent2, summary.eventprocessor.EventProcessor_lines_stamped);
    eprintln!(
        "{}events        : {} ({} inherited a datetime)",
        indent2, summary.eventprocessor.EventProcessor_events, summary.eventprocessor.EventProcessor_events_inherited,
    );
    eprintln!("{}orphans       : {}", indent2, summary.eventprocessor.EventProcessor_orphans);
    if summary.eventprocessor.EventProcessor_year_rollovers != 0 {
        eprintln!("{}new years     : {}", indent2, summary.eventprocessor.EventProcessor_year_rollovers);
    }
    for category in Category::ALL.iter() {
        let count: Count = summary.eventprocessor.category_count(*category);
        if count == 0 {
            continue;
        }
        eprintln!("{}  {:<27}: {}", indent2, category.as_str(), count);
    }
}

/// Print the `--summary` to stderr; per-source statistics, then the
/// written timeline's extent, nodes, and components.
pub fn print_summary(
    summaries: &[Summary],
    timeline: &[Event],
    window: &TimeWindow,
    output: &FPath,
    elapsed: Duration,
) {
    defñ!("({} summaries, {} events)", summaries.len(), timeline.len());
    let indent1 = OPT_SUMMARY_PRINT_INDENT1;
    eprintln!();
    eprintln!("Sources:");
    for summary in summaries.iter() {
        print_source_summary(summary);
    }
    eprintln!();
    eprintln!("Timeline:");
    eprintln!("{}output        : {}", indent1, output);
    eprintln!("{}window        : {}", indent1, window);
    eprintln!("{}events        : {}", indent1, timeline.len());
    if let (Some(first), Some(last)) = (timeline.first(), timeline.last()) {
        eprintln!("{}first         : {}", indent1, first.timestamp().format(DATETIME_FORMAT_OUT));
        eprintln!("{}last          : {}", indent1, last.timestamp().format(DATETIME_FORMAT_OUT));
    }
    let nodes = distinct(timeline, |event| event.node().as_str());
    eprintln!("{}nodes         : {}", indent1, nodes.iter().join(", "));
    let components = distinct(timeline, |event| event.component());
    eprintln!("{}components    : {}", indent1, components.iter().join(", "));
    eprintln!("{}elapsed       : {:?}", indent1, elapsed);
}
