// src/readers/eventprocessor.rs

//! Builds the [`Events`] of one log source by classifying each of its
//! [`RawLine`]s in file order.
//!
//! The build carries one piece of state, the last known datetime of the
//! source. Every line with its own leading datetime updates it, whether or
//! not the line is classified. A classified line without a datetime
//! inherits it. A classified line without a datetime before any datetime
//! was seen is an orphan and is dropped.
//!
//! Syslog datetimes have no year and start with the filler year. If such a
//! datetime jumps backwards by more than [`BACKWARDS_TIME_JUMP_MEANS_NEW_YEAR`]
//! then the source has passed into the next year, e.g. `Dec 31` followed by
//! `Jan  1`. That and every later yearless datetime of the source is moved
//! one more year on.

use crate::common::Result;
use crate::data::datetime::{DateTimeOpt, Duration, Year};
use crate::data::event::{Events, RawLine};
use crate::data::rules::PatternTable;
use crate::readers::classifier::{classify_line, Classification, Outcome};
use crate::readers::summary::SummaryEventProcessor;

use ::lazy_static::lazy_static;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

lazy_static! {
    /// A yearless datetime this far before the previous yearless datetime
    /// is in the following year.
    pub static ref BACKWARDS_TIME_JUMP_MEANS_NEW_YEAR: Duration = Duration::seconds(60 * 60 * 25);
}

/// Build the events of one source from `lines`, in line order.
///
/// Stops at the first `Err` of `lines`.
pub fn build<I>(table: &PatternTable, lines: I) -> Result<(Events, SummaryEventProcessor)>
where
    I: Iterator<Item = Result<RawLine>>,
{
    defn!();
    let mut events: Events = Events::new();
    let mut summary = SummaryEventProcessor::default();
    let mut last_known: DateTimeOpt = None;
    // previous yearless datetime, as parsed with the filler year
    let mut last_yearless: DateTimeOpt = None;
    let mut years_passed: Year = 0;

    for line in lines {
        let line: RawLine = line?;
        let mut classification: Classification = classify_line(table, &line, last_known);
        if classification.yearless {
            if let Some(dt) = classification.stamp {
                if let Some(dt_prev) = last_yearless {
                    if dt < dt_prev && dt_prev - dt > *BACKWARDS_TIME_JUMP_MEANS_NEW_YEAR {
                        years_passed += 1;
                        summary.EventProcessor_year_rollovers += 1;
                        defo!("year rollover {:?} -> {:?}, years_passed {}", dt_prev, dt, years_passed);
                    }
                }
                last_yearless = Some(dt);
                if years_passed != 0 {
                    classification = classification.add_years(years_passed);
                }
            }
        }
        if let Some(dt) = classification.stamp {
            summary.EventProcessor_lines_stamped += 1;
            last_known = Some(dt);
        }
        match classification.outcome {
            Outcome::Event(event) => {
                if classification.stamp.is_none() {
                    summary.EventProcessor_events_inherited += 1;
                }
                summary.EventProcessor_events += 1;
                summary.count_category(event.category());
                events.push(event);
            }
            Outcome::Orphan(_category) => {
                defo!("drop orphan {:?}", _category);
                summary.EventProcessor_orphans += 1;
            }
            Outcome::Unclassified => {}
        }
    }
    defx!("{} events", events.len());

    Ok((events, summary))
}
