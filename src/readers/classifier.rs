// src/readers/classifier.rs

//! Classify a single [`RawLine`] into an [`Event`] of one [`Category`].
//!
//! Classification is a pure function of the line, the [`PatternTable`], and
//! the last known datetime of the line's source. Lines without a leading
//! datetime, e.g. `cib_perform_op` diff lines and
//! `check_migration_threshold` lines in some Pacemaker versions, inherit the
//! last known datetime.
//!
//! A line with a leading datetime is split into fields the same way for
//! every dialect:
//!
//! ```text
//! <datetime> <host> <component> <payload...>
//! ```
//!
//! after removing the first `[pid]` of the line.

use std::borrow::Cow;

use crate::common::NodeId;
use crate::data::datetime::{add_years, DateTimeOpt, LeadingDateTime, NaiveDateTime, Year};
use crate::data::event::{Category, Event, RawLine};
use crate::data::rules::{DialectRules, PatternTable};
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// What became of a classified line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The line is a critical event.
    Event(Event),
    /// The line matched `Category` but has no datetime and no datetime was
    /// known to inherit.
    Orphan(Category),
    /// The line is not a critical event.
    Unclassified,
}

/// Result of [`classify_line`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Classification {
    /// The datetime written on the line itself, if any.
    pub stamp: DateTimeOpt,
    /// `stamp` was written without a year and has the filler year.
    pub yearless: bool,
    pub outcome: Outcome,
}

impl Classification {
    /// Move the line's own datetime, and the event stamped with it,
    /// `years` later.
    ///
    /// Unchanged if the line has no datetime or the date does not exist in
    /// the later year.
    pub fn add_years(mut self, years: Year) -> Classification {
        let dt: NaiveDateTime = match self.stamp.and_then(|dt| add_years(&dt, years)) {
            Some(dt) => dt,
            None => return self,
        };
        self.stamp = Some(dt);
        if let Outcome::Event(ref mut event) = self.outcome {
            event.set_timestamp(dt);
        }

        self
    }
}

/// Fields of a log line.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct LineFields<'a> {
    pub stamp: DateTimeOpt,
    pub yearless: bool,
    pub host: &'a str,
    pub component: &'a str,
    pub payload: &'a str,
}

/// Split `s` at the first run of whitespace.
fn split_field(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(at) => (&s[..at], s[at..].trim_start()),
        None => (s, ""),
    }
}

/// Split a `[pid]`-less line into fields.
///
/// A line without a leading datetime is all payload.
pub(crate) fn split_fields<'a>(rules: &DialectRules, text: &'a str) -> LineFields<'a> {
    match rules.timestamps.find_leading(text) {
        Some(LeadingDateTime { dt, end, yearless }) => {
            let rest: &str = text[end..].trim_start();
            let (host, rest) = split_field(rest);
            let (component, payload) = split_field(rest);

            LineFields {
                stamp: Some(dt),
                yearless,
                host,
                component,
                payload,
            }
        }
        None => LineFields {
            stamp: None,
            yearless: false,
            host: "",
            component: "",
            payload: text.trim(),
        },
    }
}

/// Classify `line`, reporting the line's own datetime along with the
/// [`Outcome`].
///
/// `last_known` is the datetime to inherit if the line has none.
pub fn classify_line(
    table: &PatternTable,
    line: &RawLine,
    last_known: DateTimeOpt,
) -> Classification {
    let rules: DialectRules = table.rules_for(line.dialect());
    let text: &str = line.text().trim_end_matches(&['\r', '\n'][..]);
    let text_nopid: Cow<str> = table.regex_pid().replacen(text, 1, "");
    let fields: LineFields = split_fields(&rules, &text_nopid);

    if !rules.prefilter.is_match(text) {
        return Classification {
            stamp: fields.stamp,
            yearless: fields.yearless,
            outcome: Outcome::Unclassified,
        };
    }
    let category: Category = match rules.categorize(fields.component, fields.payload) {
        Some(category) => category,
        None => {
            return Classification {
                stamp: fields.stamp,
            yearless: fields.yearless,
                outcome: Outcome::Unclassified,
            };
        }
    };
    defo!("{:?} {:?}", category, str_to_String_noraw(text));

    let timestamp: NaiveDateTime = match fields.stamp.or(last_known) {
        Some(dt) => dt,
        None => {
            defo!("orphan, no datetime to inherit");
            return Classification {
                stamp: None,
                yearless: false,
                outcome: Outcome::Orphan(category),
            };
        }
    };
    let node: NodeId = match fields.host {
        "" => line.node().clone(),
        host => NodeId::from(host),
    };
    let raw_text: String = match (fields.component, fields.payload) {
        ("", payload) => payload.to_string(),
        (component, "") => component.to_string(),
        (component, payload) => format!("{} {}", component, payload),
    };
    let event = Event::new(
        timestamp,
        node,
        category,
        fields.component.to_string(),
        raw_text,
    );

    Classification {
        stamp: fields.stamp,
        yearless: fields.yearless,
        outcome: Outcome::Event(event),
    }
}

/// Classify `line`. `None` if the line is not a critical event, or must
/// inherit a datetime and `last_known` is `None`.
pub fn classify(
    table: &PatternTable,
    line: &RawLine,
    last_known: DateTimeOpt,
) -> Option<Event> {
    match classify_line(table, line, last_known).outcome {
        Outcome::Event(event) => Some(event),
        Outcome::Orphan(_) | Outcome::Unclassified => None,
    }
}
