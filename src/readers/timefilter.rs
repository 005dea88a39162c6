// src/readers/timefilter.rs

//! Keep only the [`Event`]s within a user-passed time window.

use std::fmt;

use crate::common::{Error, Result};
use crate::data::datetime::{parse_bound, BoundKind, DateTimeOpt, NaiveDateTime, DATETIME_FORMAT_OUT};
use crate::data::event::{Event, Events};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// An inclusive time window; an absent bound is unbounded on that side.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimeWindow {
    begin: DateTimeOpt,
    end: DateTimeOpt,
}

impl TimeWindow {
    /// Fails with [`Error::InvalidRange`] if `begin` is later than `end`.
    pub fn new(begin: DateTimeOpt, end: DateTimeOpt) -> Result<TimeWindow> {
        if let (Some(begin), Some(end)) = (begin, end) {
            if begin > end {
                return Err(Error::InvalidRange { begin, end });
            }
        }

        Ok(TimeWindow { begin, end })
    }

    /// A window from user-passed `YYYY-MM-DD` or `YYYY-MM-DD-HH:MM` values.
    pub fn from_cli(begin: Option<&str>, end: Option<&str>) -> Result<TimeWindow> {
        defn!("({:?}, {:?})", begin, end);
        let begin: DateTimeOpt = begin
            .map(|value| parse_bound(value, BoundKind::Begin))
            .transpose()?;
        let end: DateTimeOpt = end
            .map(|value| parse_bound(value, BoundKind::End))
            .transpose()?;
        let window = TimeWindow::new(begin, end);
        defx!("{:?}", window);

        window
    }

    pub const fn begin(&self) -> DateTimeOpt {
        self.begin
    }

    pub const fn end(&self) -> DateTimeOpt {
        self.end
    }

    pub const fn is_unbounded(&self) -> bool {
        self.begin.is_none() && self.end.is_none()
    }

    pub fn contains(&self, dt: &NaiveDateTime) -> bool {
        match self.begin {
            Some(begin) if dt < &begin => return false,
            _ => {}
        }
        match self.end {
            Some(end) if dt > &end => return false,
            _ => {}
        }

        true
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let show = |dt: &DateTimeOpt| -> String {
            match dt {
                Some(dt) => dt.format(DATETIME_FORMAT_OUT).to_string(),
                None => String::from("…"),
            }
        };
        write!(f, "[{}, {}]", show(&self.begin), show(&self.end))
    }
}

/// Keep the `events` within `window`, in order.
pub fn filter(events: Events, window: &TimeWindow) -> Events {
    defn!("({} events, {})", events.len(), window);
    if window.is_unbounded() {
        defx!("unbounded");
        return events;
    }
    let kept: Events = events
        .into_iter()
        .filter(|event: &Event| window.contains(event.timestamp()))
        .collect();
    defx!("kept {} events", kept.len());

    kept
}
