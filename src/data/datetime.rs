// src/data/datetime.rs

//! Functions to perform regular expression ("regex") searches on log lines
//! and transform matches to chrono [`NaiveDateTime`] instances.
//!
//! Two kinds of datetime strings are handled:
//! 1. a datetime at the beginning of a log line, found by a
//!    [`TimestampParser`]
//! 2. a user-passed datetime filter value, parsed by [`parse_bound`]
//!
//! Log line datetimes may be wrapped in brackets, e.g. corosync lines
//! `[2021-11-25 03:19:33] ...`. Timezone offsets and fractional seconds are
//! matched but discarded; all datetimes are naive local datetimes as written
//! in the log.
//!
//! [`NaiveDateTime`]: https://docs.rs/chrono/0.4.40/chrono/naive/struct.NaiveDateTime.html

use crate::common::{Error, Result};

#[doc(hidden)]
pub use ::chrono::{
    Datelike,
    Duration,
    Local,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
};
use ::lazy_static::lazy_static;
use ::regex::{Captures, Regex};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime Regex Matching
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A _Year_ in a date
pub type Year = i32;

pub type DateTimeOpt = Option<NaiveDateTime>;

/// Output format of a datetime, e.g. `2021-03-26 03:10:38`.
pub const DATETIME_FORMAT_OUT: &str = "%Y-%m-%d %H:%M:%S";

/// Leading ISO-8601-ish datetime, `T` or space separated, e.g.
/// `2021-03-26T03:10:38.123456+01:00` or `2021-03-26 03:10:38`.
const REGEX_ISO: &str = concat!(
    r"^[\s\[]*",
    r"(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})[T ]",
    r"(?P<hour>\d{2}):(?P<minute>\d{2}):(?P<second>\d{2})",
    r"(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?\]?",
);

/// Leading RFC 3164 syslog datetime, no year, e.g. `Mar 26 03:10:38`.
const REGEX_BSD: &str = concat!(
    r"^[\s\[]*",
    r"(?P<month>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(?P<day>\d{1,2})\s+",
    r"(?P<hour>\d{2}):(?P<minute>\d{2}):(?P<second>\d{2})\]?",
);

/// Convert a three-letter English month abbreviation to a month number.
pub fn month_bsd_to_num(month: &str) -> Option<u32> {
    let num = match month {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    };

    Some(num)
}

fn capture_u32(captures: &Captures, name: &str) -> Option<u32> {
    captures.name(name)?.as_str().parse::<u32>().ok()
}

/// A datetime found at the beginning of a log line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeadingDateTime {
    pub dt: NaiveDateTime,
    /// byte offset one past the end of the datetime string
    pub end: usize,
    /// the line has no year; `dt` has the filler year
    pub yearless: bool,
}

/// Finds the datetime at the beginning of a log line.
///
/// Syslog datetimes without a year, e.g. `Mar 26 03:10:38`, are given the
/// filler `year` passed to [`TimestampParser::new`].
#[derive(Debug)]
pub struct TimestampParser {
    regex_iso: Regex,
    regex_bsd: Regex,
    year: Year,
}

impl TimestampParser {
    pub fn new(year: Year) -> TimestampParser {
        defñ!("({})", year);
        TimestampParser {
            // the patterns are constant and tested, so compiling cannot fail
            regex_iso: Regex::new(REGEX_ISO).unwrap(),
            regex_bsd: Regex::new(REGEX_BSD).unwrap(),
            year,
        }
    }

    /// The filler year for datetimes without a year.
    pub const fn year(&self) -> Year {
        self.year
    }

    /// Parse a datetime at the beginning of `line`.
    ///
    /// Returns the datetime and the byte offset one past the end of the
    /// matched datetime string. Returns `None` if `line` has no leading
    /// datetime or the datetime is not a real calendar date, e.g. `Feb 30`.
    pub fn parse_leading(&self, line: &str) -> Option<(NaiveDateTime, usize)> {
        self.find_leading(line)
            .map(|leading| (leading.dt, leading.end))
    }

    /// Like [`parse_leading`], also telling whether the filler year was used.
    ///
    /// [`parse_leading`]: TimestampParser::parse_leading
    pub fn find_leading(&self, line: &str) -> Option<LeadingDateTime> {
        if let Some(captures) = self.regex_iso.captures(line) {
            let year: Year = captures.name("year")?.as_str().parse::<Year>().ok()?;
            let dt = ymdhms_to_datetime(
                year,
                capture_u32(&captures, "month")?,
                capture_u32(&captures, "day")?,
                capture_u32(&captures, "hour")?,
                capture_u32(&captures, "minute")?,
                capture_u32(&captures, "second")?,
            )?;
            let end: usize = captures.get(0)?.end();
            defñ!("ISO {:?} end {}", dt, end);

            return Some(LeadingDateTime { dt, end, yearless: false });
        }
        if let Some(captures) = self.regex_bsd.captures(line) {
            let dt = ymdhms_to_datetime(
                self.year,
                month_bsd_to_num(captures.name("month")?.as_str())?,
                capture_u32(&captures, "day")?,
                capture_u32(&captures, "hour")?,
                capture_u32(&captures, "minute")?,
                capture_u32(&captures, "second")?,
            )?;
            let end: usize = captures.get(0)?.end();
            defñ!("BSD {:?} end {}", dt, end);

            return Some(LeadingDateTime { dt, end, yearless: true });
        }

        None
    }
}

/// Create a `NaiveDateTime`, `None` if any field is out of range.
pub fn ymdhms_to_datetime(
    year: Year,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> DateTimeOpt {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// `dt` moved `years` later. `None` if the date does not exist in that
/// year, i.e. `Feb 29`.
pub fn add_years(dt: &NaiveDateTime, years: Year) -> Option<NaiveDateTime> {
    dt.with_year(dt.year() + years)
}

/// The current year of the local system clock.
pub fn year_now() -> Year {
    Local::now().year()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// user-passed datetime filters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// strftime pattern of a bound with minutes, `YYYY-MM-DD-HH:MM`
const BOUND_FORMAT_MINUTE: &str = "%Y-%m-%d-%H:%M";
/// strftime pattern of a bound with only a date, `YYYY-MM-DD`
const BOUND_FORMAT_DATE: &str = "%Y-%m-%d";

lazy_static! {
    static ref REGEX_BOUND_MINUTE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}-\d{2}:\d{2}$").unwrap();
    static ref REGEX_BOUND_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// Which side of a time window a bound is for.
///
/// A date-only bound is widened to cover its whole day. A bound with
/// minutes is the instant `HH:MM:00` on either side.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundKind {
    /// midnight of a date-only bound
    Begin,
    /// last instant of the day of a date-only bound
    End,
}

/// Parse a user-passed `YYYY-MM-DD` or `YYYY-MM-DD-HH:MM` value.
pub fn parse_bound(value: &str, kind: BoundKind) -> Result<NaiveDateTime> {
    defn!("({:?}, {:?})", value, kind);
    let unparsable = || Error::UnparsableTimestamp {
        value: value.to_string(),
    };
    let dt: NaiveDateTime = if REGEX_BOUND_MINUTE.is_match(value) {
        // a minute is the instant `HH:MM:00` for either side
        NaiveDateTime::parse_from_str(value, BOUND_FORMAT_MINUTE).map_err(|_| unparsable())?
    } else if REGEX_BOUND_DATE.is_match(value) {
        let date = NaiveDate::parse_from_str(value, BOUND_FORMAT_DATE).map_err(|_| unparsable())?;
        match kind {
            BoundKind::Begin => date.and_time(NaiveTime::MIN),
            BoundKind::End => date.and_time(
                NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).ok_or_else(unparsable)?,
            ),
        }
    } else {
        defx!("no pattern matched");
        return Err(unparsable());
    };
    defx!("return {:?}", dt);

    Ok(dt)
}
