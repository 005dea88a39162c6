// src/data/mod.rs

//! The `data` module is specialized data containers for [`RawLine`]s and
//! [`Event`]s, and the [`PatternTable`] that turns one into the other.
//!
//! ## Definitions of data
//!
//! ### Raw line
//!
//! A "raw line" is the text of one line of a log source, without the
//! trailing newline, tagged with the [`Dialect`] and node of its source.
//!
//! ### Event
//!
//! An "event" is a raw line that matched one [`Category`] of critical
//! cluster events, with the datetime written on the line or inherited from
//! an earlier line of the same source.
//!
//! ### Timestamps
//!
//! A line starts with either an ISO 8601 datetime, e.g.
//! `2021-03-26T03:10:38.123+00:00` or `2021-03-26 03:10:38`, or a BSD
//! syslog datetime without a year, e.g. `Mar 26 03:10:38`. The timezone is
//! ignored; all datetimes are naive.
//!
//! Also see [_Overview of readers_].
//!
//! [_Overview of readers_]: crate::readers
//! [`RawLine`]: crate::data::event::RawLine
//! [`Event`]: crate::data::event::Event
//! [`Category`]: crate::data::event::Category
//! [`Dialect`]: crate::common::Dialect
//! [`PatternTable`]: crate::data::rules::PatternTable

pub mod datetime;
pub mod event;
pub mod rules;
