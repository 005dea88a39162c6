// src/readers/mod.rs

//! "Readers" for _hatlib_.
//!
//! ## Overview of readers
//!
//! * [`filepreprocessor`] resolves user-passed paths, plain log files and
//!   support bundles, to [`LogSource`s], deciding the [`Dialect`] of each.
//! * A [`RawLineReader`] reads the [`RawLine`s] of one `LogSource`.
//! * [`eventprocessor::build`] classifies each `RawLine` with the
//!   [`classifier`] and folds them into one event stream per source.
//! * [`merger::merge`] merges all event streams into one timeline.
//! * [`timefilter::filter`] keeps the timeline events within the user's
//!   time window.
//!
//! [`timelineprocessor`] drives all of the above for the _hat_ binary.
//!
//! <br/>
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`Dialect`]: crate::common::Dialect
//! [`LogSource`s]: crate::readers::filepreprocessor::LogSource
//! [`RawLine`s]: crate::data::event::RawLine
//! [`RawLineReader`]: crate::readers::linereader::RawLineReader

pub mod classifier;
pub mod eventprocessor;
pub mod filedecompressor;
pub mod filepreprocessor;
pub mod helpers;
pub mod linereader;
pub mod merger;
pub mod summary;
pub mod timefilter;
pub mod timelineprocessor;
