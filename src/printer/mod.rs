// src/printer/mod.rs

//! The `printer` module is for writing the timeline of [`Event`s] to the
//! output file, and printing the CLI option `--summary`.
//!
//! [`Event`s]: crate::data::event::Event

pub mod printers;
pub mod summary;
