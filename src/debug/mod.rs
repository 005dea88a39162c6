// src/debug/mod.rs

//! The `debug` module is macros for printing errors and warnings, and
//! functions for debug builds and test builds.

#[cfg(test)]
pub mod helpers;

pub mod printers;
