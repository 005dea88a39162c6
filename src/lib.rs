// src/lib.rs

//! _hatlib_ builds a chronological timeline of critical events from the
//! logs of a Pacemaker/Corosync high-availability cluster.
//!
//! Used by the binary program _hat_.

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
