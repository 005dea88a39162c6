// src/tests/mod.rs

//! Tests for _hatlib_.
//!
//! Tests are placed at `src/tests/`, inside the `hatlib`, for crate-internal
//! visibility. Tests of the `hat` program as a whole are at top-level path
//! `tests/`.

pub mod classifier_tests;
pub mod common;
