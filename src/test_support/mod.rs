//! Test utilities for gangway unit tests.
//!
//! Provides canned header sources covering the supported declaration
//! shapes, so tests across modules exercise the same surface.

pub mod fixtures;

pub use fixtures::*;
