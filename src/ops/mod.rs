//! High-level operations.
//!
//! This module contains the driver that orchestrates the pipeline for the
//! gangway commands.

pub mod generate;

pub use generate::{
    bind_header, check, generate, BoundHeader, GenerateOptions, GenerateResult, HeaderOutcome,
};
