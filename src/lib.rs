//! Gangway - a C-header-to-FFI-adapter generator
//!
//! This crate provides the core library functionality for gangway:
//! parsing C header declarations, mapping their types to a managed
//! host language's FFI representation, and emitting C adapter functions
//! that delegate to the original library.

pub mod core;
pub mod emitter;
pub mod mapper;
pub mod ops;
pub mod parser;
pub mod util;

/// Test fixtures for gangway unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides canned header sources exercising the
/// supported declaration shapes.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    CParam, CType, Declaration, FunctionDecl, IntWidth, OpaqueHandleDecl, OpaqueRegistry,
};
pub use emitter::{AdapterEmitter, BindingUnit};
pub use mapper::{MappedFunction, TypeMapper, TypeMapping};
pub use ops::{bind_header, generate, GenerateOptions, GenerateResult};
pub use parser::HeaderParser;
pub use util::config::Config;
