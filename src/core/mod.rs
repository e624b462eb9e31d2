//! Core data structures for gangway.
//!
//! This module contains the foundational types used throughout the pipeline:
//! - The C type model (CType)
//! - Parsed declarations (function prototypes, opaque handles)
//! - The run-scoped opaque handle registry

pub mod ctype;
pub mod decl;
pub mod registry;

pub use ctype::{CType, IntWidth};
pub use decl::{CParam, Declaration, FunctionDecl, OpaqueHandleDecl};
pub use registry::OpaqueRegistry;
