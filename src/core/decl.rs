//! Parsed declarations.
//!
//! These are the statements of interest extracted from a header: function
//! prototypes and opaque-handle typedefs. Declarations are immutable once
//! built; downstream stages enrich them into new values rather than editing
//! in place.

use serde::{Deserialize, Serialize};

use crate::core::ctype::CType;

/// One parsed C statement of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// A function prototype.
    Function(FunctionDecl),

    /// An opaque handle registration (`typedef struct TAG TAG;`).
    OpaqueHandle(OpaqueHandleDecl),
}

impl Declaration {
    /// The declared name (function name or handle tag).
    pub fn name(&self) -> &str {
        match self {
            Declaration::Function(f) => &f.name,
            Declaration::OpaqueHandle(h) => &h.tag,
        }
    }

    /// 1-based source line of the declaration.
    pub fn line(&self) -> u32 {
        match self {
            Declaration::Function(f) => f.line,
            Declaration::OpaqueHandle(h) => h.line,
        }
    }
}

/// A C function declaration extracted from a header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Function name, e.g. `add`.
    pub name: String,

    /// Ordered parameter list.
    pub params: Vec<CParam>,

    /// Return type.
    pub ret: CType,

    /// Whether the prototype ends in `...`.
    pub variadic: bool,

    /// 1-based source line.
    pub line: u32,
}

/// A single function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CParam {
    /// Parameter name. Unnamed parameters get a synthesized `argN` name.
    pub name: String,

    /// Parameter type.
    pub ctype: CType,
}

impl CParam {
    /// Create a new parameter.
    pub fn new(name: impl Into<String>, ctype: CType) -> Self {
        CParam {
            name: name.into(),
            ctype,
        }
    }
}

/// An opaque handle declared via `typedef struct TAG TAG;`.
///
/// Opaque handles carry no fields; they exist so pointer parameters and
/// returns naming the tag can be classified as passthrough handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueHandleDecl {
    /// The struct tag (and typedef name).
    pub tag: String,

    /// 1-based source line.
    pub line: u32,
}
