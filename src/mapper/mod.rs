//! C-to-host type mapping policy.
//!
//! The mapper decides, for each C type in a declaration, which target
//! representation the adapter exposes to the host FFI and which conversion
//! bridges the two. The policy is a pure function of the type: the same
//! `CType` always maps to the same `TypeMapping` within a run, so generated
//! output is reproducible.
//!
//! Host representation policy: integers surface as fixed-width unsigned
//! (`uint8_t`..`uint64_t`) with explicit casts in both directions, floats
//! widen to `double`, read-only strings and registered opaque handles pass
//! through untouched. Anything else is a hard error for that declaration;
//! the mapper never guesses.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::ctype::{CType, IntWidth};
use crate::core::decl::FunctionDecl;
use crate::core::registry::OpaqueRegistry;

/// How a value crosses the adapter boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// The value is forwarded unchanged (pointers, handles).
    Identity,

    /// The value is explicitly cast: to the declared C type on the way in,
    /// to the target representation on the way out.
    Cast,
}

/// How a single C type maps to the target representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    /// C spelling of the target representation (what the adapter signature
    /// uses), e.g. `uint32_t` or `const char *`.
    pub ffi_type: String,

    /// Conversion rule for values of this type.
    pub conversion: Conversion,
}

impl TypeMapping {
    fn cast(ffi_type: impl Into<String>) -> Self {
        TypeMapping {
            ffi_type: ffi_type.into(),
            conversion: Conversion::Cast,
        }
    }

    fn passthrough(ffi_type: impl Into<String>) -> Self {
        TypeMapping {
            ffi_type: ffi_type.into(),
            conversion: Conversion::Identity,
        }
    }

    /// The expression for passing `name` to the original function.
    pub fn argument(&self, name: &str, declared: &CType) -> String {
        match self.conversion {
            Conversion::Identity => name.to_string(),
            Conversion::Cast => format!("({}){}", declared.strip_const(), name),
        }
    }
}

/// Errors produced when a C type has no mapping.
///
/// Each is fatal to its declaration only; the driver reports it and moves on.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum MapError {
    /// The type shape is recognized but deliberately has no policy entry.
    #[error("no mapping policy for C type `{0}`")]
    #[diagnostic(
        code(gangway::map::unsupported),
        help("pointer-to-pointer, mutable buffers, and struct values have no mapping policy")
    )]
    Unsupported(String),

    /// The type names something the run has never seen.
    #[error("unknown type `{0}`")]
    #[diagnostic(
        code(gangway::map::unknown_type),
        help("declare `typedef struct {0} {0};` before the first use to register an opaque handle")
    )]
    UnknownType(String),

    /// A registered opaque handle used by value instead of by pointer.
    #[error("opaque handle `{0}` cannot be passed by value")]
    #[diagnostic(code(gangway::map::opaque_by_value))]
    OpaqueByValue(String),

    /// Variadic prototypes cannot be adapted.
    #[error("variadic functions cannot be adapted")]
    #[diagnostic(code(gangway::map::variadic))]
    Variadic,

    /// `void` appeared somewhere other than the return type.
    #[error("`void` is only valid as a return type")]
    #[diagnostic(code(gangway::map::void_param))]
    VoidParam,
}

/// A parameter with its mapping attached.
#[derive(Debug, Clone)]
pub struct MappedParam {
    pub name: String,
    pub ctype: CType,
    pub mapping: TypeMapping,
}

/// A function whose parameter and return types all mapped successfully.
#[derive(Debug, Clone)]
pub struct MappedFunction {
    /// Original C symbol name.
    pub name: String,

    /// Parameters in declaration order.
    pub params: Vec<MappedParam>,

    /// Return type and its mapping; `None` for `void`.
    pub ret: Option<(CType, TypeMapping)>,

    /// 1-based source line of the declaration.
    pub line: u32,
}

/// Maps C types to their target representation.
pub struct TypeMapper<'a> {
    opaques: &'a OpaqueRegistry,
}

impl<'a> TypeMapper<'a> {
    /// Create a mapper over the run's opaque handle registry.
    pub fn new(opaques: &'a OpaqueRegistry) -> Self {
        TypeMapper { opaques }
    }

    /// Map a parameter type.
    pub fn map_param(&self, ctype: &CType) -> Result<TypeMapping, MapError> {
        self.map_value(ctype)
    }

    /// Map a return type. `Ok(None)` means the function returns `void`.
    pub fn map_return(&self, ctype: &CType) -> Result<Option<TypeMapping>, MapError> {
        if ctype.is_void() {
            return Ok(None);
        }
        self.map_value(ctype).map(Some)
    }

    /// Map a whole declaration, failing on the first unmappable type.
    pub fn map_function(&self, decl: &FunctionDecl) -> Result<MappedFunction, MapError> {
        if decl.variadic {
            return Err(MapError::Variadic);
        }

        let ret = self
            .map_return(&decl.ret)?
            .map(|mapping| (decl.ret.clone(), mapping));

        let mut params = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            let mapping = self.map_param(&param.ctype)?;
            params.push(MappedParam {
                name: param.name.clone(),
                ctype: param.ctype.clone(),
                mapping,
            });
        }

        Ok(MappedFunction {
            name: decl.name.clone(),
            params,
            ret,
            line: decl.line,
        })
    }

    fn map_value(&self, ctype: &CType) -> Result<TypeMapping, MapError> {
        match ctype {
            CType::Int { width, .. } => Ok(TypeMapping::cast(width.unsigned_spelling())),

            // Floats surface as double; float narrows back on the way in,
            // a pairing the policy marks as known-safe.
            CType::Float { .. } => Ok(TypeMapping::cast("double")),

            CType::OpaquePointer(tag) => Ok(TypeMapping::passthrough(format!("{tag} *"))),

            CType::Const(inner) => match inner.as_ref() {
                CType::Pointer(pointee) if is_char(pointee) => {
                    Ok(TypeMapping::passthrough("const char *"))
                }
                CType::OpaquePointer(tag) => {
                    Ok(TypeMapping::passthrough(format!("const {tag} *")))
                }
                // Top-level const on a value type does not change the mapping.
                _ => self.map_value(inner),
            },

            CType::Pointer(inner) => match inner.as_ref() {
                // `char const *` parsed without normalization.
                CType::Const(pointee) if is_char(pointee) => {
                    Ok(TypeMapping::passthrough("const char *"))
                }
                CType::Int {
                    width: IntWidth::W8,
                    ..
                } => Err(MapError::Unsupported(ctype.to_string())),
                CType::Named(name) => Err(MapError::UnknownType(name.clone())),
                _ => Err(MapError::Unsupported(ctype.to_string())),
            },

            CType::Named(name) => {
                if self.opaques.contains(name) {
                    Err(MapError::OpaqueByValue(name.clone()))
                } else {
                    Err(MapError::UnknownType(name.clone()))
                }
            }

            CType::Void => Err(MapError::VoidParam),
        }
    }
}

fn is_char(ctype: &CType) -> bool {
    matches!(
        ctype.strip_const(),
        CType::Int {
            width: IntWidth::W8,
            ..
        }
    )
}
