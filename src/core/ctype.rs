//! C type representation for parsed declarations.
//!
//! Types are parsed from their C spelling into a small tagged union. Only the
//! shapes the mapping policy understands get dedicated variants; everything
//! else is carried as [`CType::Named`] and rejected when mapped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::registry::OpaqueRegistry;

/// Width of a C integer type, in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// The fixed-width unsigned spelling used on the host side of an adapter.
    pub fn unsigned_spelling(&self) -> &'static str {
        match self {
            IntWidth::W8 => "uint8_t",
            IntWidth::W16 => "uint16_t",
            IntWidth::W32 => "uint32_t",
            IntWidth::W64 => "uint64_t",
        }
    }
}

/// A C type as it appears in a declaration.
///
/// `const char *` is represented as `Const(Pointer(Int{8}))`; parsing
/// normalizes `char const *` to the same shape so both spellings map
/// identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CType {
    /// The void type (only valid as a return type).
    Void,

    /// Integer type with declared width and signedness.
    Int { width: IntWidth, signed: bool },

    /// Floating point type.
    Float { double: bool },

    /// Pointer to another type.
    Pointer(Box<CType>),

    /// Pointer to a registered opaque handle, by struct tag.
    OpaquePointer(String),

    /// Const-qualified type.
    Const(Box<CType>),

    /// A spelling the parser could not classify (unregistered typedef,
    /// struct tag, etc.). Hard error at mapping time.
    Named(String),
}

impl CType {
    /// Parse a C type spelling.
    ///
    /// `opaques` resolves pointer-to-tag spellings into [`CType::OpaquePointer`]
    /// when the tag has been registered earlier in the run.
    pub fn parse(spelling: &str, opaques: &OpaqueRegistry) -> CType {
        let s = spelling.split_whitespace().collect::<Vec<_>>().join(" ");
        let s = s.trim();

        // Peel one pointer level off the end. Const is hoisted outward so
        // `const char *` and `char const *` land on the same representation.
        if let Some(rest) = s.strip_suffix('*') {
            return match CType::parse(rest, opaques) {
                CType::Named(name) if opaques.contains(&name) => CType::OpaquePointer(name),
                CType::Const(inner) => match *inner {
                    CType::Named(name) if opaques.contains(&name) => {
                        CType::Const(Box::new(CType::OpaquePointer(name)))
                    }
                    other => CType::Const(Box::new(CType::Pointer(Box::new(other)))),
                },
                other => CType::Pointer(Box::new(other)),
            };
        }

        if let Some(rest) = s.strip_prefix("const ") {
            return CType::Const(Box::new(CType::parse(rest, opaques)));
        }
        if let Some(rest) = s.strip_suffix(" const") {
            return CType::Const(Box::new(CType::parse(rest, opaques)));
        }

        if let Some(tag) = s.strip_prefix("struct ") {
            return CType::Named(tag.to_string());
        }

        match s {
            "void" => CType::Void,

            "char" | "signed char" | "int8_t" => CType::Int {
                width: IntWidth::W8,
                signed: true,
            },
            "unsigned char" | "uint8_t" => CType::Int {
                width: IntWidth::W8,
                signed: false,
            },
            "short" | "short int" | "signed short" | "signed short int" | "int16_t" => CType::Int {
                width: IntWidth::W16,
                signed: true,
            },
            "unsigned short" | "unsigned short int" | "uint16_t" => CType::Int {
                width: IntWidth::W16,
                signed: false,
            },
            "int" | "signed" | "signed int" | "int32_t" => CType::Int {
                width: IntWidth::W32,
                signed: true,
            },
            "unsigned" | "unsigned int" | "uint32_t" => CType::Int {
                width: IntWidth::W32,
                signed: false,
            },
            "long" | "long int" | "signed long" | "signed long int" | "long long"
            | "long long int" | "signed long long" | "int64_t" => CType::Int {
                width: IntWidth::W64,
                signed: true,
            },
            "unsigned long" | "unsigned long int" | "unsigned long long"
            | "unsigned long long int" | "uint64_t" | "size_t" => CType::Int {
                width: IntWidth::W64,
                signed: false,
            },

            "float" => CType::Float { double: false },
            "double" | "long double" => CType::Float { double: true },

            other => CType::Named(other.to_string()),
        }
    }

    /// Check if this is a pointer type.
    pub fn is_pointer(&self) -> bool {
        matches!(self, CType::Pointer(_) | CType::OpaquePointer(_))
    }

    /// Check if this is the void type.
    pub fn is_void(&self) -> bool {
        matches!(self, CType::Void)
    }

    /// Strip const qualifiers from the outer level.
    pub fn strip_const(&self) -> &CType {
        match self {
            CType::Const(inner) => inner.strip_const(),
            other => other,
        }
    }

    /// Whether this is a read-only string argument (`const char *` in any
    /// const placement).
    pub fn is_readonly_string(&self) -> bool {
        let is_char = |t: &CType| {
            matches!(
                t.strip_const(),
                CType::Int {
                    width: IntWidth::W8,
                    ..
                }
            )
        };
        match self.strip_const() {
            CType::Pointer(inner) => is_char(inner) && matches!(self, CType::Const(_)),
            _ => false,
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CType::Void => write!(f, "void"),
            CType::Int { width, signed } => {
                let spelling = match (width, signed) {
                    (IntWidth::W8, true) => "char",
                    (IntWidth::W8, false) => "unsigned char",
                    (IntWidth::W16, true) => "short",
                    (IntWidth::W16, false) => "unsigned short",
                    (IntWidth::W32, true) => "int",
                    (IntWidth::W32, false) => "unsigned int",
                    (IntWidth::W64, true) => "long long",
                    (IntWidth::W64, false) => "unsigned long long",
                };
                write!(f, "{spelling}")
            }
            CType::Float { double: false } => write!(f, "float"),
            CType::Float { double: true } => write!(f, "double"),
            CType::Pointer(inner) => write!(f, "{inner} *"),
            CType::OpaquePointer(tag) => write!(f, "{tag} *"),
            CType::Const(inner) => write!(f, "const {inner}"),
            CType::Named(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> CType {
        CType::parse(s, &OpaqueRegistry::new())
    }

    #[test]
    fn test_parse_primitives() {
        assert_eq!(parse("void"), CType::Void);
        assert_eq!(
            parse("int"),
            CType::Int {
                width: IntWidth::W32,
                signed: true
            }
        );
        assert_eq!(
            parse("unsigned int"),
            CType::Int {
                width: IntWidth::W32,
                signed: false
            }
        );
        assert_eq!(
            parse("long long"),
            CType::Int {
                width: IntWidth::W64,
                signed: true
            }
        );
        assert_eq!(parse("double"), CType::Float { double: true });
    }

    #[test]
    fn test_parse_fixed_width() {
        assert_eq!(
            parse("uint32_t"),
            CType::Int {
                width: IntWidth::W32,
                signed: false
            }
        );
        assert_eq!(
            parse("int8_t"),
            CType::Int {
                width: IntWidth::W8,
                signed: true
            }
        );
    }

    #[test]
    fn test_parse_string_pointer_normalizes_const() {
        let expected = CType::Const(Box::new(CType::Pointer(Box::new(CType::Int {
            width: IntWidth::W8,
            signed: true,
        }))));
        assert_eq!(parse("const char *"), expected);
        assert_eq!(parse("char const *"), expected);
        assert_eq!(parse("const char*"), expected);
        assert!(parse("const char *").is_readonly_string());
    }

    #[test]
    fn test_parse_opaque_pointer() {
        let mut opaques = OpaqueRegistry::new();
        opaques.register("db_conn");

        assert_eq!(
            CType::parse("db_conn *", &opaques),
            CType::OpaquePointer("db_conn".to_string())
        );
        assert_eq!(
            CType::parse("struct db_conn *", &opaques),
            CType::OpaquePointer("db_conn".to_string())
        );
        // Unregistered tags stay Named so mapping can reject them.
        assert_eq!(
            CType::parse("widget *", &opaques),
            CType::Pointer(Box::new(CType::Named("widget".to_string())))
        );
    }

    #[test]
    fn test_parse_const_opaque_pointer() {
        let mut opaques = OpaqueRegistry::new();
        opaques.register("db_conn");

        assert_eq!(
            CType::parse("const db_conn *", &opaques),
            CType::Const(Box::new(CType::OpaquePointer("db_conn".to_string())))
        );
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(parse("int").to_string(), "int");
        assert_eq!(parse("unsigned long long").to_string(), "unsigned long long");
        assert_eq!(parse("const char *").to_string(), "const char *");
        assert_eq!(
            CType::OpaquePointer("handle".to_string()).to_string(),
            "handle *"
        );
    }

    #[test]
    fn test_unknown_spelling_stays_named() {
        assert_eq!(parse("FILE"), CType::Named("FILE".to_string()));
        assert_eq!(
            parse("int * *"),
            CType::Pointer(Box::new(CType::Pointer(Box::new(CType::Int {
                width: IntWidth::W32,
                signed: true
            }))))
        );
    }
}
