//! Adapter source emission.
//!
//! Turns a mapped function into the C source of one adapter: a new symbol
//! with the target representation's signature whose body converts each
//! argument, delegates to the original symbol, and converts the result back.
//! The emitter never reimplements library behavior; every adapter is a
//! single delegating call.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::mapper::{Conversion, MappedFunction};

/// Errors produced while emitting adapters.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum EmitError {
    /// Two declarations would emit the same adapter symbol. Fatal to the
    /// later declaration only.
    #[error("duplicate adapter symbol `{0}`")]
    #[diagnostic(
        code(gangway::emit::duplicate_symbol),
        help("rename one of the declarations or pick a distinct --prefix")
    )]
    DuplicateSymbol(String),
}

/// The emission result for one declaration.
#[derive(Debug, Clone)]
pub struct BindingUnit {
    /// Generated adapter source text.
    pub source: String,

    /// The adapter symbol the host FFI declaration should bind to.
    pub adapter_symbol: String,

    /// The original library symbol the adapter delegates to.
    pub original_symbol: String,

    /// 1-based source line of the originating declaration.
    pub line: u32,
}

/// Emits adapter functions for one header.
#[derive(Debug)]
pub struct AdapterEmitter {
    /// File name of the header being adapted, used in the generated include.
    header_file: String,
}

impl AdapterEmitter {
    /// Create an emitter for the named header file.
    pub fn new(header_file: impl Into<String>) -> Self {
        AdapterEmitter {
            header_file: header_file.into(),
        }
    }

    /// The adapter symbol for an original symbol under a prefix.
    ///
    /// Deterministic: the host-side extern declaration relies on this exact
    /// naming convention.
    pub fn adapter_symbol(prefix: &str, original: &str) -> String {
        format!("{prefix}_{original}")
    }

    /// Emit the adapter for one mapped function.
    pub fn emit_function(&self, func: &MappedFunction, symbol: &str) -> BindingUnit {
        let params = if func.params.is_empty() {
            "void".to_string()
        } else {
            func.params
                .iter()
                .map(|p| join_type_and_name(&p.mapping.ffi_type, &p.name))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let args = func
            .params
            .iter()
            .map(|p| p.mapping.argument(&p.name, &p.ctype))
            .collect::<Vec<_>>()
            .join(", ");
        let call = format!("{}({})", func.name, args);

        let (ret_type, body) = match &func.ret {
            None => ("void".to_string(), format!("    {call};")),
            Some((_, mapping)) => {
                let body = match mapping.conversion {
                    Conversion::Identity => format!("    return {call};"),
                    Conversion::Cast => format!("    return ({}){};", mapping.ffi_type, call),
                };
                (mapping.ffi_type.clone(), body)
            }
        };

        let signature = join_type_and_name(&ret_type, symbol);
        let source = format!("{signature}({params}) {{\n{body}\n}}\n");

        BindingUnit {
            source,
            adapter_symbol: symbol.to_string(),
            original_symbol: func.name.clone(),
            line: func.line,
        }
    }

    /// Assemble the generated file from the units of one header.
    ///
    /// Units must already be in source order; assembly only concatenates.
    pub fn assemble(&self, units: &[BindingUnit]) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "/* Adapters for {} -- generated by gangway; do not edit. */\n",
            self.header_file
        ));
        out.push('\n');
        out.push_str("#include <stdint.h>\n");
        out.push('\n');
        out.push_str(&format!("#include \"{}\"\n", self.header_file));

        for unit in units {
            out.push('\n');
            out.push_str(&unit.source);
        }

        out
    }
}

/// `uint32_t x` but `const char *x`; pointer types absorb the separator.
fn join_type_and_name(ffi_type: &str, name: &str) -> String {
    if ffi_type.ends_with('*') {
        format!("{ffi_type}{name}")
    } else {
        format!("{ffi_type} {name}")
    }
}
