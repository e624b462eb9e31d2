//! Binding generation driver.
//!
//! Runs parse -> map -> emit across every declaration of every header,
//! collecting one [`BindingUnit`] or one [`Diagnostic`] per declaration. A
//! failing declaration never aborts the run: adapters for the declarations
//! that succeed are still written, and the run as a whole fails iff at
//! least one diagnostic was produced.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use miette::Diagnostic as MietteDiagnostic;
use rayon::prelude::*;

use crate::core::decl::{Declaration, FunctionDecl};
use crate::core::registry::OpaqueRegistry;
use crate::emitter::{AdapterEmitter, BindingUnit, EmitError};
use crate::mapper::TypeMapper;
use crate::parser::HeaderParser;
use crate::util::diagnostic::Diagnostic;
use crate::util::fs;

/// Options for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Output directory for generated sources.
    pub output_dir: PathBuf,

    /// Explicit adapter symbol prefix. Overrides the derived default.
    pub prefix: Option<String>,

    /// Library name used to derive the default prefix (`gw_<lib_name>`).
    /// Defaults to each header's file stem.
    pub lib_name: Option<String>,

    /// Also dump the parsed declarations as JSON next to the generated
    /// source.
    pub emit_decls: bool,

    /// Parse and map only: report diagnostics, write nothing.
    pub dry_run: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            output_dir: PathBuf::from("generated"),
            prefix: None,
            lib_name: None,
            emit_decls: false,
            dry_run: false,
        }
    }
}

impl GenerateOptions {
    /// The adapter symbol prefix used for a header with the given stem.
    pub fn effective_prefix(&self, stem: &str) -> String {
        if let Some(ref prefix) = self.prefix {
            return prefix.clone();
        }
        let lib = self.lib_name.as_deref().unwrap_or(stem);
        format!("gw_{lib}")
    }
}

/// The bound result of one header.
#[derive(Debug)]
pub struct BoundHeader {
    /// Declarations in source order (functions and opaque handles).
    pub decls: Vec<Declaration>,

    /// Binding units for the declarations that adapted, in source order.
    pub units: Vec<BindingUnit>,

    /// One diagnostic per failed declaration/statement, in source order.
    pub diagnostics: Vec<Diagnostic>,

    /// Assembled adapter source; `None` when no declaration adapted.
    pub source: Option<String>,
}

/// Per-header outcome of a run, including where output was written.
#[derive(Debug)]
pub struct HeaderOutcome {
    /// The header that was processed.
    pub header: PathBuf,

    /// The bound result.
    pub binding: BoundHeader,

    /// Path of the generated adapter source, if one was written.
    pub generated: Option<PathBuf>,
}

/// The full result set of a run.
#[derive(Debug, Default)]
pub struct GenerateResult {
    /// One outcome per processed header, in input order.
    pub headers: Vec<HeaderOutcome>,
}

impl GenerateResult {
    /// Total diagnostics across all headers.
    pub fn diagnostic_count(&self) -> usize {
        self.headers
            .iter()
            .map(|h| h.binding.diagnostics.len())
            .sum()
    }

    /// Total adapters emitted across all headers.
    pub fn unit_count(&self) -> usize {
        self.headers.iter().map(|h| h.binding.units.len()).sum()
    }

    /// A run succeeds iff no declaration-level error occurred.
    pub fn is_success(&self) -> bool {
        self.diagnostic_count() == 0
    }
}

/// Run the full pipeline over a set of headers.
///
/// Headers are processed in input order and share one opaque handle
/// registry, so a handle registered in an earlier header is usable from a
/// later one.
pub fn generate(headers: &[PathBuf], opts: &GenerateOptions) -> Result<GenerateResult> {
    let mut registry = OpaqueRegistry::new();
    let mut result = GenerateResult::default();

    for header in headers {
        let text = fs::read_to_string(header)?;
        let file_name = header
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("not a header file: {}", header.display()))?;
        let stem = header
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());
        let prefix = opts.effective_prefix(&stem);

        tracing::debug!("binding {} with prefix {}", header.display(), prefix);
        let binding = bind_header(&text, &file_name, &prefix, &mut registry);

        let mut generated = None;
        if !opts.dry_run {
            if let Some(ref source) = binding.source {
                let out_path = opts.output_dir.join(format!("{stem}_adapters.c"));
                fs::write_file(&out_path, source)?;
                generated = Some(out_path);
            }
            if opts.emit_decls {
                let decls_path = opts.output_dir.join(format!("{stem}_decls.json"));
                let json = serde_json::to_string_pretty(&binding.decls)
                    .context("failed to serialize declarations")?;
                fs::write_file(&decls_path, &json)?;
            }
        }

        result.headers.push(HeaderOutcome {
            header: header.clone(),
            binding,
            generated,
        });
    }

    Ok(result)
}

/// Parse and map a set of headers without writing output.
pub fn check(headers: &[PathBuf]) -> Result<GenerateResult> {
    let opts = GenerateOptions {
        dry_run: true,
        ..Default::default()
    };
    generate(headers, &opts)
}

/// Bind one header's text: parse, map, and emit every declaration.
///
/// Opaque handles registered here stay in `registry` for subsequent headers
/// in the same run.
pub fn bind_header(
    text: &str,
    header_file: &str,
    prefix: &str,
    registry: &mut OpaqueRegistry,
) -> BoundHeader {
    let parser = HeaderParser::new();
    let outcome = parser.parse(text, registry);
    let mut diagnostics = outcome.diagnostics;

    let emitter = AdapterEmitter::new(header_file);

    // Adapter symbols are assigned serially in source order: duplicate
    // detection is order-dependent, the later declaration loses.
    let mut seen = HashSet::new();
    let mut jobs: Vec<(&FunctionDecl, String)> = Vec::new();
    for decl in &outcome.decls {
        let Declaration::Function(func) = decl else {
            continue;
        };
        let symbol = AdapterEmitter::adapter_symbol(prefix, &func.name);
        if !seen.insert(symbol.clone()) {
            let err = EmitError::DuplicateSymbol(symbol);
            diagnostics.push(declaration_diagnostic(&err, func));
            continue;
        }
        jobs.push((func, symbol));
    }

    // Registry is frozen from here on; map and emit are data-parallel per
    // declaration. The indexed collect puts results back in source order.
    let mapper = TypeMapper::new(registry);
    let results: Vec<Result<BindingUnit, Diagnostic>> = jobs
        .par_iter()
        .map(|(func, symbol)| {
            mapper
                .map_function(func)
                .map(|mapped| emitter.emit_function(&mapped, symbol))
                .map_err(|err| declaration_diagnostic(&err, func))
        })
        .collect();

    let mut units = Vec::new();
    for result in results {
        match result {
            Ok(unit) => units.push(unit),
            Err(diag) => diagnostics.push(diag),
        }
    }
    diagnostics.sort_by_key(|d| d.line.unwrap_or(0));

    let source = (!units.is_empty()).then(|| emitter.assemble(&units));

    BoundHeader {
        decls: outcome.decls,
        units,
        diagnostics,
        source,
    }
}

/// Build a per-declaration diagnostic from a typed error, carrying the line,
/// declaration name, and any help the error provides.
fn declaration_diagnostic<E>(err: &E, func: &FunctionDecl) -> Diagnostic
where
    E: std::error::Error + MietteDiagnostic,
{
    let mut diag = Diagnostic::error(format!("cannot adapt `{}`: {}", func.name, err))
        .with_line(func.line)
        .with_snippet(func.name.as_str());
    if let Some(help) = err.help() {
        diag = diag.with_suggestion(help.to_string());
    }
    diag
}
