//! `gangway generate` command
//!
//! Runs the full parse -> map -> emit pipeline and writes the generated
//! adapter sources.

use anyhow::{bail, Result};

use gangway::ops::{self, GenerateOptions};
use gangway::util::config::Config;
use gangway::util::diagnostic;

use crate::cli::GenerateArgs;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let headers = super::expand_header_patterns(&args.headers)?;

    // Config file values act as defaults; flags win.
    let cwd = std::env::current_dir()?;
    let config = Config::discover(&cwd)?;

    let opts = GenerateOptions {
        output_dir: args
            .output
            .or(config.generate.output_dir)
            .unwrap_or_else(|| "generated".into()),
        prefix: args.prefix.or(config.generate.prefix),
        lib_name: args.lib_name.or(config.generate.lib_name),
        emit_decls: args.emit_decls,
        dry_run: false,
    };

    println!("Parsing {} header file(s):", headers.len());
    for h in &headers {
        println!("  - {}", h.display());
    }
    println!();

    let result = ops::generate(&headers, &opts)?;

    for outcome in &result.headers {
        let name = outcome
            .header
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        let functions = outcome
            .binding
            .decls
            .iter()
            .filter(|d| matches!(d, gangway::Declaration::Function(_)))
            .count();
        let handles = outcome.binding.decls.len() - functions;
        println!(
            "  {}: {} function(s), {} opaque handle(s), {} adapter(s) emitted",
            name,
            functions,
            handles,
            outcome.binding.units.len()
        );
        if let Some(ref path) = outcome.generated {
            println!("    -> {}", path.display());
        }

        for diag in &outcome.binding.diagnostics {
            diagnostic::emit(diag, false);
        }
    }
    println!();

    let failed = result.diagnostic_count();
    if failed > 0 {
        bail!(
            "{} declaration(s) could not be adapted ({} adapter(s) still emitted)",
            failed,
            result.unit_count()
        );
    }

    println!("Generated {} adapter(s).", result.unit_count());
    Ok(())
}
