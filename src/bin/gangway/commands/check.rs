//! `gangway check` command
//!
//! Parses and type-checks headers, reporting diagnostics without writing
//! any output.

use anyhow::{bail, Result};

use gangway::ops;
use gangway::util::diagnostic;

use crate::cli::CheckArgs;

pub fn execute(args: CheckArgs) -> Result<()> {
    let headers = super::expand_header_patterns(&args.headers)?;

    let result = ops::check(&headers)?;

    for outcome in &result.headers {
        let name = outcome
            .header
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        println!(
            "  {}: {} declaration(s), {} problem(s)",
            name,
            outcome.binding.decls.len(),
            outcome.binding.diagnostics.len()
        );

        for diag in &outcome.binding.diagnostics {
            diagnostic::emit(diag, false);
        }
    }

    let failed = result.diagnostic_count();
    if failed > 0 {
        bail!("{} declaration(s) could not be adapted", failed);
    }

    println!("All declarations adapt cleanly.");
    Ok(())
}
