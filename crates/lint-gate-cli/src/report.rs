//! Output for the two failure verdicts.
//!
//! Diagnostics go to stdout so they read exactly like linter findings;
//! toolchain failures go to stderr, raw output first and untouched.

use anyhow::Result;
use lint_gate_core::{DiagnosticLine, ToolError};
use std::io::Write;

/// Prints normalized diagnostics, one per line.
pub fn diagnostics(out: &mut impl Write, lines: &[DiagnosticLine]) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

/// Reports a toolchain failure: captured output verbatim, then the error.
pub fn tool_failure(err: &mut impl Write, stage: &str, error: ToolError) -> Result<()> {
    if let Some(raw) = error.output() {
        err.write_all(raw)?;
    }
    let report = miette::Report::new(error).wrap_err(format!("stage `{stage}` failed"));
    writeln!(err, "{report:?}")?;
    err.flush()?;
    Ok(())
}
