//! Replaces the running process with the downstream linter.
//!
//! On Unix this is an in-place `exec`: the pid, argv and environment carry
//! over, and whoever launched the gate only ever observes the linter. Other
//! platforms fall back to running the linter with inherited stdio and exiting
//! with its status.

use miette::Diagnostic;
use std::convert::Infallible;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Failure to hand off to the linter.
#[derive(Debug, Error, Diagnostic)]
pub enum HandoffError {
    /// The argument vector had no program name at index 0.
    #[error("cannot hand off with an empty argument vector")]
    #[diagnostic(code(lint_gate::handoff::empty_argv))]
    EmptyArgv,

    /// The linter could not be executed.
    #[error("failed to exec {}: {source}", .linter.display())]
    #[diagnostic(
        code(lint_gate::handoff::exec),
        help("install golangci-lint or point [linter].path at it")
    )]
    Exec {
        /// Linter binary path.
        linter: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Hands control to `linter`, passing `argv` and `env` through untouched.
///
/// `argv[0]` is kept as the process name the linter sees. Only returns if
/// the handoff failed.
///
/// # Errors
///
/// Returns [`HandoffError`] when `argv` is empty or the linter cannot be
/// executed.
pub fn handoff<I>(linter: &Path, argv: &[OsString], env: I) -> Result<Infallible, HandoffError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let (arg0, args) = argv.split_first().ok_or(HandoffError::EmptyArgv)?;

    let mut cmd = Command::new(linter);
    cmd.args(args).env_clear().envs(env);

    tracing::debug!("Handing off to {} with {} argument(s)", linter.display(), args.len());
    replace(cmd, arg0).map_err(|source| HandoffError::Exec {
        linter: linter.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn replace(mut cmd: Command, arg0: &OsString) -> std::io::Result<Infallible> {
    use std::os::unix::process::CommandExt;

    cmd.arg0(arg0);
    Err(cmd.exec())
}

#[cfg(not(unix))]
fn replace(mut cmd: Command, _arg0: &OsString) -> std::io::Result<Infallible> {
    let status = cmd.status()?;
    std::process::exit(status.code().unwrap_or(crate::TOOL_FAILURE_EXIT_CODE));
}
