//! Classified results of a single compile check.

use miette::Diagnostic;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single normalized diagnostic line, shaped like a linter finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagnosticLine(String);

impl DiagnosticLine {
    /// Creates a line from already-normalized text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the line text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the line, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DiagnosticLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DiagnosticLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for DiagnosticLine {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Result of one compile check.
#[derive(Debug)]
pub enum Outcome {
    /// The source compiled.
    Success,
    /// The source failed to compile; carries the normalized diagnostics.
    DiagnosticFailure(Vec<DiagnosticLine>),
    /// The toolchain itself failed, independent of the source under test.
    ToolError(ToolError),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Infrastructure failure while running the toolchain.
#[derive(Debug, Error, Diagnostic)]
pub enum ToolError {
    /// The child process could not be started.
    #[error("failed to run {}: {source}", .program.display())]
    #[diagnostic(
        code(lint_gate::spawn),
        help("check that the toolchain binary exists and is executable")
    )]
    Spawn {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The child exited with a status outside the success and diagnostic sets.
    #[error("{} exited unexpectedly ({})", .program.display(), describe_exit(.code))]
    #[diagnostic(
        code(lint_gate::unexpected_exit),
        help("the toolchain failed for a reason unrelated to the source; its output is shown above")
    )]
    UnexpectedExit {
        /// Program that exited.
        program: PathBuf,
        /// Exit code, or `None` if the child was terminated by a signal.
        code: Option<i32>,
        /// Combined stdout and stderr, verbatim.
        output: Vec<u8>,
    },
}

impl ToolError {
    /// Returns the raw captured output, if the child ran at all.
    #[must_use]
    pub fn output(&self) -> Option<&[u8]> {
        match self {
            Self::Spawn { .. } => None,
            Self::UnexpectedExit { output, .. } => Some(output),
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
