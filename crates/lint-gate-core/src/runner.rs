//! Runs one compile check and classifies how it ended.

use crate::normalize::normalize;
use crate::outcome::{Outcome, ToolError};

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// One toolchain command line: `program mode flags... target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    mode: String,
    flags: Vec<String>,
    target: OsString,
}

impl Invocation {
    /// Creates an invocation with no extra flags.
    #[must_use]
    pub fn new(
        program: impl Into<PathBuf>,
        mode: impl Into<String>,
        target: impl Into<OsString>,
    ) -> Self {
        Self {
            program: program.into(),
            mode: mode.into(),
            flags: Vec::new(),
            target: target.into(),
        }
    }

    /// Appends extra flags, placed between the mode and the target.
    #[must_use]
    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Path of the toolchain binary.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Subcommand token, e.g. `build` or `test`.
    #[must_use]
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Target path or package pattern.
    #[must_use]
    pub fn target(&self) -> &OsStr {
        &self.target
    }

    /// Full argument list passed to the program.
    #[must_use]
    pub fn args(&self) -> Vec<&OsStr> {
        let mut args = Vec::with_capacity(self.flags.len() + 2);
        args.push(OsStr::new(&self.mode));
        args.extend(self.flags.iter().map(OsStr::new));
        args.push(self.target.as_os_str());
        args
    }
}

/// Runs compile checks.
///
/// [`ProcessRunner`] is the real implementation; the gate only depends on
/// this trait so it can be driven by scripted runners in tests.
pub trait BuildRunner {
    /// Runs one invocation to completion and classifies it.
    fn run(&self, invocation: &Invocation) -> Outcome;
}

impl<R: BuildRunner + ?Sized> BuildRunner for &R {
    fn run(&self, invocation: &Invocation) -> Outcome {
        (**self).run(invocation)
    }
}

/// Maps a child's exit status onto an [`Outcome`].
///
/// Exit code 0 is always success. Codes in the diagnostic set mean the
/// source failed to compile; everything else, including death by signal,
/// is a toolchain failure. The Go toolchain uses 1 and 2 for compile
/// failures, which is the default set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitClassifier {
    diagnostic_codes: Vec<i32>,
}

impl Default for ExitClassifier {
    fn default() -> Self {
        Self {
            diagnostic_codes: vec![1, 2],
        }
    }
}

impl ExitClassifier {
    /// Creates a classifier with a custom diagnostic exit-code set.
    ///
    /// Code 0 is ignored if present; it always means success.
    #[must_use]
    pub fn new(diagnostic_codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            diagnostic_codes: diagnostic_codes.into_iter().filter(|c| *c != 0).collect(),
        }
    }

    /// Exit codes treated as compile diagnostics.
    #[must_use]
    pub fn diagnostic_codes(&self) -> &[i32] {
        &self.diagnostic_codes
    }

    /// Classifies a finished child from its exit code and combined output.
    #[must_use]
    pub fn classify(&self, program: &Path, code: Option<i32>, output: Vec<u8>) -> Outcome {
        match code {
            Some(0) => Outcome::Success,
            Some(c) if self.diagnostic_codes.contains(&c) => {
                Outcome::DiagnosticFailure(normalize(&output))
            }
            code => Outcome::ToolError(ToolError::UnexpectedExit {
                program: program.to_path_buf(),
                code,
                output,
            }),
        }
    }
}

/// Runs the toolchain as a child process, capturing stdout and stderr.
///
/// The two streams are captured separately and classified as one buffer,
/// stdout first. Writes are not interleaved in emission order; the Go
/// toolchain sends its compile diagnostics to stderr only.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    classifier: ExitClassifier,
}

impl ProcessRunner {
    /// Creates a runner using the given exit-code classification.
    #[must_use]
    pub fn new(classifier: ExitClassifier) -> Self {
        Self { classifier }
    }
}

impl BuildRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Outcome {
        let program = invocation.program();
        debug!("Running {} {:?}", program.display(), invocation.args());

        let output = match Command::new(program).args(invocation.args()).output() {
            Ok(output) => output,
            Err(source) => {
                debug!("Failed to spawn {}: {}", program.display(), source);
                return Outcome::ToolError(ToolError::Spawn {
                    program: program.to_path_buf(),
                    source,
                });
            }
        };

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        let code = output.status.code();
        debug!(
            "{} {} finished with {:?} ({} bytes of output)",
            program.display(),
            invocation.mode(),
            code,
            combined.len()
        );

        self.classifier.classify(program, code, combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_place_flags_between_mode_and_target() {
        let inv = Invocation::new("/usr/bin/go", "build", "./...").flags(["-o", "/dev/null"]);
        assert_eq!(inv.args(), vec!["build", "-o", "/dev/null", "./..."]);
    }

    #[test]
    fn args_without_flags() {
        let inv = Invocation::new("go", "test", "pkg");
        assert_eq!(inv.args(), vec!["test", "pkg"]);
    }

    #[test]
    fn exit_zero_is_success_regardless_of_output() {
        let outcome = ExitClassifier::default().classify(
            Path::new("go"),
            Some(0),
            b"./a.go:1:1: looks like an error\n".to_vec(),
        );
        assert!(outcome.is_success());
    }

    #[test]
    fn exit_one_and_two_are_diagnostics() {
        let classifier = ExitClassifier::default();
        for code in [1, 2] {
            let outcome = classifier.classify(
                Path::new("go"),
                Some(code),
                b"# pkg\n./a.go:1:1: undefined: x\n".to_vec(),
            );
            match outcome {
                Outcome::DiagnosticFailure(lines) => {
                    assert_eq!(lines, vec!["a.go:1:1: undefined: x"]);
                }
                other => panic!("exit {code}: expected diagnostic failure, got {other:?}"),
            }
        }
    }

    #[test]
    fn other_codes_are_tool_errors_with_raw_output() {
        let raw = b"# pkg\n./a.go:1:1: not normalized\n".to_vec();
        let outcome = ExitClassifier::default().classify(Path::new("go"), Some(3), raw.clone());
        match outcome {
            Outcome::ToolError(err) => assert_eq!(err.output(), Some(raw.as_slice())),
            other => panic!("expected tool error, got {other:?}"),
        }
    }

    #[test]
    fn signal_is_tool_error() {
        let outcome = ExitClassifier::default().classify(Path::new("go"), None, Vec::new());
        assert!(matches!(
            outcome,
            Outcome::ToolError(ToolError::UnexpectedExit { code: None, .. })
        ));
    }

    #[test]
    fn custom_classifier_ignores_zero() {
        let classifier = ExitClassifier::new([0, 1]);
        assert_eq!(classifier.diagnostic_codes(), &[1]);
        let outcome = classifier.classify(Path::new("go"), Some(2), Vec::new());
        assert!(matches!(outcome, Outcome::ToolError(_)));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let runner = ProcessRunner::default();
        let inv = Invocation::new("/nonexistent/lint-gate-toolchain", "build", ".");
        assert!(matches!(
            runner.run(&inv),
            Outcome::ToolError(ToolError::Spawn { .. })
        ));
    }
}
