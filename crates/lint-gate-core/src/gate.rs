//! Runs the configured compile stages and decides whether the linter may run.

use crate::outcome::{DiagnosticLine, Outcome, ToolError};
use crate::runner::{BuildRunner, Invocation};

use tracing::{debug, info};

/// Process exit code when compile diagnostics were reported.
pub const LINT_FAILURE_EXIT_CODE: i32 = 1;

/// Process exit code for infrastructure failures.
pub const TOOL_FAILURE_EXIT_CODE: i32 = 2;

/// A named compile check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Stage name used in logs and error reports (e.g. "build", "test").
    pub name: String,
    /// Command line to run.
    pub invocation: Invocation,
}

impl Stage {
    /// Creates a new stage.
    #[must_use]
    pub fn new(name: impl Into<String>, invocation: Invocation) -> Self {
        Self {
            name: name.into(),
            invocation,
        }
    }
}

/// Terminal verdict of a gate run.
///
/// The gate never exits the process itself; the caller acts on this value
/// exactly once.
#[derive(Debug)]
pub enum Decision {
    /// Every stage compiled; hand off to the linter.
    Proceed,
    /// At least one stage failed to compile. Lines from all failing stages,
    /// in stage order.
    LintFailure(Vec<DiagnosticLine>),
    /// A stage failed for reasons unrelated to the source.
    ToolFailure {
        /// Name of the stage that failed.
        stage: String,
        /// What went wrong.
        error: ToolError,
    },
}

impl Decision {
    /// Exit code the process should terminate with, or `None` to proceed.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Proceed => None,
            Self::LintFailure(_) => Some(LINT_FAILURE_EXIT_CODE),
            Self::ToolFailure { .. } => Some(TOOL_FAILURE_EXIT_CODE),
        }
    }
}

/// Sequential gate over a list of compile stages.
pub struct Gate<R> {
    runner: R,
    stages: Vec<Stage>,
}

impl<R: BuildRunner> Gate<R> {
    /// Creates a gate running `stages` in order with `runner`.
    #[must_use]
    pub fn new(runner: R, stages: Vec<Stage>) -> Self {
        Self { runner, stages }
    }

    /// Runs every stage and returns the verdict.
    ///
    /// A tool error stops the run immediately. Diagnostic failures are
    /// collected and the remaining stages still run, so build and test
    /// compile errors are reported together.
    pub fn run(&self) -> Decision {
        let mut diagnostics = Vec::new();
        let mut failed = false;

        for stage in &self.stages {
            info!("Compiling stage `{}`", stage.name);

            match self.runner.run(&stage.invocation) {
                Outcome::Success => debug!("Stage `{}` compiled", stage.name),
                Outcome::DiagnosticFailure(lines) => {
                    info!(
                        "Stage `{}` failed with {} diagnostic line(s)",
                        stage.name,
                        lines.len()
                    );
                    failed = true;
                    diagnostics.extend(lines);
                }
                Outcome::ToolError(error) => {
                    debug!("Stage `{}` hit a toolchain error: {}", stage.name, error);
                    return Decision::ToolFailure {
                        stage: stage.name.clone(),
                        error,
                    };
                }
            }
        }

        if failed {
            Decision::LintFailure(diagnostics)
        } else {
            Decision::Proceed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::PathBuf;

    /// Replays canned outcomes and records what was asked of it.
    struct Scripted {
        outcomes: RefCell<VecDeque<Outcome>>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<Outcome>) -> Self {
            Self {
                outcomes: RefCell::new(outcomes.into()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl BuildRunner for Scripted {
        fn run(&self, invocation: &Invocation) -> Outcome {
            self.seen.borrow_mut().push(invocation.mode().to_string());
            self.outcomes
                .borrow_mut()
                .pop_front()
                .unwrap_or(Outcome::Success)
        }
    }

    fn stages() -> Vec<Stage> {
        vec![
            Stage::new("build", Invocation::new("go", "build", ".")),
            Stage::new("test", Invocation::new("go", "test", ".")),
        ]
    }

    fn lines(texts: &[&str]) -> Vec<DiagnosticLine> {
        texts.iter().copied().map(DiagnosticLine::new).collect()
    }

    #[test]
    fn all_stages_pass_proceeds() {
        let runner = Scripted::new(vec![Outcome::Success, Outcome::Success]);
        let decision = Gate::new(&runner, stages()).run();
        assert!(matches!(decision, Decision::Proceed));
        assert_eq!(decision.exit_code(), None);
        assert_eq!(*runner.seen.borrow(), vec!["build", "test"]);
    }

    #[test]
    fn diagnostics_from_both_stages_accumulate_in_order() {
        let runner = Scripted::new(vec![
            Outcome::DiagnosticFailure(lines(&["a.go:1:1: bad"])),
            Outcome::DiagnosticFailure(lines(&["a_test.go:2:2: worse"])),
        ]);
        let decision = Gate::new(&runner, stages()).run();
        match decision {
            Decision::LintFailure(found) => {
                assert_eq!(found, vec!["a.go:1:1: bad", "a_test.go:2:2: worse"]);
            }
            other => panic!("expected lint failure, got {other:?}"),
        }
    }

    #[test]
    fn diagnostic_failure_still_runs_later_stages() {
        let runner = Scripted::new(vec![
            Outcome::DiagnosticFailure(lines(&["a.go:1:1: bad"])),
            Outcome::Success,
        ]);
        let decision = Gate::new(&runner, stages()).run();
        assert_eq!(decision.exit_code(), Some(LINT_FAILURE_EXIT_CODE));
        assert_eq!(runner.seen.borrow().len(), 2);
    }

    #[test]
    fn tool_error_short_circuits() {
        let runner = Scripted::new(vec![Outcome::ToolError(ToolError::UnexpectedExit {
            program: PathBuf::from("go"),
            code: Some(137),
            output: b"signal: killed\n".to_vec(),
        })]);
        let decision = Gate::new(&runner, stages()).run();
        match &decision {
            Decision::ToolFailure { stage, error } => {
                assert_eq!(stage, "build");
                assert_eq!(error.output(), Some(&b"signal: killed\n"[..]));
            }
            other => panic!("expected tool failure, got {other:?}"),
        }
        assert_eq!(decision.exit_code(), Some(TOOL_FAILURE_EXIT_CODE));
        assert_eq!(*runner.seen.borrow(), vec!["build"]);
    }

    #[test]
    fn tool_error_after_diagnostics_wins() {
        let runner = Scripted::new(vec![
            Outcome::DiagnosticFailure(lines(&["a.go:1:1: bad"])),
            Outcome::ToolError(ToolError::Spawn {
                program: PathBuf::from("go"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }),
        ]);
        let decision = Gate::new(&runner, stages()).run();
        assert!(matches!(decision, Decision::ToolFailure { ref stage, .. } if stage == "test"));
    }

    #[test]
    fn test_only_deployment() {
        let runner = Scripted::new(vec![Outcome::Success]);
        let only_test = vec![Stage::new("test", Invocation::new("go", "test", "."))];
        let decision = Gate::new(&runner, only_test).run();
        assert!(matches!(decision, Decision::Proceed));
        assert_eq!(*runner.seen.borrow(), vec!["test"]);
    }

    #[test]
    fn no_stages_proceeds() {
        let runner = Scripted::new(Vec::new());
        assert!(matches!(Gate::new(&runner, Vec::new()).run(), Decision::Proceed));
    }
}
