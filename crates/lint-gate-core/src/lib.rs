//! # lint-gate-core
//!
//! Core pipeline for gating a linter behind a successful compile.
//!
//! The crate is split along the three stages of a gate run:
//!
//! - [`normalize()`] turns raw toolchain diagnostics into linter-shaped lines
//! - [`BuildRunner`] / [`ProcessRunner`] run one compile check and classify it
//!   into an [`Outcome`]
//! - [`Gate`] runs the configured stages and returns a [`Decision`]
//! - [`handoff()`] replaces the current process with the downstream linter
//!
//! ## Example
//!
//! ```ignore
//! use lint_gate_core::{Config, Decision, Gate, ProcessRunner};
//!
//! let config = Config::default();
//! let runner = ProcessRunner::new(config.toolchain.classifier());
//! let gate = Gate::new(runner, config.stages_for(&go_bin, "./..."));
//!
//! match gate.run() {
//!     Decision::Proceed => { /* hand off to the linter */ }
//!     Decision::LintFailure(lines) => { /* print lines, exit 1 */ }
//!     Decision::ToolFailure { .. } => { /* report, exit 2 */ }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gate;
mod handoff;
mod normalize;
mod outcome;
mod runner;

pub use config::{Config, ConfigError, LinterConfig, StageConfig, ToolchainConfig};
pub use gate::{Decision, Gate, Stage, LINT_FAILURE_EXIT_CODE, TOOL_FAILURE_EXIT_CODE};
pub use handoff::{handoff, HandoffError};
pub use normalize::normalize;
pub use outcome::{DiagnosticLine, Outcome, ToolError};
pub use runner::{BuildRunner, ExitClassifier, Invocation, ProcessRunner};
