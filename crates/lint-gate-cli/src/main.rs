//! lint-gate CLI tool.
//!
//! Drop-in front for `golangci-lint`: compiles the target (and its tests)
//! first, and only execs the real linter when everything builds.
//!
//! Usage:
//! ```bash
//! lint-gate run ./...
//! ```
//!
//! Every argument is forwarded to the linter untouched; the last one is
//! also used as the build target. Settings come from `lint-gate.toml` or
//! the `LINT_GATE_*` environment variables, never from flags.

use anyhow::{Context, Result};
use clap::Parser;
use lint_gate_core::{
    handoff, Decision, Gate, ProcessRunner, LINT_FAILURE_EXIT_CODE, TOOL_FAILURE_EXIT_CODE,
};
use std::ffi::OsString;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod config_resolver;
mod locate;
mod report;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "LINT_GATE_LOG";

/// Compile-before-lint gate for golangci-lint
///
/// A `--` is consumed by clap as the end-of-options marker and never
/// becomes the target, so `lint-gate --` is a usage error. It is still
/// forwarded to the linter when other arguments follow it.
#[derive(Parser)]
#[command(name = "lint-gate")]
#[command(
    disable_help_flag = true,
    disable_version_flag = true,
    about,
    long_about = None
)]
struct Cli {
    /// Linter arguments; the last one is the build target
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "LINTER_ARGS"
    )]
    args: Vec<OsString>,
}

impl Cli {
    fn target(&self) -> Result<&OsString> {
        self.args
            .last()
            .filter(|t| !t.is_empty())
            .context("missing build target: the last argument must name a package or directory")
    }
}

fn main() -> ExitCode {
    init_tracing();

    // Parsed only to find the target; the original argv is what gets forwarded.
    let argv: Vec<OsString> = std::env::args_os().collect();
    let cli = match Cli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            eprint!("{e}");
            return exit_code(TOOL_FAILURE_EXIT_CODE);
        }
    };

    match run(&cli, &argv) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("lint-gate: {e:#}");
            exit_code(TOOL_FAILURE_EXIT_CODE)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the gate and acts on its decision. Returns only when the process
/// should exit; on success control passes to the linter instead.
fn run(cli: &Cli, argv: &[OsString]) -> Result<ExitCode> {
    let target = cli.target()?;

    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let config = config_resolver::resolve(&cwd).load()?;

    let toolchain = locate::toolchain(&config.toolchain.program)?;
    let runner = ProcessRunner::new(config.toolchain.classifier());
    let gate = Gate::new(runner, config.stages_for(&toolchain, target));

    match gate.run() {
        Decision::Proceed => {
            let linter = locate::linter(config.linter.path.as_deref())?;
            tracing::info!("Build passed, handing off to {}", linter.display());
            let err = match handoff(&linter, argv, std::env::vars_os()) {
                Ok(never) => match never {},
                Err(err) => err,
            };
            Err(anyhow::Error::new(err))
        }
        Decision::LintFailure(lines) => {
            report::diagnostics(&mut std::io::stdout().lock(), &lines)?;
            Ok(exit_code(LINT_FAILURE_EXIT_CODE))
        }
        Decision::ToolFailure { stage, error } => {
            report::tool_failure(&mut std::io::stderr().lock(), &stage, error)?;
            Ok(exit_code(TOOL_FAILURE_EXIT_CODE))
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
