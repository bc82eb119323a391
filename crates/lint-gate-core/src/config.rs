//! Configuration types for lint-gate.

use crate::gate::Stage;
use crate::runner::{ExitClassifier, Invocation};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Where compiled binaries are sent; only the compile result matters.
#[cfg(windows)]
const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
const NULL_DEVICE: &str = "/dev/null";

/// Top-level configuration for lint-gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Compiler toolchain settings.
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Downstream linter settings.
    #[serde(default)]
    pub linter: LinterConfig,

    /// Compile stages, run in order.
    #[serde(default = "default_stages")]
    pub stages: Vec<StageConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toolchain: ToolchainConfig::default(),
            linter: LinterConfig::default(),
            stages: default_stages(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.toolchain.program.trim().is_empty() {
            return Err(ConfigError::invalid("toolchain.program must not be empty"));
        }
        if self.toolchain.diagnostic_exit_codes.contains(&0) {
            return Err(ConfigError::invalid(
                "toolchain.diagnostic_exit_codes must not contain 0",
            ));
        }
        if self.stages.is_empty() {
            return Err(ConfigError::invalid("at least one stage is required"));
        }
        for (i, stage) in self.stages.iter().enumerate() {
            if stage.name.trim().is_empty() {
                return Err(ConfigError::invalid(format!("stages[{i}].name must not be empty")));
            }
            if stage.mode.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "stages[{i}] `{}`: mode must not be empty",
                    stage.name
                )));
            }
        }
        Ok(())
    }

    /// Builds the gate stages for a resolved toolchain binary and target.
    #[must_use]
    pub fn stages_for(&self, program: &Path, target: &OsStr) -> Vec<Stage> {
        self.stages
            .iter()
            .map(|stage| stage.to_stage(program, target))
            .collect()
    }
}

/// Compiler toolchain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Program name or path, resolved on `PATH` (default: "go").
    #[serde(default = "default_program")]
    pub program: String,

    /// Exit codes meaning "the source failed to compile" (default: 1, 2).
    #[serde(default = "default_diagnostic_exit_codes")]
    pub diagnostic_exit_codes: Vec<i32>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            diagnostic_exit_codes: default_diagnostic_exit_codes(),
        }
    }
}

impl ToolchainConfig {
    /// Exit-code classifier for this toolchain.
    #[must_use]
    pub fn classifier(&self) -> ExitClassifier {
        ExitClassifier::new(self.diagnostic_exit_codes.iter().copied())
    }
}

/// Downstream linter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Explicit linter binary path. When unset, the linter is looked up in
    /// `$GOPATH/bin`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// One compile stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Stage name for logs and reports.
    pub name: String,

    /// Toolchain subcommand (e.g. "build", "test").
    pub mode: String,

    /// Flags placed between the mode and the target.
    #[serde(default)]
    pub flags: Vec<String>,
}

impl StageConfig {
    /// Creates a stage configuration.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, mode: impl Into<String>, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            mode: mode.into(),
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    fn to_stage(&self, program: &Path, target: &OsStr) -> Stage {
        let invocation =
            Invocation::new(program, self.mode.clone(), target).flags(self.flags.clone());
        Stage::new(self.name.clone(), invocation)
    }
}

fn default_program() -> String {
    "go".to_string()
}

fn default_diagnostic_exit_codes() -> Vec<i32> {
    vec![1, 2]
}

fn default_stages() -> Vec<StageConfig> {
    vec![
        StageConfig::new("build", "build", ["-o", NULL_DEVICE]),
        StageConfig::new("test", "test", ["-c", "-o", NULL_DEVICE]),
    ]
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(lint_gate::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(lint_gate::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Well-formed config with an invalid value.
    #[error("Invalid config: {message}")]
    #[diagnostic(code(lint_gate::config::invalid))]
    Invalid {
        /// What is wrong.
        message: String,
    },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
