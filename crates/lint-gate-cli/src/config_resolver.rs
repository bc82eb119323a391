//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `$LINT_GATE_CONFIG` (explicit path)
//! 2. `{cwd}/lint-gate.toml` or `.lint-gate.toml`
//! 3. `~/.lint-gate/config.toml` (global fallback)
//! 4. No config found → defaults
//!
//! The gate takes no flags of its own, so the explicit path comes from the
//! environment rather than the command line.

use anyhow::{Context, Result};
use lint_gate_core::Config;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "LINT_GATE_CONFIG";

/// Environment variable overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "LINT_GATE_CONFIG_DIR";

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `$LINT_GATE_CONFIG`.
    Explicit(PathBuf),
    /// Found in the working directory.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.lint-gate/`).
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the configuration this source points at.
    pub fn load(&self) -> Result<Config> {
        match self.path() {
            None => Ok(Config::default()),
            Some(p) => {
                tracing::debug!("Loading config from {}", p.display());
                Config::from_file(p)
                    .with_context(|| format!("Failed to load config: {}", p.display()))
            }
        }
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["lint-gate.toml", ".lint-gate.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path from the environment.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path) -> ConfigSource {
    let explicit = std::env::var_os(CONFIG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_inner(project_dir, explicit.as_deref(), global_config_dir())
}

/// Resolution once the environment has been read.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// Returns the global config directory path.
///
/// Resolution: `$LINT_GATE_CONFIG_DIR` > `~/.lint-gate/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".lint-gate"))
}
