//! Finds the toolchain and linter binaries on disk.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Linter binary name inside `$GOPATH/bin`.
pub const LINTER_NAME: &str = "golangci-lint";

/// Resolves the toolchain program on `PATH`.
///
/// Names containing a path separator are checked as-is.
pub fn toolchain(program: &str) -> Result<PathBuf> {
    let path = which::which(program)
        .with_context(|| format!("failed to get {program} binary path"))?;
    tracing::debug!("Resolved toolchain {} to {}", program, path.display());
    Ok(path)
}

/// Resolves the downstream linter binary.
///
/// Priority: configured path > `$GOPATH/bin/golangci-lint` >
/// `~/go/bin/golangci-lint`. Existence is not checked here; a missing binary
/// surfaces as a handoff failure.
pub fn linter(configured: Option<&Path>) -> Result<PathBuf> {
    linter_inner(configured, std::env::var_os("GOPATH"), home::home_dir())
}

fn linter_inner(
    configured: Option<&Path>,
    gopath: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    let Some(root) = gopath_root(gopath, home) else {
        bail!("cannot locate {LINTER_NAME}: neither GOPATH nor a home directory is set");
    };
    Ok(root.join("bin").join(LINTER_NAME))
}

/// First `GOPATH` entry, defaulting to `~/go` like the Go toolchain does.
fn gopath_root(gopath: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    gopath
        .filter(|g| !g.is_empty())
        .and_then(|g| std::env::split_paths(&g).find(|p| !p.as_os_str().is_empty()))
        .or_else(|| home.map(|h| h.join("go")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_path_wins() {
        let path = linter_inner(
            Some(Path::new("/opt/golangci-lint")),
            Some(OsString::from("/gopath")),
            Some(PathBuf::from("/home/dev")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/opt/golangci-lint"));
    }

    #[test]
    fn gopath_bin_is_used() {
        let path = linter_inner(None, Some(OsString::from("/gopath")), None).unwrap();
        assert_eq!(path, PathBuf::from("/gopath/bin/golangci-lint"));
    }

    #[cfg(unix)]
    #[test]
    fn first_gopath_entry_is_used() {
        let path = linter_inner(None, Some(OsString::from("/first:/second")), None).unwrap();
        assert_eq!(path, PathBuf::from("/first/bin/golangci-lint"));
    }

    #[test]
    fn empty_gopath_falls_back_to_home() {
        let path = linter_inner(
            None,
            Some(OsString::new()),
            Some(PathBuf::from("/home/dev")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/home/dev/go/bin/golangci-lint"));
    }

    #[test]
    fn no_gopath_and_no_home_is_an_error() {
        let err = linter_inner(None, None, None).unwrap_err();
        assert!(err.to_string().contains("cannot locate golangci-lint"));
    }

    #[test]
    fn unknown_toolchain_is_an_error() {
        let err = toolchain("lint-gate-no-such-toolchain").unwrap_err();
        assert!(err.to_string().contains("lint-gate-no-such-toolchain"));
    }

    #[cfg(unix)]
    #[test]
    fn toolchain_found_on_path() {
        let path = toolchain("sh").unwrap();
        assert!(path.is_absolute());
    }
}
