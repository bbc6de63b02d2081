//! Catalog synchronization through the `git` command line.

use crate::CatalogError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

pub const DEFAULT_CATALOG_URL: &str = "https://github.com/opengittr/opensourcer-catalog.git";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned,
    Updated,
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOutcome::Cloned => write!(f, "cloned"),
            SyncOutcome::Updated => write!(f, "updated"),
        }
    }
}

/// Bring `catalog_dir` up to date with `url`.
///
/// An existing checkout is pulled with rebase. Anything else at that path is
/// replaced by a fresh shallow clone, staged next to the target and renamed
/// into place so a failed clone never leaves a half-populated catalog.
pub fn sync_catalog(catalog_dir: &Path, url: &str) -> Result<SyncOutcome, CatalogError> {
    if catalog_dir.join(".git").is_dir() {
        info!("updating catalog in {}", catalog_dir.display());
        run_git(
            Command::new("git")
                .arg("-C")
                .arg(catalog_dir)
                .args(["pull", "--rebase", "--quiet"]),
        )?;
        return Ok(SyncOutcome::Updated);
    }

    if catalog_dir.exists() {
        warn!(
            "{} is not a git checkout, replacing it with a fresh clone",
            catalog_dir.display()
        );
        fs::remove_dir_all(catalog_dir)?;
    }
    if let Some(parent) = catalog_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(catalog_dir);
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }

    info!("cloning catalog from {url}");
    if let Err(e) = run_git(
        Command::new("git")
            .args(["clone", "--depth", "1", "--quiet", url])
            .arg(&staging),
    ) {
        let _ = fs::remove_dir_all(&staging);
        return Err(e);
    }
    fs::rename(&staging, catalog_dir)?;
    Ok(SyncOutcome::Cloned)
}

fn staging_path(catalog_dir: &Path) -> PathBuf {
    let mut name = catalog_dir
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    catalog_dir.with_file_name(name)
}

fn run_git(cmd: &mut Command) -> Result<(), CatalogError> {
    debug!("running {cmd:?}");
    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CatalogError::Sync("git is not installed".to_owned())
        } else {
            CatalogError::Io(e)
        }
    })?;
    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(CatalogError::Sync(format!(
            "git exited with {}: {}",
            output.status,
            stderr.trim()
        )))
    }
}
