//! Persisted deployment state for Opensourcer.
//!
//! This crate owns everything Opensourcer writes under its home directory:
//! `HomeLayout` for path management, the `Deployment` record, and the
//! `DeploymentStore` which keeps the full list of deployments in a single
//! JSON state file that is atomically rewritten after every mutation.

pub mod deployment;
pub mod layout;
pub mod store;

pub use deployment::{Deployment, DeploymentStatus, LOCAL_TARGET};
pub use layout::HomeLayout;
pub use store::{load, save, DeploymentStore};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fsync a directory so that a preceding `rename()` survives a crash.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to persist deployment state to {}: {source}", path.display())]
    PersistenceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("deployment not found: {0}")]
    DeploymentNotFound(String),
    #[error("software '{software}' is already tracked by deployment {id}")]
    AlreadyTracked { software: String, id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_not_found() {
        let e = StoreError::DeploymentNotFound("ghost".to_owned());
        assert!(e.to_string().contains("ghost"));
    }

    #[test]
    fn store_error_display_already_tracked() {
        let e = StoreError::AlreadyTracked {
            software: "gitea".to_owned(),
            id: "1234".to_owned(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gitea"));
        assert!(msg.contains("1234"));
    }

    #[test]
    fn store_error_display_persistence_names_path() {
        let e = StoreError::PersistenceFailed {
            path: PathBuf::from("/tmp/os/deployments.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = e.to_string();
        assert!(msg.contains("deployments.json"));
        assert!(msg.contains("denied"));
    }
}
