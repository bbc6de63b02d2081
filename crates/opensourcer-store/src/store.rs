use crate::deployment::{Deployment, DeploymentStatus};
use crate::{fsync_dir, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    deployments: Vec<Deployment>,
}

/// Read the persisted deployment list.
///
/// A missing file is a first run and a malformed file is treated as empty;
/// neither is an error.
pub fn load(path: &Path) -> Vec<Deployment> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("cannot read {}; starting empty: {e}", path.display());
            return Vec::new();
        }
    };
    match serde_json::from_str::<StateFile>(&content) {
        Ok(file) => file.deployments,
        Err(e) => {
            warn!("ignoring malformed state file {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Atomically replace the state file with `deployments`.
pub fn save(path: &Path, deployments: &[Deployment]) -> Result<(), StoreError> {
    #[derive(Serialize)]
    struct StateFileRef<'a> {
        deployments: &'a [Deployment],
    }

    let content = serde_json::to_string_pretty(&StateFileRef { deployments })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let persist = || -> Result<(), std::io::Error> {
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        fsync_dir(dir)
    };
    persist().map_err(|source| StoreError::PersistenceFailed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote {} deployments to {}", deployments.len(), path.display());
    Ok(())
}

/// In-memory list of deployments mirrored to a single state file.
///
/// Every mutation goes through [`mutate`](Self::mutate): the change is applied
/// to a copy of the current snapshot, the copy becomes the new snapshot, and
/// the file is rewritten before the call returns. A failed rewrite is
/// reported but the in-memory change is kept. There is no file lock; two
/// processes writing concurrently lose one side's changes.
#[derive(Debug)]
pub struct DeploymentStore {
    path: PathBuf,
    deployments: Vec<Deployment>,
}

impl DeploymentStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let deployments = load(&path);
        Self { path, deployments }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> &[Deployment] {
        &self.deployments
    }

    pub fn find(&self, software: &str) -> Option<&Deployment> {
        self.deployments.iter().find(|d| d.software == software)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        save(&self.path, &self.deployments)
    }

    pub fn mutate<R>(
        &mut self,
        change: impl FnOnce(&mut Vec<Deployment>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut next = self.deployments.clone();
        let out = change(&mut next)?;
        self.deployments = next;
        self.save()?;
        Ok(out)
    }

    pub fn append(&mut self, deployment: Deployment) -> Result<(), StoreError> {
        self.mutate(|list| {
            if let Some(existing) = list.iter().find(|d| d.software == deployment.software) {
                return Err(StoreError::AlreadyTracked {
                    software: deployment.software.clone(),
                    id: existing.id.to_string(),
                });
            }
            list.push(deployment);
            Ok(())
        })
    }

    /// Set the status of deployment `id` and bump its `updated_at`.
    pub fn update_status(
        &mut self,
        id: &Uuid,
        status: DeploymentStatus,
    ) -> Result<Deployment, StoreError> {
        self.mutate(|list| {
            let entry = list
                .iter_mut()
                .find(|d| d.id == *id)
                .ok_or_else(|| StoreError::DeploymentNotFound(id.to_string()))?;
            entry.status = status;
            entry.updated_at = Utc::now();
            Ok(entry.clone())
        })
    }

    pub fn remove(&mut self, id: &Uuid) -> Result<Deployment, StoreError> {
        self.mutate(|list| {
            let pos = list
                .iter()
                .position(|d| d.id == *id)
                .ok_or_else(|| StoreError::DeploymentNotFound(id.to_string()))?;
            Ok(list.remove(pos))
        })
    }
}
