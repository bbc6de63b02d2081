use crate::StoreError;
use std::fs;
use std::path::{Path, PathBuf};

const CATALOG_DIR: &str = "catalog";
const DEPLOYMENTS_DIR: &str = "deployments";
const STATE_FILE: &str = "deployments.json";
const CONFIG_FILE: &str = "config.toml";

/// Directory layout under the Opensourcer home (`~/.opensourcer` by default).
///
/// ```text
/// <root>/
///   config.toml          optional user configuration
///   catalog/<slug>/      synchronized catalog entries
///   deployments/<slug>/  materialized compositions plus generated .env
///   deployments.json     persisted deployment records
/// ```
#[derive(Debug, Clone)]
pub struct HomeLayout {
    root: PathBuf,
}

impl HomeLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn catalog_dir(&self) -> PathBuf {
        self.root.join(CATALOG_DIR)
    }

    #[inline]
    pub fn deployments_dir(&self) -> PathBuf {
        self.root.join(DEPLOYMENTS_DIR)
    }

    #[inline]
    pub fn deployment_path(&self, slug: &str) -> PathBuf {
        self.deployments_dir().join(slug)
    }

    #[inline]
    pub fn state_file(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    #[inline]
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(self.deployments_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths_are_correct() {
        let layout = HomeLayout::new("/tmp/opensourcer-test");
        assert_eq!(
            layout.catalog_dir(),
            PathBuf::from("/tmp/opensourcer-test/catalog")
        );
        assert_eq!(
            layout.deployment_path("ghost"),
            PathBuf::from("/tmp/opensourcer-test/deployments/ghost")
        );
        assert_eq!(
            layout.state_file(),
            PathBuf::from("/tmp/opensourcer-test/deployments.json")
        );
        assert_eq!(
            layout.config_file(),
            PathBuf::from("/tmp/opensourcer-test/config.toml")
        );
    }

    #[test]
    fn initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = HomeLayout::new(dir.path().join("home"));
        layout.initialize().unwrap();
        layout.initialize().unwrap();
        assert!(layout.deployments_dir().is_dir());
        assert!(!layout.state_file().exists());
    }
}
