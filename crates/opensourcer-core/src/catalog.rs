use opensourcer_schema::{parse_definition_file, DefinitionError, SoftwareDefinition, DEFINITION_FILE};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Directory names starting with this character are catalog metadata, not software.
pub const RESERVED_PREFIX: char = '_';

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("software '{0}' not found in catalog")]
    NotFound(String),
    #[error("invalid app.json for '{slug}': {reason}")]
    InvalidDefinition { slug: String, reason: String },
    #[error("catalog not found at {}; run 'opensourcer update' first", .0.display())]
    Missing(PathBuf),
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog synchronization failed: {0}")]
    Sync(String),
}

/// Read-only view of a catalog directory: one subdirectory per software slug.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn entry_dir(&self, slug: &str) -> PathBuf {
        self.root.join(slug)
    }

    /// Load the definition for `slug`. The returned definition's `slug` is
    /// the directory name.
    pub fn resolve(&self, slug: &str) -> Result<SoftwareDefinition, CatalogError> {
        if !is_catalog_slug(slug) {
            return Err(CatalogError::NotFound(slug.to_owned()));
        }
        let path = self.entry_dir(slug).join(DEFINITION_FILE);
        if !path.is_file() {
            return Err(CatalogError::NotFound(slug.to_owned()));
        }
        debug!("loading definition {}", path.display());
        let mut definition = parse_definition_file(&path).map_err(|e| match e {
            DefinitionError::Io(io) => CatalogError::Io(io),
            other => CatalogError::InvalidDefinition {
                slug: slug.to_owned(),
                reason: other.to_string(),
            },
        })?;
        slug.clone_into(&mut definition.slug);
        if definition.name.trim().is_empty() {
            slug.clone_into(&mut definition.name);
        }
        Ok(definition)
    }

    /// Sorted slugs of every catalog entry, excluding reserved and hidden
    /// directories.
    pub fn list(&self) -> Result<Vec<String>, CatalogError> {
        if !self.exists() {
            return Err(CatalogError::Missing(self.root.clone()));
        }
        let mut slugs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if is_catalog_slug(&name) {
                slugs.push(name);
            }
        }
        slugs.sort();
        Ok(slugs)
    }

    /// Every loadable definition, in slug order. Broken entries are skipped
    /// with a warning so one bad entry does not hide the rest.
    pub fn definitions(&self) -> Result<Vec<SoftwareDefinition>, CatalogError> {
        let mut out = Vec::new();
        for slug in self.list()? {
            match self.resolve(&slug) {
                Ok(def) => out.push(def),
                Err(e) => warn!("skipping catalog entry '{slug}': {e}"),
            }
        }
        Ok(out)
    }
}

fn is_catalog_slug(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(RESERVED_PREFIX)
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_entry(root: &Path, slug: &str, definition: &str) {
        let dir = root.join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DEFINITION_FILE), definition).unwrap();
        fs::write(
            dir.join("docker-compose.yaml"),
            "services:\n  app:\n    image: nginx\n",
        )
        .unwrap();
    }

    fn sample_catalog() -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        write_entry(dir.path(), "ghost", r#"{"name": "Ghost", "category": "cms"}"#);
        write_entry(dir.path(), "gitea", r#"{"name": "Gitea", "category": "dev"}"#);
        write_entry(dir.path(), "_templates", r#"{"name": "Template"}"#);
        write_entry(dir.path(), "broken", r#"{"name": "#);
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("README.md"), "# catalog").unwrap();
        let catalog = Catalog::new(dir.path());
        (dir, catalog)
    }

    #[test]
    fn resolve_sets_slug_from_directory() {
        let (_dir, catalog) = sample_catalog();
        let def = catalog.resolve("ghost").unwrap();
        assert_eq!(def.slug, "ghost");
        assert_eq!(def.name, "Ghost");
    }

    #[test]
    fn resolve_names_unnamed_entry_after_slug() {
        let (dir, catalog) = sample_catalog();
        write_entry(dir.path(), "plausible", r#"{"category": "analytics"}"#);
        write_entry(dir.path(), "umami", r#"{"name": "  "}"#);
        assert_eq!(catalog.resolve("plausible").unwrap().name, "plausible");
        assert_eq!(catalog.resolve("umami").unwrap().name, "umami");
    }

    #[test]
    fn resolve_unknown_slug_is_not_found() {
        let (_dir, catalog) = sample_catalog();
        assert!(matches!(
            catalog.resolve("wordpress"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn resolve_malformed_definition_is_invalid() {
        let (_dir, catalog) = sample_catalog();
        assert!(matches!(
            catalog.resolve("broken"),
            Err(CatalogError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn resolve_refuses_reserved_and_path_like_slugs() {
        let (_dir, catalog) = sample_catalog();
        assert!(matches!(
            catalog.resolve("_templates"),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.resolve("../ghost"),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(catalog.resolve(""), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn list_excludes_reserved_hidden_and_files() {
        let (_dir, catalog) = sample_catalog();
        assert_eq!(catalog.list().unwrap(), vec!["broken", "ghost", "gitea"]);
    }

    #[test]
    fn definitions_skip_broken_entries() {
        let (_dir, catalog) = sample_catalog();
        let names: Vec<_> = catalog
            .definitions()
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Ghost", "Gitea"]);
    }

    #[test]
    fn list_missing_catalog_fails() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(dir.path().join("catalog"));
        assert!(matches!(catalog.list(), Err(CatalogError::Missing(_))));
    }
}
