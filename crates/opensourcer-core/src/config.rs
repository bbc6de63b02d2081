use crate::sync::DEFAULT_CATALOG_URL;
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Overrides `engine` from the environment.
pub const ENGINE_ENV: &str = "OPENSOURCER_ENGINE";

const DEFAULT_ENGINE: &str = "docker";
const DEFAULT_LOG_LINES: usize = 100;

/// User settings read from `<home>/config.toml`. Every field is optional in
/// the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Git URL of the software catalog.
    pub catalog_url: String,
    /// Container engine backend: `docker`, `podman` or `mock`.
    pub engine: String,
    /// Default number of log lines shown by `logs`.
    pub log_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_owned(),
            engine: DEFAULT_ENGINE.to_owned(),
            log_lines: DEFAULT_LOG_LINES,
        }
    }
}

impl Config {
    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(CoreError::Io(e)),
        };
        toml::from_str(&content)
            .map_err(|e| CoreError::Config(format!("invalid {}: {e}", path.display())))
    }

    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_engine_override(std::env::var(ENGINE_ENV).ok())
    }

    #[must_use]
    pub fn with_engine_override(mut self, engine: Option<String>) -> Self {
        if let Some(engine) = engine.filter(|e| !e.trim().is_empty()) {
            self.engine = engine.trim().to_owned();
        }
        self
    }
}
