use crate::RuntimeError;
use opensourcer_schema::EnvironmentSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Composition file names recognized in a deployment directory, in lookup order.
pub const COMPOSE_FILE_NAMES: &[&str] = &[
    "docker-compose.yaml",
    "docker-compose.yml",
    "compose.yaml",
    "compose.yml",
];

/// A composition on disk: the file handed to `-f` and the directory the
/// engine runs in (where it also picks up `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    pub compose_file: PathBuf,
    pub work_dir: PathBuf,
}

impl ComposeProject {
    pub fn new(compose_file: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            compose_file: compose_file.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Find the composition file inside `dir`.
    pub fn locate(dir: &Path) -> Result<Self, RuntimeError> {
        COMPOSE_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
            .map(|file| Self::new(file, dir))
            .ok_or_else(|| RuntimeError::MissingComposition(dir.display().to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOp {
    Up,
    Stop,
    Start,
    DownWithVolumes,
    Logs,
}

impl fmt::Display for EngineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineOp::Up => write!(f, "up"),
            EngineOp::Stop => write!(f, "stop"),
            EngineOp::Start => write!(f, "start"),
            EngineOp::DownWithVolumes => write!(f, "down"),
            EngineOp::Logs => write!(f, "logs"),
        }
    }
}

/// The container orchestration capability a deployment is driven through.
///
/// Every operation blocks until the engine finishes; no timeout is applied.
pub trait ContainerEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Cheap reachability probe, run before anything is written to disk.
    fn available(&self) -> bool;

    /// Create and start the composition's containers in the background.
    fn up(&self, project: &ComposeProject, env: &EnvironmentSet) -> Result<(), RuntimeError>;

    fn stop(&self, project: &ComposeProject) -> Result<(), RuntimeError>;

    fn start(&self, project: &ComposeProject) -> Result<(), RuntimeError>;

    /// Remove containers, networks, and named volumes.
    fn down_with_volumes(&self, project: &ComposeProject) -> Result<(), RuntimeError>;

    /// The last `lines` lines of every service's output, verbatim.
    fn logs(&self, project: &ComposeProject, lines: usize) -> Result<String, RuntimeError>;
}

pub fn select_engine(name: &str) -> Result<Box<dyn ContainerEngine>, RuntimeError> {
    match name {
        "docker" => Ok(Box::new(crate::compose::ComposeEngine::docker())),
        "podman" => Ok(Box::new(crate::compose::ComposeEngine::podman())),
        "mock" => Ok(Box::new(crate::mock::MockEngine::new())),
        other => Err(RuntimeError::UnknownEngine(other.to_owned())),
    }
}
