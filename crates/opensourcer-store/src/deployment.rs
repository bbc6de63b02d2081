use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

/// The only deployment target currently supported.
pub const LOCAL_TARGET: &str = "local";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Running,
    Stopped,
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentStatus::Running => write!(f, "running"),
            DeploymentStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// One tracked instance of a catalog entry.
///
/// The `id` is assigned once on creation and never changes. Lookups by the
/// user go through `software`, which is unique across the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deployment {
    pub id: Uuid,
    pub software: String,
    pub target: String,
    pub status: DeploymentStatus,
    pub directory: PathBuf,
    /// Host port the composition exposes, 0 when none was detected.
    #[serde(default)]
    pub port: u16,
    /// User-supplied input values, as given at deploy time.
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deployment {
    /// A freshly deployed, running local deployment with a new id.
    pub fn new_running(
        software: &str,
        directory: PathBuf,
        port: u16,
        inputs: BTreeMap<String, String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            software: software.to_owned(),
            target: LOCAL_TARGET.to_owned(),
            status: DeploymentStatus::Running,
            directory,
            port,
            inputs,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_owned()
    }

    pub fn url(&self) -> Option<String> {
        (self.port > 0).then(|| format!("http://localhost:{}", self.port))
    }
}
