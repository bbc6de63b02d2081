//! Deployment lifecycle orchestration for Opensourcer.
//!
//! This crate ties the catalog, the deployment store, and the container
//! engine together into the `Orchestrator`, the API behind every lifecycle
//! command: deploy, stop, start, destroy, and logs. It also owns the pieces
//! only a first deploy needs (secure token generation, environment
//! synthesis, exposed port detection) plus catalog synchronization and the
//! user configuration file.

pub mod catalog;
pub mod config;
pub mod environment;
pub mod lifecycle;
pub mod orchestrator;
pub mod port;
pub mod sync;
pub mod token;

pub use catalog::{Catalog, CatalogError};
pub use config::Config;
pub use environment::{credential_summary, env_var_name, synthesize, KEY_TRANSLATIONS};
pub use lifecycle::{validate_transition, LifecycleState};
pub use orchestrator::{DeployOutcome, DeployRequest, Orchestrator};
pub use port::{detect_port, KNOWN_PORTS};
pub use sync::{sync_catalog, SyncOutcome, DEFAULT_CATALOG_URL};

use opensourcer_runtime::RuntimeError;
use opensourcer_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("engine error: {0}")]
    Runtime(#[from] RuntimeError),
    #[error("config error: {0}")]
    Config(String),
    #[error("deployment '{0}' not found")]
    DeploymentNotFound(String),
    #[error("'{software}' is already deployed ({id}); destroy it before deploying again")]
    AlreadyDeployed { software: String, id: String },
    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("unsupported deployment target '{0}' (only 'local' is available)")]
    UnsupportedTarget(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`CoreError`], stable across wrapping layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidDefinition,
    EngineUnavailable,
    EngineOperationFailed,
    PersistenceFailed,
    Conflict,
    InvalidRequest,
    Io,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Catalog(CatalogError::NotFound(_) | CatalogError::Missing(_))
            | CoreError::DeploymentNotFound(_)
            | CoreError::Store(StoreError::DeploymentNotFound(_)) => ErrorKind::NotFound,
            CoreError::Catalog(CatalogError::InvalidDefinition { .. })
            | CoreError::Runtime(RuntimeError::MissingComposition(_)) => {
                ErrorKind::InvalidDefinition
            }
            CoreError::Runtime(RuntimeError::EngineUnavailable(_)) => ErrorKind::EngineUnavailable,
            CoreError::Runtime(_) | CoreError::Catalog(CatalogError::Sync(_)) => {
                ErrorKind::EngineOperationFailed
            }
            CoreError::Store(StoreError::AlreadyTracked { .. }) | CoreError::AlreadyDeployed { .. } => {
                ErrorKind::Conflict
            }
            CoreError::Store(_) => ErrorKind::PersistenceFailed,
            CoreError::Config(_)
            | CoreError::InvalidTransition { .. }
            | CoreError::UnsupportedTarget(_) => ErrorKind::InvalidRequest,
            CoreError::Catalog(CatalogError::Io(_)) | CoreError::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensourcer_runtime::EngineOp;

    #[test]
    fn kinds_follow_wrapped_errors() {
        assert_eq!(
            CoreError::from(CatalogError::NotFound("x".to_owned())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::DeploymentNotFound("x".to_owned()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::from(RuntimeError::EngineUnavailable("docker".to_owned())).kind(),
            ErrorKind::EngineUnavailable
        );
        assert_eq!(
            CoreError::from(RuntimeError::OperationFailed {
                engine: "docker".to_owned(),
                operation: EngineOp::Up,
                detail: "boom".to_owned(),
            })
            .kind(),
            ErrorKind::EngineOperationFailed
        );
        assert_eq!(
            CoreError::from(StoreError::PersistenceFailed {
                path: "/x".into(),
                source: std::io::Error::other("disk full"),
            })
            .kind(),
            ErrorKind::PersistenceFailed
        );
    }

    #[test]
    fn already_deployed_message_names_software() {
        let e = CoreError::AlreadyDeployed {
            software: "ghost".to_owned(),
            id: "abcd1234".to_owned(),
        };
        assert!(e.to_string().contains("ghost"));
        assert_eq!(e.kind(), ErrorKind::Conflict);
    }
}
