//! Container engine backends for Opensourcer deployments.
//!
//! The lifecycle layer never shells out directly. It talks to a
//! `ContainerEngine`: the compose backend drives `docker compose` or
//! `podman compose` as a child process, and the mock backend records every
//! call in memory so lifecycle flows can be tested without a container
//! engine. Prerequisite checks for the CLI live here too.

pub mod compose;
pub mod engine;
pub mod mock;
pub mod prereq;

pub use engine::{select_engine, ComposeProject, ContainerEngine, EngineOp, COMPOSE_FILE_NAMES};
pub use mock::{EngineCall, MockEngine, MockJournal};
pub use prereq::{check_engine_prereqs, check_git_prereqs, format_missing, MissingPrereq};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("container engine '{0}' is not running or not installed")]
    EngineUnavailable(String),
    #[error("unknown container engine '{0}' (expected docker, podman or mock)")]
    UnknownEngine(String),
    #[error("{engine} compose {operation} failed: {detail}")]
    OperationFailed {
        engine: String,
        operation: EngineOp,
        detail: String,
    },
    #[error("no composition file found in {0}")]
    MissingComposition(String),
}
