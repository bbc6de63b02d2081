use crate::CoreError;
use opensourcer_store::DeploymentStatus;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Absent,
    Running,
    Stopped,
    Destroyed,
}

impl From<DeploymentStatus> for LifecycleState {
    fn from(status: DeploymentStatus) -> Self {
        match status {
            DeploymentStatus::Running => LifecycleState::Running,
            DeploymentStatus::Stopped => LifecycleState::Stopped,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Absent => write!(f, "absent"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Stopped => write!(f, "stopped"),
            LifecycleState::Destroyed => write!(f, "destroyed"),
        }
    }
}

/// Re-entering `running` or `stopped` from itself is allowed.
pub fn validate_transition(from: LifecycleState, to: LifecycleState) -> Result<(), CoreError> {
    let valid = matches!(
        (from, to),
        (LifecycleState::Absent, LifecycleState::Running)
            | (
                LifecycleState::Running | LifecycleState::Stopped,
                LifecycleState::Running | LifecycleState::Stopped | LifecycleState::Destroyed
            )
    );

    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use LifecycleState::{Absent, Destroyed, Running, Stopped};
        assert!(validate_transition(Absent, Running).is_ok());
        assert!(validate_transition(Running, Stopped).is_ok());
        assert!(validate_transition(Stopped, Running).is_ok());
        assert!(validate_transition(Running, Running).is_ok()); // idempotent start
        assert!(validate_transition(Stopped, Stopped).is_ok()); // idempotent stop
        assert!(validate_transition(Running, Destroyed).is_ok());
        assert!(validate_transition(Stopped, Destroyed).is_ok());
    }

    #[test]
    fn invalid_transitions() {
        use LifecycleState::{Absent, Destroyed, Running, Stopped};
        assert!(validate_transition(Absent, Stopped).is_err());
        assert!(validate_transition(Absent, Destroyed).is_err());
        assert!(validate_transition(Destroyed, Running).is_err());
        assert!(validate_transition(Running, Absent).is_err());
        assert!(validate_transition(Destroyed, Destroyed).is_err());
    }

    #[test]
    fn status_maps_to_state() {
        assert_eq!(
            LifecycleState::from(DeploymentStatus::Stopped),
            LifecycleState::Stopped
        );
        assert_eq!(LifecycleState::Running.to_string(), "running");
    }
}
