use crate::engine::{ComposeProject, ContainerEngine, EngineOp};
use crate::RuntimeError;
use opensourcer_schema::EnvironmentSet;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// One recorded engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCall {
    pub op: EngineOp,
    pub work_dir: PathBuf,
    /// Environment passed to `up`; `None` for every other operation.
    pub env: Option<EnvironmentSet>,
}

/// Shared view of the calls a [`MockEngine`] has received.
///
/// Cloned out of the engine before it is boxed, so tests can inspect calls
/// after handing the engine to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct MockJournal {
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl MockJournal {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn count(&self, op: EngineOp) -> usize {
        self.calls().iter().filter(|c| c.op == op).count()
    }

    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }

    fn record(&self, call: EngineCall) -> Result<(), RuntimeError> {
        self.calls
            .lock()
            .map_err(|e| RuntimeError::OperationFailed {
                engine: "mock".to_owned(),
                operation: call.op,
                detail: format!("mutex poisoned: {e}"),
            })?
            .push(call);
        Ok(())
    }
}

/// Deterministic in-process engine.
///
/// Succeeds on every operation unless configured otherwise, and never
/// touches a real container runtime.
#[derive(Debug, Default)]
pub struct MockEngine {
    unavailable: bool,
    failing: HashSet<EngineOp>,
    journal: MockJournal,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the availability probe fail.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Make every call of `op` fail (the call is still recorded).
    #[must_use]
    pub fn failing(mut self, op: EngineOp) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn journal(&self) -> MockJournal {
        self.journal.clone()
    }

    fn invoke(
        &self,
        op: EngineOp,
        project: &ComposeProject,
        env: Option<&EnvironmentSet>,
    ) -> Result<(), RuntimeError> {
        self.journal.record(EngineCall {
            op,
            work_dir: project.work_dir.clone(),
            env: env.cloned(),
        })?;
        if self.unavailable {
            return Err(RuntimeError::EngineUnavailable("mock".to_owned()));
        }
        if self.failing.contains(&op) {
            return Err(RuntimeError::OperationFailed {
                engine: "mock".to_owned(),
                operation: op,
                detail: format!("mock {op} configured to fail"),
            });
        }
        if !project.compose_file.is_file() {
            return Err(RuntimeError::OperationFailed {
                engine: "mock".to_owned(),
                operation: op,
                detail: format!("{} does not exist", project.compose_file.display()),
            });
        }
        Ok(())
    }
}

impl ContainerEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn available(&self) -> bool {
        !self.unavailable
    }

    fn up(&self, project: &ComposeProject, env: &EnvironmentSet) -> Result<(), RuntimeError> {
        self.invoke(EngineOp::Up, project, Some(env))
    }

    fn stop(&self, project: &ComposeProject) -> Result<(), RuntimeError> {
        self.invoke(EngineOp::Stop, project, None)
    }

    fn start(&self, project: &ComposeProject) -> Result<(), RuntimeError> {
        self.invoke(EngineOp::Start, project, None)
    }

    fn down_with_volumes(&self, project: &ComposeProject) -> Result<(), RuntimeError> {
        self.invoke(EngineOp::DownWithVolumes, project, None)
    }

    fn logs(&self, project: &ComposeProject, lines: usize) -> Result<String, RuntimeError> {
        self.invoke(EngineOp::Logs, project, None)?;
        Ok(format!(
            "mock-logs: last {lines} lines of {}\n",
            project.work_dir.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_project(dir: &std::path::Path) -> ComposeProject {
        let file = dir.join("docker-compose.yaml");
        std::fs::write(&file, "services:\n  web:\n    image: nginx\n").unwrap();
        ComposeProject::new(file, dir)
    }

    #[test]
    fn mock_lifecycle_records_calls() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MockEngine::new();
        let journal = engine.journal();
        let project = test_project(dir.path());

        let env: EnvironmentSet = [("DOMAIN", "localhost")].into_iter().collect();
        engine.up(&project, &env).unwrap();
        engine.stop(&project).unwrap();
        engine.start(&project).unwrap();
        let logs = engine.logs(&project, 100).unwrap();
        engine.down_with_volumes(&project).unwrap();

        assert!(logs.contains("last 100 lines"));
        let ops: Vec<_> = journal.calls().iter().map(|c| c.op).collect();
        assert_eq!(
            ops,
            vec![
                EngineOp::Up,
                EngineOp::Stop,
                EngineOp::Start,
                EngineOp::Logs,
                EngineOp::DownWithVolumes
            ]
        );
        assert_eq!(journal.calls()[0].env.as_ref(), Some(&env));
        assert!(journal.calls()[1].env.is_none());
    }

    #[test]
    fn unavailable_mock_fails_probe_and_calls() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MockEngine::new().unavailable();
        assert!(!engine.available());
        assert!(matches!(
            engine.stop(&test_project(dir.path())),
            Err(RuntimeError::EngineUnavailable(_))
        ));
    }

    #[test]
    fn failing_op_is_recorded_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MockEngine::new().failing(EngineOp::DownWithVolumes);
        let journal = engine.journal();
        let project = test_project(dir.path());

        engine.stop(&project).unwrap();
        assert!(matches!(
            engine.down_with_volumes(&project),
            Err(RuntimeError::OperationFailed {
                operation: EngineOp::DownWithVolumes,
                ..
            })
        ));
        assert_eq!(journal.count(EngineOp::DownWithVolumes), 1);
    }

    #[test]
    fn missing_compose_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MockEngine::new();
        let project = ComposeProject::new(dir.path().join("docker-compose.yaml"), dir.path());
        assert!(engine.start(&project).is_err());
    }
}
