use crate::engine::{ComposeProject, ContainerEngine, EngineOp};
use crate::RuntimeError;
use opensourcer_schema::EnvironmentSet;
use std::ffi::OsString;
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Drives `<program> compose` (docker or podman) as a child process.
pub struct ComposeEngine {
    program: String,
}

impl ComposeEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn docker() -> Self {
        Self::new("docker")
    }

    pub fn podman() -> Self {
        Self::new("podman")
    }

    fn command(&self, project: &ComposeProject, op: EngineOp, lines: usize) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(compose_args(project, op, lines))
            .current_dir(&project.work_dir)
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, mut cmd: Command, op: EngineOp) -> Result<Output, RuntimeError> {
        debug!("running {cmd:?}");
        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RuntimeError::EngineUnavailable(self.program.clone())
            } else {
                RuntimeError::Io(e)
            }
        })?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(RuntimeError::OperationFailed {
                engine: self.program.clone(),
                operation: op,
                detail: failure_detail(&output),
            })
        }
    }

    fn simple(&self, project: &ComposeProject, op: EngineOp) -> Result<(), RuntimeError> {
        self.run(self.command(project, op, 0), op).map(|_| ())
    }
}

/// Arguments after the program name for one compose operation.
pub fn compose_args(project: &ComposeProject, op: EngineOp, lines: usize) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "compose".into(),
        "-f".into(),
        project.compose_file.clone().into_os_string(),
    ];
    match op {
        EngineOp::Up => args.extend(["up".into(), "-d".into()]),
        EngineOp::Stop => args.push("stop".into()),
        EngineOp::Start => args.push("start".into()),
        EngineOp::DownWithVolumes => args.extend(["down".into(), "-v".into()]),
        EngineOp::Logs => args.extend(["logs".into(), "--tail".into(), lines.to_string().into()]),
    }
    args
}

fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
    if !stderr.is_empty() {
        return stderr;
    }
    match output.status.code() {
        Some(code) => format!("exited with code {code}"),
        None => "terminated by signal".to_owned(),
    }
}

impl ContainerEngine for ComposeEngine {
    fn name(&self) -> &str {
        &self.program
    }

    fn available(&self) -> bool {
        Command::new(&self.program)
            .arg("info")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn up(&self, project: &ComposeProject, env: &EnvironmentSet) -> Result<(), RuntimeError> {
        let mut cmd = self.command(project, EngineOp::Up, 0);
        cmd.envs(env.iter());
        self.run(cmd, EngineOp::Up).map(|_| ())
    }

    fn stop(&self, project: &ComposeProject) -> Result<(), RuntimeError> {
        self.simple(project, EngineOp::Stop)
    }

    fn start(&self, project: &ComposeProject) -> Result<(), RuntimeError> {
        self.simple(project, EngineOp::Start)
    }

    fn down_with_volumes(&self, project: &ComposeProject) -> Result<(), RuntimeError> {
        self.simple(project, EngineOp::DownWithVolumes)
    }

    fn logs(&self, project: &ComposeProject, lines: usize) -> Result<String, RuntimeError> {
        let output = self.run(self.command(project, EngineOp::Logs, lines), EngineOp::Logs)?;
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}
