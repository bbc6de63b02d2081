pub mod catalog;
pub mod completions;
pub mod deploy;
pub mod destroy;
pub mod doctor;
pub mod info;
pub mod inspect;
pub mod list;
pub mod logs;
pub mod man_pages;
pub mod start;
pub mod stop;
pub mod update;

use indicatif::{ProgressBar, ProgressStyle};
use opensourcer_core::{Config, CoreError, ErrorKind, Orchestrator};
use opensourcer_store::HomeLayout;
use std::fmt;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CATALOG_ERROR: u8 = 2;
pub const EXIT_STORE_ERROR: u8 = 3;
pub const EXIT_ENGINE_ERROR: u8 = 4;

/// A failed command: the message printed to stderr and the process exit code.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<CoreError> for CliError {
    fn from(e: CoreError) -> Self {
        Self {
            code: exit_code_for(&e),
            message: e.to_string(),
        }
    }
}

impl From<String> for CliError {
    fn from(message: String) -> Self {
        Self {
            code: EXIT_FAILURE,
            message,
        }
    }
}

pub fn exit_code_for(e: &CoreError) -> u8 {
    if let CoreError::Catalog(_) = e {
        return EXIT_CATALOG_ERROR;
    }
    match e.kind() {
        ErrorKind::InvalidDefinition => EXIT_CATALOG_ERROR,
        ErrorKind::PersistenceFailed => EXIT_STORE_ERROR,
        ErrorKind::EngineUnavailable | ErrorKind::EngineOperationFailed => EXIT_ENGINE_ERROR,
        ErrorKind::NotFound
        | ErrorKind::Conflict
        | ErrorKind::InvalidRequest
        | ErrorKind::Io => EXIT_FAILURE,
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn orchestrator(layout: &HomeLayout, config: &Config) -> Result<Orchestrator, CliError> {
    Ok(Orchestrator::from_config(layout.clone(), config)?)
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    pb.finish_with_message(format!("✗ {msg}"));
}

/// Run `op` behind a spinner unless `json` output is requested.
pub fn with_spinner<T, E: Into<CliError>>(
    json: bool,
    msg: &str,
    done: &str,
    failed: &str,
    op: impl FnOnce() -> Result<T, E>,
) -> Result<T, CliError> {
    let pb = (!json).then(|| spinner(msg));
    match op() {
        Ok(v) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, done);
            }
            Ok(v)
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, failed);
            }
            Err(e.into())
        }
    }
}

pub fn colorize_status(status: &str) -> String {
    use console::Style;
    match status {
        "running" => Style::new().green().bold().apply_to(status).to_string(),
        "stopped" => Style::new().yellow().apply_to(status).to_string(),
        other => other.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensourcer_core::CatalogError;
    use opensourcer_runtime::{EngineOp, RuntimeError};
    use opensourcer_store::StoreError;

    #[test]
    fn json_pretty_serializes_object() {
        let val = serde_json::json!({"software": "ghost"});
        let result = json_pretty(&val).unwrap();
        assert!(result.contains("\"software\""));
        assert!(result.contains("\"ghost\""));
    }

    #[test]
    fn colorize_status_keeps_text() {
        assert!(colorize_status("running").contains("running"));
        assert!(colorize_status("stopped").contains("stopped"));
        assert_eq!(colorize_status("unknown"), "unknown");
    }

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_FAILURE,
            EXIT_CATALOG_ERROR,
            EXIT_STORE_ERROR,
            EXIT_ENGINE_ERROR,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn with_spinner_passes_errors_through() {
        let ok = with_spinner(true, "x", "ok", "bad", || Ok::<_, String>(3));
        assert_eq!(ok.unwrap(), 3);
        let err = with_spinner(true, "x", "ok", "bad", || Err::<u8, _>("boom".to_owned()));
        let err = err.unwrap_err();
        assert_eq!(err.message, "boom");
        assert_eq!(err.code, EXIT_FAILURE);

        let err = with_spinner(true, "x", "ok", "bad", || {
            Err::<u8, _>(CoreError::from(RuntimeError::EngineUnavailable(
                "docker".to_owned(),
            )))
        });
        assert_eq!(err.unwrap_err().code, EXIT_ENGINE_ERROR);
    }

    #[test]
    fn exit_codes_follow_error_classification() {
        let catalog = CoreError::from(CatalogError::NotFound("wordpress".to_owned()));
        assert_eq!(exit_code_for(&catalog), EXIT_CATALOG_ERROR);
        let sync = CoreError::from(CatalogError::Sync("no route to host".to_owned()));
        assert_eq!(exit_code_for(&sync), EXIT_CATALOG_ERROR);
        let missing = CoreError::from(RuntimeError::MissingComposition("/x".into()));
        assert_eq!(exit_code_for(&missing), EXIT_CATALOG_ERROR);

        let store = CoreError::from(StoreError::PersistenceFailed {
            path: "/x".into(),
            source: std::io::Error::other("disk full"),
        });
        assert_eq!(exit_code_for(&store), EXIT_STORE_ERROR);

        let engine = CoreError::from(RuntimeError::OperationFailed {
            engine: "docker".to_owned(),
            operation: EngineOp::Up,
            detail: "pull access denied".to_owned(),
        });
        assert_eq!(exit_code_for(&engine), EXIT_ENGINE_ERROR);

        let unknown = CoreError::DeploymentNotFound("ghost".to_owned());
        assert_eq!(exit_code_for(&unknown), EXIT_FAILURE);
        let target = CoreError::UnsupportedTarget("hetzner".to_owned());
        assert_eq!(exit_code_for(&target), EXIT_FAILURE);
    }

    #[test]
    fn cli_error_keeps_core_message() {
        let err = CliError::from(CoreError::DeploymentNotFound("ghost".to_owned()));
        assert_eq!(err.to_string(), "deployment 'ghost' not found");
    }

    #[test]
    fn orchestrator_rejects_unknown_engine() {
        let dir = tempfile::tempdir().unwrap();
        let layout = HomeLayout::new(dir.path());
        let config = Config {
            engine: "lxc".to_owned(),
            ..Config::default()
        };
        assert!(orchestrator(&layout, &config).is_err());
    }
}
