use std::fmt;
use std::process::{Command, Stdio};

/// A missing prerequisite with actionable install instructions.
#[derive(Debug)]
pub struct MissingPrereq {
    pub name: String,
    pub purpose: &'static str,
    pub install_hint: &'static str,
}

impl fmt::Display for MissingPrereq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  - {}: {} (install: {})",
            self.name, self.purpose, self.install_hint
        )
    }
}

fn command_succeeds(program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Check that `program` and its compose plugin are installed.
///
/// Whether the engine daemon is actually reachable is probed separately at
/// deploy time. The mock engine has no prerequisites.
pub fn check_engine_prereqs(program: &str) -> Vec<MissingPrereq> {
    let mut missing = Vec::new();
    if program == "mock" {
        return missing;
    }

    if !command_succeeds(program, &["--version"]) {
        missing.push(MissingPrereq {
            name: program.to_owned(),
            purpose: "running deployment containers",
            install_hint: "https://docs.docker.com/engine/install/ or your distribution's podman package",
        });
    } else if !command_succeeds(program, &["compose", "version"]) {
        missing.push(MissingPrereq {
            name: format!("{program} compose"),
            purpose: "bringing up multi-container compositions",
            install_hint: "docker-compose-plugin | podman-compose",
        });
    }

    missing
}

/// Check that `git` is available for catalog synchronization.
pub fn check_git_prereqs() -> Vec<MissingPrereq> {
    let mut missing = Vec::new();
    if !command_succeeds("git", &["--version"]) {
        missing.push(MissingPrereq {
            name: "git".to_owned(),
            purpose: "downloading and updating the software catalog",
            install_hint: "apt install git | dnf install git | pacman -S git | brew install git",
        });
    }
    missing
}

/// Format a list of missing prerequisites into a user-friendly error message.
pub fn format_missing(missing: &[MissingPrereq]) -> String {
    use std::fmt::Write as _;
    let mut msg = String::from("missing prerequisites:\n");
    for m in missing {
        let _ = writeln!(msg, "{m}");
    }
    msg.push_str("\nOpensourcer needs these tools to deploy software locally.");
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_prereq_display() {
        let m = MissingPrereq {
            name: "docker".to_owned(),
            purpose: "running containers",
            install_hint: "apt install docker.io",
        };
        let s = m.to_string();
        assert!(s.contains("docker"));
        assert!(s.contains("running containers"));
        assert!(s.contains("apt install docker.io"));
    }

    #[test]
    fn mock_engine_has_no_prereqs() {
        assert!(check_engine_prereqs("mock").is_empty());
    }

    #[test]
    fn unknown_program_is_reported_missing() {
        let missing = check_engine_prereqs("opensourcer-no-such-engine");
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "opensourcer-no-such-engine");
    }

    #[test]
    fn format_missing_produces_readable_output() {
        let items = vec![
            MissingPrereq {
                name: "docker".to_owned(),
                purpose: "containers",
                install_hint: "apt install docker.io",
            },
            MissingPrereq {
                name: "git".to_owned(),
                purpose: "catalog",
                install_hint: "apt install git",
            },
        ];
        let output = format_missing(&items);
        assert!(output.contains("missing prerequisites:"));
        assert!(output.contains("docker"));
        assert!(output.contains("git"));
    }
}
