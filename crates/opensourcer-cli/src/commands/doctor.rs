use super::{CliError, EXIT_FAILURE, EXIT_SUCCESS};
use opensourcer_core::{Catalog, Config};
use opensourcer_store::{DeploymentStatus, DeploymentStore, HomeLayout};

pub fn run(layout: &HomeLayout, config: &Config, json_output: bool) -> Result<u8, CliError> {
    let mut checks: Vec<Check> = Vec::new();
    let mut all_pass = true;

    check_engine(config, &mut checks, &mut all_pass);
    check_git(&mut checks, &mut all_pass);
    check_catalog(layout, &mut checks);
    check_state(layout, &mut checks, &mut all_pass);

    print_results(&checks, all_pass, json_output)
}

fn check_engine(config: &Config, checks: &mut Vec<Check>, all_pass: &mut bool) {
    let missing = opensourcer_runtime::check_engine_prereqs(&config.engine);
    if !missing.is_empty() {
        *all_pass = false;
        checks.push(Check::fail(
            "engine_prereqs",
            &opensourcer_runtime::format_missing(&missing),
        ));
        return;
    }

    match opensourcer_runtime::select_engine(&config.engine) {
        Ok(engine) if engine.available() => checks.push(Check::pass(
            "engine",
            &format!("Container engine '{}' is reachable", engine.name()),
        )),
        Ok(engine) => {
            *all_pass = false;
            checks.push(Check::fail(
                "engine",
                &format!(
                    "Container engine '{}' is installed but not responding (is the daemon running?)",
                    engine.name()
                ),
            ));
        }
        Err(e) => {
            *all_pass = false;
            checks.push(Check::fail("engine", &e.to_string()));
        }
    }
}

fn check_git(checks: &mut Vec<Check>, all_pass: &mut bool) {
    let missing = opensourcer_runtime::check_git_prereqs();
    if missing.is_empty() {
        checks.push(Check::pass("git", "git is available for catalog updates"));
    } else {
        *all_pass = false;
        checks.push(Check::fail(
            "git",
            &opensourcer_runtime::format_missing(&missing),
        ));
    }
}

fn check_catalog(layout: &HomeLayout, checks: &mut Vec<Check>) {
    let catalog = Catalog::new(layout.catalog_dir());
    match catalog.list() {
        Ok(slugs) => checks.push(Check::pass(
            "catalog",
            &format!("Catalog present ({} entries)", slugs.len()),
        )),
        Err(_) => checks.push(Check::warn(
            "catalog",
            "Catalog not downloaded yet (run 'opensourcer update')",
        )),
    }
}

fn check_state(layout: &HomeLayout, checks: &mut Vec<Check>, all_pass: &mut bool) {
    let path = layout.state_file();
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            checks.push(Check::info(
                "state_file",
                "No deployments yet (state file will be created on first deploy)",
            ));
            return;
        }
        Err(e) => {
            *all_pass = false;
            checks.push(Check::fail(
                "state_file",
                &format!("Cannot read {}: {e}", path.display()),
            ));
            return;
        }
    };

    let parsed = serde_json::from_str::<serde_json::Value>(&content);
    if !matches!(&parsed, Ok(v) if v.get("deployments").is_some_and(serde_json::Value::is_array))
    {
        *all_pass = false;
        checks.push(Check::fail(
            "state_file",
            &format!(
                "{} is malformed and would be treated as empty",
                path.display()
            ),
        ));
        return;
    }

    let store = DeploymentStore::open(path);
    let deployments = store.snapshot();
    let running = deployments
        .iter()
        .filter(|d| d.status == DeploymentStatus::Running)
        .count();
    checks.push(Check::pass(
        "state_file",
        &format!("{} deployments tracked ({running} running)", deployments.len()),
    ));
}

fn print_results(checks: &[Check], all_pass: bool, json_output: bool) -> Result<u8, CliError> {
    if json_output {
        let json = serde_json::json!({
            "healthy": all_pass,
            "checks": checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "status": c.status,
                "message": c.message,
            })).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?
        );
    } else {
        println!("Opensourcer Doctor\n");
        for check in checks {
            let icon = match check.status {
                "pass" => "✓",
                "fail" => "✗",
                "warn" => "⚠",
                _ => "ℹ",
            };
            println!("  {icon} {}", check.message);
        }
        println!();
        if all_pass {
            println!("All checks passed.");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }
    Ok(if all_pass { EXIT_SUCCESS } else { EXIT_FAILURE })
}

struct Check {
    name: &'static str,
    status: &'static str,
    message: String,
}

impl Check {
    fn new(name: &'static str, status: &'static str, message: &str) -> Self {
        Self {
            name,
            status,
            message: message.to_owned(),
        }
    }

    fn pass(name: &'static str, message: &str) -> Self {
        Self::new(name, "pass", message)
    }

    fn fail(name: &'static str, message: &str) -> Self {
        Self::new(name, "fail", message)
    }

    fn warn(name: &'static str, message: &str) -> Self {
        Self::new(name, "warn", message)
    }

    fn info(name: &'static str, message: &str) -> Self {
        Self::new(name, "info", message)
    }
}
