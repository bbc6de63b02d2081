use super::{json_pretty, orchestrator, with_spinner, CliError, EXIT_SUCCESS};
use opensourcer_core::{Config, DeployRequest};
use opensourcer_store::HomeLayout;

pub fn run(
    layout: &HomeLayout,
    config: &Config,
    software: &str,
    target: &str,
    inputs: Vec<(String, String)>,
    json: bool,
) -> Result<u8, CliError> {
    let mut orch = orchestrator(layout, config)?;
    let request = DeployRequest {
        software: software.to_owned(),
        target: target.to_owned(),
        inputs: inputs.into_iter().collect(),
    };

    let outcome = with_spinner(
        json,
        &format!("deploying {software}..."),
        &format!("{software} deployed"),
        "deploy failed",
        || orch.deploy(&request),
    )?;
    let dep = &outcome.deployment;

    if json {
        let credentials: serde_json::Map<_, _> = outcome
            .credentials
            .iter()
            .map(|(label, value)| (label.clone(), serde_json::Value::from(value.as_str())))
            .collect();
        let payload = serde_json::json!({
            "deployment": dep,
            "url": dep.url(),
            "credentials": credentials,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("deployed {} ({})", outcome.definition.name, dep.short_id());
    match dep.url() {
        Some(url) => println!("url:        {url}"),
        None => println!("url:        (no known port; check the composition)"),
    }
    println!("directory:  {}", dep.directory.display());
    if !outcome.credentials.is_empty() {
        println!();
        println!("generated credentials (also stored in {}/.env):", dep.directory.display());
        for (label, value) in &outcome.credentials {
            println!("  {label:<16} {value}");
        }
    }
    Ok(EXIT_SUCCESS)
}
