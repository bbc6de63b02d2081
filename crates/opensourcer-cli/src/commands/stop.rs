use super::{json_pretty, orchestrator, with_spinner, CliError, EXIT_SUCCESS};
use opensourcer_core::Config;
use opensourcer_store::HomeLayout;

pub fn run(
    layout: &HomeLayout,
    config: &Config,
    software: &str,
    json: bool,
) -> Result<u8, CliError> {
    let mut orch = orchestrator(layout, config)?;
    let dep = with_spinner(
        json,
        &format!("stopping {software}..."),
        &format!("{software} stopped"),
        "stop failed",
        || orch.stop(software),
    )?;
    if json {
        println!("{}", json_pretty(&dep)?);
    } else {
        println!("stopped {software} ({})", dep.short_id());
    }
    Ok(EXIT_SUCCESS)
}
