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
        &format!("starting {software}..."),
        &format!("{software} started"),
        "start failed",
        || orch.start(software),
    )?;
    if json {
        println!("{}", json_pretty(&dep)?);
    } else {
        println!("started {software} ({})", dep.short_id());
        if let Some(url) = dep.url() {
            println!("url: {url}");
        }
    }
    Ok(EXIT_SUCCESS)
}
