use super::{json_pretty, orchestrator, with_spinner, CliError, EXIT_SUCCESS};
use opensourcer_core::Config;
use opensourcer_store::HomeLayout;

pub fn run(
    layout: &HomeLayout,
    config: &Config,
    software: &str,
    force: bool,
    json: bool,
) -> Result<u8, CliError> {
    let mut orch = orchestrator(layout, config)?;
    let dep = with_spinner(
        json,
        &format!("destroying {software}..."),
        &format!("{software} destroyed"),
        "destroy failed",
        || orch.destroy(software, force),
    )?;
    if json {
        let payload = serde_json::json!({
            "id": dep.id,
            "software": dep.software,
            "status": "destroyed",
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("destroyed {software} ({})", dep.short_id());
    }
    Ok(EXIT_SUCCESS)
}
