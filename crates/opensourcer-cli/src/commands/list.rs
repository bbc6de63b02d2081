use super::{colorize_status, json_pretty, orchestrator, CliError, EXIT_SUCCESS};
use opensourcer_core::Config;
use opensourcer_store::HomeLayout;

pub fn run(layout: &HomeLayout, config: &Config, json: bool) -> Result<u8, CliError> {
    let orch = orchestrator(layout, config)?;
    let deployments = orch.list();
    if json {
        println!("{}", json_pretty(&deployments)?);
    } else if deployments.is_empty() {
        println!("no deployments found");
    } else {
        println!("{:<10} {:<20} {:<10} URL", "ID", "SOFTWARE", "STATUS");
        for dep in deployments {
            let status = colorize_status(&dep.status.to_string());
            println!(
                "{:<10} {:<20} {:<10} {}",
                dep.short_id(),
                dep.software,
                status,
                dep.url().unwrap_or_default()
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
