use super::{colorize_status, json_pretty, orchestrator, CliError, EXIT_SUCCESS};
use opensourcer_core::Config;
use opensourcer_store::HomeLayout;

pub fn run(
    layout: &HomeLayout,
    config: &Config,
    software: &str,
    json: bool,
) -> Result<u8, CliError> {
    let orch = orchestrator(layout, config)?;
    let dep = orch.inspect(software)?;
    if json {
        println!("{}", json_pretty(dep)?);
    } else {
        println!("id:          {}", dep.id);
        println!("software:    {}", dep.software);
        println!("target:      {}", dep.target);
        println!("status:      {}", colorize_status(&dep.status.to_string()));
        println!("url:         {}", dep.url().as_deref().unwrap_or("(unknown)"));
        println!("directory:   {}", dep.directory.display());
        if !dep.inputs.is_empty() {
            let keys: Vec<_> = dep.inputs.keys().map(String::as_str).collect();
            println!("inputs:      {}", keys.join(", "));
        }
        println!("created_at:  {}", dep.created_at.to_rfc3339());
        println!("updated_at:  {}", dep.updated_at.to_rfc3339());
    }
    Ok(EXIT_SUCCESS)
}
