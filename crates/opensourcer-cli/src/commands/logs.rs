use super::{orchestrator, CliError, EXIT_SUCCESS};
use opensourcer_core::Config;
use opensourcer_store::HomeLayout;

pub fn run(
    layout: &HomeLayout,
    config: &Config,
    software: &str,
    lines: Option<usize>,
) -> Result<u8, CliError> {
    let orch = orchestrator(layout, config)?;
    let output = match lines {
        Some(n) => orch.logs_tail(software, n),
        None => orch.logs(software),
    }?;
    print!("{output}");
    Ok(EXIT_SUCCESS)
}
