use super::{json_pretty, with_spinner, CliError, EXIT_SUCCESS};
use opensourcer_core::{sync_catalog, Config, CoreError};
use opensourcer_store::HomeLayout;

pub fn run(layout: &HomeLayout, config: &Config, json: bool) -> Result<u8, CliError> {
    let catalog_dir = layout.catalog_dir();
    let outcome = with_spinner(
        json,
        "synchronizing catalog...",
        "catalog synchronized",
        "catalog synchronization failed",
        || sync_catalog(&catalog_dir, &config.catalog_url).map_err(CoreError::from),
    )?;

    if json {
        let payload = serde_json::json!({
            "catalog": catalog_dir,
            "url": config.catalog_url,
            "outcome": outcome.to_string(),
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("catalog {outcome}: {}", catalog_dir.display());
    }
    Ok(EXIT_SUCCESS)
}
