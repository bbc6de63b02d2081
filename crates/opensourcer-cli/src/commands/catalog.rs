use super::{json_pretty, CliError, EXIT_SUCCESS};
use opensourcer_core::{Catalog, CoreError};
use opensourcer_store::HomeLayout;

pub fn run(layout: &HomeLayout, json: bool) -> Result<u8, CliError> {
    let catalog = Catalog::new(layout.catalog_dir());
    let definitions = catalog
        .definitions()
        .map_err(CoreError::from)?;

    if json {
        let entries: Vec<_> = definitions
            .iter()
            .map(|d| {
                serde_json::json!({
                    "slug": d.slug,
                    "name": d.name,
                    "category": d.category,
                    "description": d.description,
                })
            })
            .collect();
        println!("{}", json_pretty(&entries)?);
    } else if definitions.is_empty() {
        println!("catalog is empty");
    } else {
        println!("{:<20} {:<24} {:<16}", "SLUG", "NAME", "CATEGORY");
        for d in &definitions {
            println!("{:<20} {:<24} {:<16}", d.slug, d.name, d.category);
        }
    }
    Ok(EXIT_SUCCESS)
}
