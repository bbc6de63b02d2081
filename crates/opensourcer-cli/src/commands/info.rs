use super::{json_pretty, CliError, EXIT_SUCCESS};
use opensourcer_core::{env_var_name, Catalog, CoreError};
use opensourcer_store::HomeLayout;

pub fn run(layout: &HomeLayout, software: &str, json: bool) -> Result<u8, CliError> {
    let catalog = Catalog::new(layout.catalog_dir());
    let def = catalog
        .resolve(software)
        .map_err(CoreError::from)?;

    if json {
        println!("{}", json_pretty(&def)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("slug:         {}", def.slug);
    println!("name:         {}", def.name);
    if !def.category.is_empty() {
        println!("category:     {}", def.category);
    }
    if !def.website.is_empty() {
        println!("website:      {}", def.website);
    }
    if !def.description.is_empty() {
        println!("description:  {}", def.description);
    }
    let exposed: Vec<_> = def.exposed_services().map(String::as_str).collect();
    if !exposed.is_empty() {
        println!("exposed:      {}", exposed.join(", "));
    }
    if def.inputs.is_empty() {
        println!("inputs:       (none)");
    } else {
        println!("inputs:");
        for (key, spec) in &def.inputs {
            let mut flags = Vec::new();
            if spec.required {
                flags.push("required");
            }
            if spec.is_secret() {
                flags.push("generated if empty");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };
            println!("  --set {key}=...  ({}){flags}", env_var_name(key));
            if !spec.label.is_empty() {
                println!("      {}", spec.label);
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
