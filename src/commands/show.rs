//! Show command implementation

use std::process::ExitCode;

use console::Style;
use rescat::domain::Resource;
use rescat::error::Result;

use super::helpers::Session;
use crate::cli::ShowArgs;

const SUGGESTIONS: usize = 3;

pub fn run(session: &Session, args: &ShowArgs) -> Result<ExitCode> {
    let Some(resource) = session.catalog.lookup_exact(&args.id) else {
        eprintln!("Resource '{}' not found in catalog.", args.id);
        let similar = session.service.search(&session.catalog, &args.id, SUGGESTIONS);
        if !similar.is_empty() {
            eprintln!("Did you mean:");
            for hit in similar {
                eprintln!("  {}", Style::new().yellow().apply_to(&hit.resource.id));
            }
        }
        return Ok(ExitCode::FAILURE);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(resource)?);
    } else {
        print_resource(resource);
    }
    Ok(ExitCode::SUCCESS)
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", Style::new().bold().apply_to(format!("{label}:")), value);
}

fn print_resource(resource: &Resource) {
    println!("{}", Style::new().bold().yellow().apply_to(&resource.id));
    field("Name", resource.display_name());
    field("Type", Style::new().cyan().apply_to(resource.resource_type.as_str()));
    field("Category", resource.category());
    if !resource.description.is_empty() {
        field("Description", &resource.description);
    }
    if let Some(version) = &resource.version {
        field("Version", version);
    }
    field("Source", &resource.source.location);
    if let Some(checksum) = &resource.source.checksum {
        field("Checksum", Style::new().dim().apply_to(checksum));
    }
    if !resource.dependencies.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Dependencies:"));
        for (name, id) in &resource.dependencies {
            if name == id {
                println!("    {id}");
            } else {
                println!("    {name} {}", Style::new().dim().apply_to(format!("({id})")));
            }
        }
    }
}
