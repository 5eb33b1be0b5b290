//! Categories command implementation

use std::process::ExitCode;

use console::Style;
use rescat::error::Result;

use super::helpers::Session;
use crate::cli::CategoriesArgs;

pub fn run(session: &Session, args: &CategoriesArgs) -> Result<ExitCode> {
    if let Some(category) = &args.category {
        return list_members(session, category);
    }

    let tree = session.service.categories(&session.catalog);
    if tree.is_empty() {
        println!("Catalog is empty.");
        return Ok(ExitCode::SUCCESS);
    }

    for summary in tree.summary() {
        println!(
            "{} {}",
            Style::new().bold().yellow().apply_to(&summary.name),
            Style::new().dim().apply_to(format!("({})", summary.count))
        );
        for (name, count) in &summary.subcategories {
            println!("  {name} {}", Style::new().dim().apply_to(format!("({count})")));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn list_members(session: &Session, category: &str) -> Result<ExitCode> {
    let (primary, secondary) = match category.trim_matches('/').split_once('/') {
        Some((primary, secondary)) => (primary, Some(secondary)),
        None => (category.trim_matches('/'), None),
    };

    let members = session.catalog.in_category(primary, secondary);
    if members.is_empty() {
        eprintln!("No resources in category '{category}'.");
        return Ok(ExitCode::FAILURE);
    }

    for resource in members {
        println!(
            "{} {}",
            Style::new().yellow().apply_to(&resource.id),
            Style::new().cyan().apply_to(resource.resource_type.as_str())
        );
    }
    Ok(ExitCode::SUCCESS)
}
