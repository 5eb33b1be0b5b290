//! Browse command implementation

use std::process::ExitCode;

use console::Style;
use rescat::catalog::{BrowseQuery, Filter, SortField};
use rescat::error::Result;

use super::helpers::Session;
use crate::cli::BrowseArgs;

/// Turn command line arguments into a query, rejecting unknown fields
pub fn query(args: &BrowseArgs) -> Result<BrowseQuery> {
    let mut query = BrowseQuery::default();
    if let Some(sort) = &args.sort {
        query = query.sorted_by(sort.parse::<SortField>()?);
    }
    if args.desc {
        query = query.descending();
    }
    for filter in &args.filters {
        query = query.filter(filter.parse::<Filter>()?);
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }
    Ok(query)
}

pub fn run(session: &Session, args: &BrowseArgs) -> Result<ExitCode> {
    let query = query(args)?;
    let resources = session.service.browse(&session.catalog, &query);

    if resources.is_empty() {
        println!("No resources match.");
        return Ok(ExitCode::SUCCESS);
    }

    for resource in resources {
        println!(
            "{}  {}  {}",
            Style::new().bold().yellow().apply_to(&resource.id),
            Style::new().cyan().apply_to(resource.resource_type.as_str()),
            Style::new().dim().apply_to(resource.display_name()),
        );
    }
    Ok(ExitCode::SUCCESS)
}
