//! Search command implementation

use std::process::ExitCode;

use console::Style;
use rescat::error::Result;
use serde_json::json;

use super::helpers::Session;
use crate::cli::SearchArgs;

pub fn run(session: &Session, args: &SearchArgs) -> Result<ExitCode> {
    let query = args.joined_query();
    let hits = session.service.search(&session.catalog, &query, args.limit);

    if args.json {
        let rows: Vec<_> = hits
            .iter()
            .map(|hit| {
                json!({
                    "id": hit.resource.id,
                    "type": hit.resource.resource_type.as_str(),
                    "score": hit.score,
                    "match": hit.kind.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(ExitCode::SUCCESS);
    }

    if hits.is_empty() {
        println!("No resources match '{query}'.");
        return Ok(ExitCode::SUCCESS);
    }

    for hit in &hits {
        println!(
            "{:>3}  {}  {}",
            Style::new().dim().apply_to(hit.score),
            Style::new().bold().yellow().apply_to(&hit.resource.id),
            Style::new().cyan().apply_to(hit.resource.resource_type.as_str()),
        );
        if !hit.resource.description.is_empty() {
            println!("     {}", Style::new().dim().apply_to(&hit.resource.description));
        }
    }

    Ok(ExitCode::SUCCESS)
}
