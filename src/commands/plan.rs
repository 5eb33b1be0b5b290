//! Plan command implementation

use std::process::ExitCode;

use console::Style;
use rescat::error::Result;
use rescat::resolver::InstallPlan;

use super::helpers::Session;
use crate::cli::PlanArgs;

pub fn warn_unresolved(plan: &InstallPlan) {
    for id in &plan.unresolved {
        eprintln!(
            "{} unknown resource '{id}'",
            Style::new().yellow().bold().apply_to("warning:")
        );
    }
}

pub fn run(session: &Session, args: &PlanArgs) -> Result<ExitCode> {
    let plan = session.service.plan(&session.catalog, &args.ids)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        warn_unresolved(&plan);
        for (step, resource) in plan.resources.iter().enumerate() {
            println!(
                "{:>3}. {}  {}",
                step + 1,
                Style::new().bold().yellow().apply_to(&resource.id),
                Style::new().cyan().apply_to(resource.resource_type.as_str()),
            );
        }
    }

    Ok(if plan.unresolved.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
