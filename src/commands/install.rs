//! Install command implementation
//!
//! Resolves the requested identifiers, installs the plan with a progress
//! bar, and prints one line per resource in plan order. Ctrl-C cancels
//! the batch between resources.

use std::process::ExitCode;

use console::Style;
use rescat::error::Result;
use rescat::installer::{InstallReport, InstallState};

use super::helpers::{self, Session};
use super::plan::warn_unresolved;
use crate::cli::InstallArgs;
use crate::progress::ProgressDisplay;

pub async fn run(session: &Session, args: InstallArgs) -> Result<ExitCode> {
    let plan = session.service.plan(&session.catalog, &args.ids)?;
    warn_unresolved(&plan);
    if plan.is_empty() {
        eprintln!("Nothing to install.");
        return Ok(ExitCode::FAILURE);
    }

    let dest = helpers::resolve_dest(args.dest)?;
    let mut options = session.service.config().install.options();
    options.overwrite |= args.overwrite;
    options.rollback_on_error |= args.rollback;
    if let Some(jobs) = args.jobs {
        options.parallel_fetches = jobs.max(1);
    }

    let progress = ProgressDisplay::new(plan.len());
    let installer = session
        .service
        .installer(&dest)
        .with_options(options)
        .with_observer(progress.observer());

    let cancel = installer.cancellation();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    let result = installer.install(&plan).await;
    interrupt.abort();

    let report = match result {
        Ok(report) => {
            progress.finish();
            report
        }
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    print_report(&report);
    Ok(if report.is_success() && plan.unresolved.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_report(report: &InstallReport) {
    for outcome in &report.outcomes {
        let marker = match &outcome.state {
            InstallState::Succeeded => Style::new().green().apply_to("✓"),
            InstallState::Skipped => Style::new().dim().apply_to("-"),
            InstallState::Failed { .. } => Style::new().red().apply_to("✗"),
            _ => Style::new().yellow().apply_to("·"),
        };
        let cached = if outcome.from_cache { " (cached)" } else { "" };
        println!(
            "{marker} {}  {}{}",
            Style::new().bold().apply_to(&outcome.id),
            outcome.state,
            Style::new().dim().apply_to(cached)
        );
        if let (InstallState::Succeeded, Some(path)) = (&outcome.state, &outcome.destination) {
            println!("    {}", Style::new().dim().apply_to(path.display()));
        }
    }

    println!();
    println!(
        "Installed {}, skipped {}, failed {} in {:.2?}",
        report.succeeded(),
        report.skipped(),
        report.failed(),
        report.elapsed
    );
    if report.rolled_back {
        println!(
            "{} rolled back {} resource(s) after a failure",
            Style::new().yellow().bold().apply_to("note:"),
            report.rolled_back_count()
        );
    }
    if report.cancelled {
        println!(
            "{} cancelled, {} resource(s) not attempted",
            Style::new().yellow().bold().apply_to("note:"),
            report.not_attempted()
        );
    }
}
