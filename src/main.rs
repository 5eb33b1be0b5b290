//! rescat - resource catalog for AI coding platforms
//!
//! Command line front end: search, browse, resolve and install resources
//! from a YAML or JSON catalog.

use std::process::ExitCode;

use clap::Parser;
use rescat::error::Result;

mod cli;
mod commands;
mod logging;
mod progress;

use cli::{Cli, Commands};
use commands::helpers;

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    let config = cli.config.as_deref();
    let open = || helpers::open(&cli.catalog, config);

    match cli.command {
        Commands::Search(args) => commands::search::run(&open()?, &args),
        Commands::Show(args) => commands::show::run(&open()?, &args),
        Commands::Categories(args) => commands::categories::run(&open()?, &args),
        Commands::Browse(args) => commands::browse::run(&open()?, &args),
        Commands::Plan(args) => commands::plan::run(&open()?, &args),
        Commands::Install(args) => commands::install::run(&open()?, args).await,
        Commands::Cache(args) => commands::cache::run(&helpers::service(config)?, &args),
        Commands::Version => commands::version::run(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
