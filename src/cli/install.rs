use clap::Parser;
use std::path::PathBuf;

/// Arguments for the plan command
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Resource identifiers to resolve
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install with dependencies into the current directory:\n    rescat install web-server\n\n\
                  Install into another project:\n    rescat install web-server --dest ../app\n\n\
                  Replace existing files, undo everything on failure:\n    rescat install web-server --overwrite --rollback")]
pub struct InstallArgs {
    /// Resource identifiers to install
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,

    /// Project root receiving `.claude/` (defaults to current directory)
    #[arg(long, short = 'd')]
    pub dest: Option<PathBuf>,

    /// Replace files that are already installed
    #[arg(long)]
    pub overwrite: bool,

    /// Undo the whole batch if any resource fails
    #[arg(long)]
    pub rollback: bool,

    /// Concurrent fetches
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,
}
