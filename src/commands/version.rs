//! Version command implementation

use std::process::ExitCode;

use rescat::error::Result;

/// Run version command
pub fn run() -> Result<ExitCode> {
    println!("rescat {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Minimum Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());

    Ok(ExitCode::SUCCESS)
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
