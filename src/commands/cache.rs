//! Cache command implementation

use std::process::ExitCode;

use rescat::cache::CacheStats;
use rescat::error::Result;
use rescat::operations::CatalogService;

use crate::cli::{CacheArgs, CacheSubcommand};

pub fn run(service: &CatalogService, args: &CacheArgs) -> Result<ExitCode> {
    match args.command {
        Some(CacheSubcommand::Clear) => {
            service.clear_cache()?;
            println!("Cache cleared successfully.");
        }
        Some(CacheSubcommand::Stats) | None => show_cache_stats(service)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn memory_line(label: &str, stats: &CacheStats) {
    let rate = stats
        .hit_rate()
        .map(|rate| format!(", {:.0}% hits", rate * 100.0))
        .unwrap_or_default();
    println!(
        "  {label:<10} {} entries, {}{rate}",
        stats.entries,
        stats.formatted_size()
    );
}

fn show_cache_stats(service: &CatalogService) -> Result<()> {
    let report = service.cache_report();
    let settings = &service.config().cache;

    println!("Cache Statistics:");
    match &report.disk {
        Some(usage) => {
            println!("  Location: {}", settings.root()?.display());
            println!("  Entries: {}", usage.files);
            println!("  Size: {}", usage.formatted_size());
            println!("  TTL: {}s", settings.ttl_secs);
        }
        None => println!("  Disk cache disabled."),
    }

    println!();
    println!("In-memory (this process):");
    memory_line("records", &report.records);
    memory_line("builds", &report.builds);
    memory_line("searches", &report.searches);
    memory_line("artifacts", &report.artifacts);
    memory_line("total", &report.memory_total());

    if report.disk.is_some_and(|usage| usage.files > 0) {
        println!("\nRun 'rescat cache clear' to remove everything from cache.");
    }
    Ok(())
}
