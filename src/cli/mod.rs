//! CLI definitions using clap derive API
//!
//! Argument types live in one submodule per command group:
//! - query: search, show and browse arguments
//! - install: plan and install arguments
//! - cache: cache arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod cache;
pub mod install;
pub mod query;

pub use cache::{CacheArgs, CacheSubcommand};
pub use install::{InstallArgs, PlanArgs};
pub use query::{BrowseArgs, CategoriesArgs, SearchArgs, ShowArgs};

/// Catalog file read when `--catalog` is not given
pub const DEFAULT_CATALOG: &str = "catalog.yaml";

/// rescat - resource catalog for AI coding platforms
#[derive(Parser, Debug)]
#[command(
    name = "rescat",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Search, resolve and install resources from a catalog",
    long_about = "rescat indexes a catalog of agents, commands, hooks, templates and MCP servers, \
                  searches it, resolves dependencies into install order and installs the result \
                  atomically.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  rescat search react                   \x1b[90m# Ranked search\x1b[0m\n   \
                  rescat browse --sort updated --desc   \x1b[90m# Recently updated first\x1b[0m\n   \
                  rescat plan web-server                \x1b[90m# Show install order\x1b[0m\n   \
                  rescat install web-server --rollback  \x1b[90m# All or nothing install\x1b[0m\n"
)]
pub struct Cli {
    /// Catalog file (YAML or JSON)
    #[arg(long, short = 'c', global = true, env = "RESCAT_CATALOG", default_value = DEFAULT_CATALOG)]
    pub catalog: PathBuf,

    /// Configuration file (defaults to ./rescat.yaml, then RESCAT_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog by identifier, name and description
    Search(SearchArgs),

    /// Show one resource
    Show(ShowArgs),

    /// List categories with resource counts, or the resources of one category
    Categories(CategoriesArgs),

    /// List resources with filters and sorting
    Browse(BrowseArgs),

    /// Resolve dependencies and print install order
    Plan(PlanArgs),

    /// Install resources and their dependencies
    Install(InstallArgs),

    /// Inspect or clear caches
    Cache(CacheArgs),

    /// Show version information
    #[command(hide = true)]
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_search() {
        let cli = Cli::try_parse_from(["rescat", "search", "react", "--limit", "3"]).unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, vec!["react".to_string()]);
                assert_eq!(args.limit, 3);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_parsing_multi_word_search() {
        let cli = Cli::try_parse_from(["rescat", "search", "react", "hooks"]).unwrap();
        match cli.command {
            Commands::Search(args) => assert_eq!(args.joined_query(), "react hooks"),
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_parsing_browse() {
        let cli = Cli::try_parse_from([
            "rescat", "browse", "--sort", "updated", "--desc", "--filter", "type=agent",
            "--filter", "category=dev",
        ])
        .unwrap();
        match cli.command {
            Commands::Browse(args) => {
                assert_eq!(args.sort.as_deref(), Some("updated"));
                assert!(args.desc);
                assert_eq!(args.filters, vec!["type=agent", "category=dev"]);
            }
            _ => panic!("Expected Browse command"),
        }
    }

    #[test]
    fn test_cli_parsing_install() {
        let cli = Cli::try_parse_from([
            "rescat", "install", "web-server", "auth", "--dest", "/tmp/project", "--rollback",
            "--jobs", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.ids, vec!["web-server", "auth"]);
                assert_eq!(args.dest, Some(PathBuf::from("/tmp/project")));
                assert!(args.rollback);
                assert!(!args.overwrite);
                assert_eq!(args.jobs, Some(2));
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_install_requires_ids() {
        assert!(Cli::try_parse_from(["rescat", "install"]).is_err());
    }

    #[test]
    fn test_cli_global_catalog() {
        let cli = Cli::try_parse_from(["rescat", "categories", "--catalog", "other.json", "-v"])
            .unwrap();
        assert_eq!(cli.catalog, PathBuf::from("other.json"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Categories(ref args) if args.category.is_none()));
    }

    #[test]
    fn test_cli_parsing_categories_path() {
        let cli = Cli::try_parse_from(["rescat", "categories", "dev/frontend"]).unwrap();
        match cli.command {
            Commands::Categories(args) => {
                assert_eq!(args.category.as_deref(), Some("dev/frontend"));
            }
            _ => panic!("Expected Categories command"),
        }
    }

    #[test]
    fn test_cli_parsing_cache() {
        let cli = Cli::try_parse_from(["rescat", "cache", "clear"]).unwrap();
        match cli.command {
            Commands::Cache(args) => {
                assert!(matches!(args.command, Some(CacheSubcommand::Clear)));
            }
            _ => panic!("Expected Cache command"),
        }
    }
}
