use clap::Parser;

/// Arguments for the search command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Search by identifier prefix:\n    rescat search dev/front\n\n\
                  Typo-tolerant search:\n    rescat search recat\n\n\
                  Top three hits as JSON:\n    rescat search react --limit 3 --json")]
pub struct SearchArgs {
    /// Search text; several words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Maximum number of results
    #[arg(long, short = 'n', default_value_t = 10)]
    pub limit: usize,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn joined_query(&self) -> String {
        self.query.join(" ")
    }
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Resource identifier
    pub id: String,

    /// Print the resource as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the categories command
#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    /// List the resources of one category, e.g. `dev` or `dev/frontend`
    pub category: Option<String>,
}

/// Arguments for the browse command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Agents only:\n    rescat browse --filter type=agent\n\n\
                  One subcategory by name:\n    rescat browse --filter category=dev --filter subcategory=frontend --sort name\n\n\
                  Ten most recently updated:\n    rescat browse --sort updated --desc --limit 10")]
pub struct BrowseArgs {
    /// Sort field: id, name, type, category, updated
    #[arg(long, short = 's')]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Filter as field=value (type, category, subcategory); repeatable
    #[arg(long = "filter", short = 'f', value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}
