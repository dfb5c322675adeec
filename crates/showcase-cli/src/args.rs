use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "showcase")]
#[command(about = "Static showcase page generator for the tool catalog")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root (default: current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the showcase HTML page from the catalog
    Render {
        /// Catalog file (default: paths.catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Category config file (default: paths.categories)
        #[arg(long)]
        categories: Option<PathBuf>,

        /// Output HTML file (default: paths.output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Custom Handlebars template (default: builtin page)
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Scan server directories and regenerate the catalog
    Scan {
        /// Servers directory (default: paths.servers)
        #[arg(long)]
        servers: Option<PathBuf>,

        /// Category config file (default: paths.categories)
        #[arg(long)]
        categories: Option<PathBuf>,

        /// Output catalog file (default: paths.catalog)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Dry run (print the summary, don't write the catalog)
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Show catalog statistics and per-category counts
    Summary {
        /// Catalog file (default: paths.catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Category config file (default: paths.categories)
        #[arg(long)]
        categories: Option<PathBuf>,
    },

    /// List tools whose category falls back to the default
    Check {
        /// Catalog file (default: paths.catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Category config file (default: paths.categories)
        #[arg(long)]
        categories: Option<PathBuf>,
    },

    /// List configured categories
    Categories {
        /// Category config file (default: paths.categories)
        #[arg(long)]
        categories: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., paths.output, site.title)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key
        key: String,

        /// Value to set
        value: String,
    },

    /// List all config values
    List,

    /// Initialize showcase.toml with defaults
    Init,

    /// Show config file path
    Path,
}
