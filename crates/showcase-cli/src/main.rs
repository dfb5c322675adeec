use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing::debug;

use showcase_core::aggregate::{aggregate, category_fallbacks, FallbackReason};
use showcase_core::catalog::{Catalog, ToolRecord};
use showcase_core::category::CategoryConfig;
use showcase_core::config::{resolve_path, ShowcaseConfig};
use showcase_core::render::{ShowcasePage, ShowcaseRenderer};
use showcase_core::scan::RegistryScanner;
use showcase_core::{Result, ShowcaseError};

mod args;
mod logging;
use args::{Cli, Commands, ConfigAction, Shell};

/// Sub-tools listed per row in the scan summary
const SUMMARY_TOOL_LIMIT: usize = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let root = resolve_root(cli.root);
    debug!("Project root: {}", root.display());

    let result = match cli.command {
        Some(Commands::Render {
            catalog,
            categories,
            output,
            template,
        }) => handle_render(
            &root,
            catalog.as_deref(),
            categories.as_deref(),
            output.as_deref(),
            template.as_deref(),
        ),
        Some(Commands::Scan {
            servers,
            categories,
            output,
            dry_run,
        }) => handle_scan(
            &root,
            servers.as_deref(),
            categories.as_deref(),
            output.as_deref(),
            dry_run,
        ),
        Some(Commands::Summary {
            catalog,
            categories,
        }) => handle_summary(&root, catalog.as_deref(), categories.as_deref()),
        Some(Commands::Check {
            catalog,
            categories,
        }) => handle_check(&root, catalog.as_deref(), categories.as_deref()),
        Some(Commands::Categories { categories }) => {
            handle_categories(&root, categories.as_deref())
        }
        Some(Commands::Config { action }) => handle_config(action, &root),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "showcase", &mut io::stdout());
}

fn resolve_root(cli_root: Option<PathBuf>) -> PathBuf {
    if let Some(root) = cli_root {
        return root;
    }

    if let Ok(root) = std::env::var("SHOWCASE_ROOT") {
        return PathBuf::from(root);
    }

    PathBuf::from(".")
}

/// CLI path if given, configured path otherwise, resolved against the root
fn pick_path(root: &Path, cli: Option<&Path>, configured: &Path) -> PathBuf {
    resolve_path(root, cli.unwrap_or(configured))
}

fn load_inputs(
    root: &Path,
    config: &ShowcaseConfig,
    catalog: Option<&Path>,
    categories: Option<&Path>,
) -> Result<(Catalog, CategoryConfig)> {
    let catalog_path = pick_path(root, catalog, &config.paths.catalog);
    let categories_path = pick_path(root, categories, &config.paths.categories);
    debug!(
        "Catalog: {}, categories: {}",
        catalog_path.display(),
        categories_path.display()
    );

    let categories = CategoryConfig::load(&categories_path)?;
    let catalog = Catalog::load(&catalog_path)?;
    Ok((catalog, categories))
}

fn handle_render(
    root: &Path,
    catalog: Option<&Path>,
    categories: Option<&Path>,
    output: Option<&Path>,
    template: Option<&Path>,
) -> Result<()> {
    let config = ShowcaseConfig::load(root)?;
    let (catalog, categories) = load_inputs(root, &config, catalog, categories)?;

    let output = pick_path(root, output, &config.paths.output);
    let renderer = match template.or(config.paths.template.as_deref()) {
        Some(path) => ShowcaseRenderer::from_file(&resolve_path(root, path))?,
        None => ShowcaseRenderer::new()?,
    };

    let aggregation = aggregate(&catalog.tools, &categories);
    let page = ShowcasePage::build(
        &catalog.tools,
        &aggregation,
        &categories,
        &config.site,
        chrono::Local::now().date_naive(),
    )?;
    renderer.render_to_file(&page, &output)?;

    println!();
    println!("{} {}", "Generated:".green(), output.display());
    println!(
        "Stats: {} tools in {} categories",
        aggregation.summary.collections,
        aggregation.view.len()
    );
    println!();

    Ok(())
}

fn handle_scan(
    root: &Path,
    servers: Option<&Path>,
    categories: Option<&Path>,
    output: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let config = ShowcaseConfig::load(root)?;
    let servers = pick_path(root, servers, &config.paths.servers);
    let categories = CategoryConfig::load(&pick_path(root, categories, &config.paths.categories))?;
    let output = pick_path(root, output, &config.paths.catalog);

    let catalog = RegistryScanner::new(&categories).scan(&servers)?;

    println!();
    println!("{}", "Tools Summary:".cyan().bold());
    println!("{}", "-".repeat(70));
    println!("{:20} {:20} {:30}", "Name", "Author", "Tools");
    println!("{}", "-".repeat(70));
    for tool in &catalog.tools {
        println!(
            "{} {:20} {:30}",
            format!("{:20}", tool.name).cyan(),
            tool.author,
            tool_preview(tool)
        );
    }
    println!();

    if dry_run {
        println!("{}", "(dry run)".yellow());
    } else {
        catalog.save(&output)?;
        println!("{} {}", "Written:".green(), output.display());
    }
    println!("Found {} tools", catalog.tools.len());

    Ok(())
}

/// First few sub-tools, with "..." when there are more
fn tool_preview(tool: &ToolRecord) -> String {
    let mut preview = tool
        .tools
        .iter()
        .take(SUMMARY_TOOL_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if tool.tools.len() > SUMMARY_TOOL_LIMIT {
        preview.push_str("...");
    }
    preview
}

fn handle_summary(root: &Path, catalog: Option<&Path>, categories: Option<&Path>) -> Result<()> {
    let config = ShowcaseConfig::load(root)?;
    let (catalog, categories) = load_inputs(root, &config, catalog, categories)?;
    let aggregation = aggregate(&catalog.tools, &categories);
    let summary = aggregation.summary;

    println!();
    println!("Collections:  {}", summary.collections.to_string().cyan().bold());
    println!("Tools:        {}", summary.tools.to_string().cyan().bold());
    println!("Contributors: {}", summary.contributors.to_string().cyan().bold());
    println!();

    if aggregation.view.is_empty() {
        println!("No tools in catalog.");
        return Ok(());
    }

    println!("By category:");
    for bucket in aggregation.view.buckets() {
        let label = match categories.get(bucket.id) {
            Some(info) => format!("{} {}", info.icon, info.name),
            None => bucket.id.to_string(),
        };
        println!(
            "  {} ({}): {}",
            label,
            bucket.id.dimmed(),
            bucket.tools.len()
        );
    }
    println!();

    Ok(())
}

fn handle_check(root: &Path, catalog: Option<&Path>, categories: Option<&Path>) -> Result<()> {
    let config = ShowcaseConfig::load(root)?;
    let (catalog, categories) = load_inputs(root, &config, catalog, categories)?;
    let fallbacks = category_fallbacks(&catalog.tools, &categories);

    println!();
    if fallbacks.is_empty() {
        println!("{}", "All tools have a configured category.".green());
        println!();
        return Ok(());
    }

    println!(
        "Tools shown under the default category '{}':",
        categories.default_category().cyan()
    );
    println!();
    for fallback in &fallbacks {
        let reason = match fallback.reason {
            FallbackReason::Missing => "no category".to_string(),
            FallbackReason::Unknown(id) => format!("unknown category '{}'", id),
        };
        println!(
            "  {} {} ({})",
            "[FALLBACK]".yellow(),
            fallback.record.name,
            reason.dimmed()
        );
    }
    println!();
    println!(
        "Summary: {} of {} tools fall back",
        fallbacks.len(),
        catalog.tools.len()
    );
    println!();

    Ok(())
}

fn handle_categories(root: &Path, categories: Option<&Path>) -> Result<()> {
    let config = ShowcaseConfig::load(root)?;
    let categories = CategoryConfig::load(&pick_path(root, categories, &config.paths.categories))?;

    println!();
    println!("Available categories:");
    println!();
    for (id, info) in categories.iter() {
        let marker = if id == categories.default_category() {
            " (default)".yellow().to_string()
        } else {
            String::new()
        };
        println!("  {} {}{}", info.icon, id.cyan().bold(), marker);
        println!("    Name: {}", info.name);
        if let Some(description) = &info.description {
            println!("    {}", description.dimmed());
        }
        println!();
    }

    Ok(())
}

fn handle_config(action: ConfigAction, root: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = ShowcaseConfig::load(root)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(ShowcaseError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = ShowcaseConfig::load(root)?;
            config.set(&key, &value)?;
            config.save(root)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = ShowcaseConfig::load(root)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = ShowcaseConfig::path(root);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = ShowcaseConfig::init(root)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
