//! Repology Wikidata bot CLI
//!
//! Compares Repology package data with Wikidata claims, writes reports and
//! optionally adds missing package claims to Wikidata.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::Parser;
use repology_wikidata_bot::{
    error::Result,
    models::{Blacklist, Config},
    pipeline::{self, ActionPerformer, AnalysisOptions, report},
    reports,
    services::RepologyClient,
    store::WikidataStore,
};

/// Repology to Wikidata package reconciliation bot
#[derive(Parser, Debug)]
#[command(
    name = "repology-wikidata-bot",
    version,
    about = "Reconcile Wikidata package properties with Repology"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Repology projects API endpoint
    #[arg(long)]
    repology_api: Option<String>,

    /// First project to process
    #[arg(short, long)]
    from: Option<String>,

    /// Last project to process
    #[arg(short, long)]
    to: Option<String>,

    /// Project name or Wikidata item to skip
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// File with project names or Wikidata items to skip, one per line
    #[arg(short, long = "blacklist")]
    blacklist: Vec<PathBuf>,

    /// Only report, never modify Wikidata
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Apply changes without asking for confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Increase verbosity (-v shows URLs, -vv enables debug logs)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Only check these repositories or properties
    #[arg(short, long = "repo")]
    repo: Vec<String>,

    /// Write an HTML report to this path
    #[arg(long)]
    html: Option<PathBuf>,

    /// Write a JSON report to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Maximum Repology values per mapping before additions are skipped
    #[arg(long)]
    max_entries: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: u8) {
    let level = if verbose > 1 { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Configuration with file, environment and flag overrides applied.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if cli.config.exists() {
        let config = Config::load(&cli.config)?;
        log::info!("Loaded configuration from {}", cli.config.display());
        config
    } else {
        Config::load_or_default(&cli.config)
    };

    config.apply_env();
    if let Some(api_url) = &cli.repology_api {
        config.repology.api_url = api_url.clone();
    }
    if let Some(max_entries) = cli.max_entries {
        config.set_max_entries(max_entries);
    }
    config.validate()?;
    Ok(config)
}

fn load_blacklist(cli: &Cli) -> Result<Blacklist> {
    let mut blacklist = Blacklist::default();
    for path in &cli.blacklist {
        blacklist.merge(Blacklist::load(path)?);
    }
    blacklist.extend(&cli.exclude);
    if !blacklist.is_empty() {
        log::info!("Excluding {} projects or items", blacklist.len());
    }
    Ok(blacklist)
}

fn confirm(count: usize) -> Result<bool> {
    eprint!("Apply {count} actions? [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes"))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let blacklist = load_blacklist(&cli)?;

    let source = RepologyClient::new(&config.repology)?;
    let store = WikidataStore::new(&config.wikidata)?;

    let options = AnalysisOptions {
        from: cli.from.clone(),
        to: cli.to.clone(),
        repo_filter: cli.repo.clone(),
        show_progress: !cli.quiet && io::stderr().is_terminal(),
    };

    let analysis = pipeline::run_analysis(&source, &store, &config, blacklist, &options).await?;
    let items = pipeline::aggregate_report(analysis.actions);

    let color = !cli.no_color && io::stderr().is_terminal();
    eprint!(
        "{}",
        reports::format_text_report(&items, cli.verbose > 0, color)
    );

    if let Some(path) = &cli.html {
        std::fs::write(path, reports::format_html_report(&items))?;
        log::info!("HTML report saved to {}", path.display());
    }
    if let Some(path) = &cli.json {
        std::fs::write(path, reports::format_json_report(&items)?)?;
        log::info!("JSON report saved to {}", path.display());
    }

    log::info!(
        "{} projects, {} items, {} report entries, {} actions",
        analysis.projects_seen,
        analysis.keys,
        items.len(),
        report::action_count(&items)
    );
    for (kind, count) in report::count_by_kind(&items) {
        log::info!("    {kind}: {count}");
    }

    let performable = items
        .iter()
        .flat_map(|item| &item.actions)
        .filter(|action| pipeline::is_performable(action))
        .count();

    if cli.dry_run || performable == 0 {
        log::info!("Nothing applied");
        return Ok(());
    }

    if !cli.yes && !confirm(performable)? {
        log::info!("Skipping changes");
        return Ok(());
    }

    let performer = ActionPerformer::new(&store, config.wikidata.edit_summary.as_str());
    let summary = performer.perform_all(&items).await;
    log::info!(
        "Applied {} actions, {} failed",
        summary.applied,
        summary.failed
    );

    Ok(())
}
