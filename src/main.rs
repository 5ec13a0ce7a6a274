//! Candidate-Sourcer main entry point
//!
//! This is the command-line interface for the candidate profile sourcer.

use anyhow::{bail, Context};
use candidate_sourcer::config::{default_config, load_config, Config};
use candidate_sourcer::url::{profile_public_id, site_domain};
use candidate_sourcer::{build_queries, SearchCriteria, UnifiedCrawler};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Candidate-Sourcer: polite candidate profile sourcing
///
/// Builds search queries from the given criteria, runs them against the
/// authenticated API when a session cookie is configured (falling back to a
/// public search engine otherwise), and prints the profiles found as JSON.
#[derive(Parser, Debug)]
#[command(name = "candidate-sourcer")]
#[command(version = "1.0.0")]
#[command(about = "Polite candidate profile sourcing", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skill or topic keyword (repeatable)
    #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
    keywords: Vec<String>,

    /// Job title (repeatable)
    #[arg(short = 't', long = "title", value_name = "TITLE")]
    titles: Vec<String>,

    /// Location (repeatable)
    #[arg(short = 'l', long = "location", value_name = "LOCATION")]
    locations: Vec<String>,

    /// Company (repeatable)
    #[arg(long = "company", value_name = "COMPANY")]
    companies: Vec<String>,

    /// Industry (repeatable)
    #[arg(long = "industry", value_name = "INDUSTRY")]
    industries: Vec<String>,

    /// Only candidates currently in the role
    #[arg(long)]
    current_only: bool,

    /// JSON file with search criteria; flags are appended to it
    #[arg(long, value_name = "JSON_FILE")]
    criteria: Option<PathBuf>,

    /// Maximum number of profiles to return
    #[arg(long, default_value_t = 25)]
    max_results: usize,

    /// Print the query plan without sending any requests
    #[arg(long, conflicts_with = "enrich")]
    dry_run: bool,

    /// Fetch the full profile for a public identifier (or profile URL) instead of searching
    #[arg(long, value_name = "PUBLIC_ID")]
    enrich: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => default_config().context("invalid default configuration")?,
    };

    if let Some(public_id) = &cli.enrich {
        return handle_enrich(&config, public_id).await;
    }

    let criteria = build_criteria(&cli)?;

    if cli.dry_run {
        return handle_dry_run(&criteria);
    }

    handle_search(&config, &criteria, cli.max_results).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only JSON.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("candidate_sourcer=info,warn"),
            1 => EnvFilter::new("candidate_sourcer=debug,info"),
            2 => EnvFilter::new("candidate_sourcer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges the optional criteria file with the command-line flags
fn build_criteria(cli: &Cli) -> anyhow::Result<SearchCriteria> {
    let mut criteria = match &cli.criteria {
        Some(path) => read_criteria(path)?,
        None => SearchCriteria::default(),
    };

    criteria.keywords.extend(cli.keywords.iter().cloned());
    criteria.titles.extend(cli.titles.iter().cloned());
    criteria.locations.extend(cli.locations.iter().cloned());
    criteria.companies.extend(cli.companies.iter().cloned());
    criteria.industries.extend(cli.industries.iter().cloned());
    criteria.current_only |= cli.current_only;

    criteria.validate()?;
    Ok(criteria)
}

fn read_criteria(path: &Path) -> anyhow::Result<SearchCriteria> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read criteria file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse criteria file {}", path.display()))
}

/// Handles the --dry-run mode: prints the query plan
fn handle_dry_run(criteria: &SearchCriteria) -> anyhow::Result<()> {
    let queries = build_queries(criteria);
    if queries.is_empty() {
        tracing::warn!("No titles or locations given; nothing would be searched");
    }
    println!("{}", serde_json::to_string_pretty(&queries)?);
    Ok(())
}

/// Handles the main search operation
async fn handle_search(
    config: &Config,
    criteria: &SearchCriteria,
    max_results: usize,
) -> anyhow::Result<()> {
    let crawler = UnifiedCrawler::new(config)?;

    let result = match crawler.search(criteria, max_results).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Search failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Found {} profiles using {} queries",
        result.profiles.len(),
        result.queries_used.len()
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Handles the --enrich mode: prints the full profile
async fn handle_enrich(config: &Config, public_id: &str) -> anyhow::Result<()> {
    let crawler = UnifiedCrawler::new(config)?;
    if !crawler.has_authenticated() {
        bail!("enrichment requires a session cookie (set LINKEDIN_LI_AT or linkedin.session-cookie)");
    }

    let public_id = resolve_public_id(config, public_id)?;
    match crawler.enrich_profile(&public_id).await {
        Some(profile) => {
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(())
        }
        None => bail!("no profile could be retrieved for {}", public_id),
    }
}

/// Accepts either a bare public identifier or a full profile URL
fn resolve_public_id(config: &Config, input: &str) -> anyhow::Result<String> {
    let input = input.trim();
    if !input.starts_with("http://") && !input.starts_with("https://") {
        return Ok(input.to_string());
    }

    let domain = site_domain(&config.linkedin.site_url)
        .with_context(|| format!("invalid site url {}", config.linkedin.site_url))?;
    let (public_id, _) = profile_public_id(input, &config.linkedin.site_url, &domain)?;
    Ok(public_id)
}
