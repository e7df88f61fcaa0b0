mod pipeline;
mod scrape;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shelfscan_scraper::DedupKey;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shelfscan")]
#[command(about = "Scrape retailer search results into a product spreadsheet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List supported retailers with their market and base URL
    Retailers,
    /// Fetch search results for a brand and category and export them
    Scrape(ScrapeArgs),
}

#[derive(Debug, Args)]
struct ScrapeArgs {
    /// Retailer identifier, e.g. amazon.de or meds.se
    #[arg(long, env = "SHELFSCAN_RETAILER")]
    retailer: String,

    #[arg(long)]
    brand: String,

    #[arg(long)]
    category: String,

    /// Query sent to the retailer; defaults to "<brand> <category>"
    #[arg(long)]
    search_term: Option<String>,

    /// Number of result pages to fetch (default 2)
    #[arg(long)]
    max_pages: Option<u32>,

    /// Output file; defaults to SHELFSCAN_OUTPUT_TEMPLATE rendered for this run
    #[arg(long)]
    output: Option<PathBuf>,

    /// Field deciding that two listings are the same product
    #[arg(long, default_value = "link")]
    dedup_key: DedupKey,

    /// Read pages from a JSON feed file instead of fetching over HTTP
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Copy the feed file into this directory after a successful export
    #[arg(long, requires = "feed")]
    archive_dir: Option<PathBuf>,

    /// Parse pages on multiple threads
    #[arg(long)]
    parallel: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = shelfscan_core::load_app_config()?;
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Retailers => scrape::print_retailers(),
        Commands::Scrape(args) => scrape::run_scrape(&config, args).await?,
    }

    Ok(())
}
