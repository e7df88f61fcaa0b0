//! Command handlers for `shelfscan retailers` and `shelfscan scrape`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use shelfscan_core::{AppConfig, RetailerId, RetailerProfile, RunConfig};
use shelfscan_export::{archive_copy, render_output_path, CsvSink, OutputVars};
use shelfscan_scraper::{FeedFilePageSource, HttpPageSource};

use crate::pipeline::{Pipeline, RunOutcome, RunReport};
use crate::ScrapeArgs;

pub(crate) fn print_retailers() {
    println!("{:<12} {:<15} BASE URL", "RETAILER", "MARKET");
    for retailer in RetailerId::ALL {
        let profile = RetailerProfile::for_retailer(retailer);
        println!(
            "{:<12} {:<15} {}",
            retailer.domain(),
            profile.market_country,
            profile.base_url
        );
    }
}

/// Output path for a run: the explicit `--output`, or the configured template
/// rendered with the run's retailer, brand, category and date.
fn output_path(
    explicit: Option<&Path>,
    template: &str,
    retailer: RetailerId,
    brand: &str,
    category: &str,
    date: &str,
) -> PathBuf {
    explicit.map_or_else(
        || {
            render_output_path(
                template,
                &OutputVars {
                    retailer: retailer.domain(),
                    brand,
                    category,
                    date,
                },
            )
        },
        Path::to_path_buf,
    )
}

/// Runs one scrape and prints a summary line.
///
/// # Errors
///
/// Returns an error if the retailer is unsupported, the run configuration is
/// invalid, the page source fails as a whole, or the export cannot be written.
pub(crate) async fn run_scrape(config: &AppConfig, args: ScrapeArgs) -> anyhow::Result<()> {
    let retailer: RetailerId = args.retailer.parse()?;
    let today = chrono::Local::now().date_naive();

    let output = output_path(
        args.output.as_deref(),
        &config.output_template,
        retailer,
        &args.brand,
        &args.category,
        &today.format("%Y-%m-%d").to_string(),
    );
    let run = RunConfig::new(
        args.brand,
        args.category,
        args.search_term,
        args.max_pages,
        output,
    )?;

    let pipeline = Pipeline::new(&args.retailer, run.clone())?
        .with_dedup_key(args.dedup_key)
        .with_capture_date(today)
        .with_parallel_extraction(args.parallel);
    let mut sink = CsvSink::new(&run.output_path);

    tracing::info!(
        retailer = %pipeline.profile().retailer,
        market = pipeline.profile().market_country,
        brand = %run.brand,
        category = %run.category,
        "starting scrape"
    );

    let outcome = match &args.feed {
        Some(feed) => {
            let source = FeedFilePageSource::new(feed);
            pipeline.run(&source, &mut sink).await?
        }
        None => {
            let source = HttpPageSource::new(
                config.request_timeout_secs,
                &config.user_agent,
                config.max_retries,
                config.retry_backoff_base_secs,
            )
            .context("failed to build HTTP page source")?
            .with_inter_request_delay(Duration::from_millis(config.inter_request_delay_ms));
            pipeline.run(&source, &mut sink).await?
        }
    };

    match outcome {
        RunOutcome::NoData => {
            println!("no pages fetched for \"{}\"; nothing exported", run.search_term);
        }
        RunOutcome::Exported(report) => {
            print_report(&report);
            if let (Some(feed), Some(dir)) = (&args.feed, &args.archive_dir) {
                let file_name = report
                    .destination
                    .with_extension("json")
                    .file_name()
                    .map(ToOwned::to_owned)
                    .unwrap_or_else(|| "feed.json".into());
                let archived = archive_copy(feed, &dir.join(file_name))?;
                println!("feed archived to {}", archived.display());
            }
        }
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "{} pages, {} products extracted, {} unique → {} ({} columns)",
        report.pages,
        report.extracted,
        report.unique,
        report.destination.display(),
        report.columns
    );
}
