// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Validate them into a CrawlConfig
// 3. Look up the target page's title (names the output file)
// 4. Crawl from the seed, collecting pages that link to the target
// 5. Write the CSV and print the results
// 6. Exit with 0 on success, 2 on a setup error
//
// Crawl failures on individual pages are not errors at this level: they are
// logged and listed in the summary, and the run still succeeds.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod links;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::CrawlConfig;
use crawl::{Crawler, HttpFetcher};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// -v raises our own crate's level; dependencies stay at warn
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,backlink_scout={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = CrawlConfig::from_cli(&cli).context("invalid arguments")?;
    let fetcher = HttpFetcher::new(config.timeout, &config.user_agent)?;

    let target_title = crawl::lookup_title(&fetcher, config.target.as_str()).await;
    info!(
        target_url = %config.target,
        title = %target_title,
        seed = %config.seed,
        domain = config.scope.domain(),
        prefix = config.scope.prefix(),
        "starting crawl"
    );

    let mut crawler = Crawler::new(
        fetcher,
        config.throttle.build(),
        config.scope.clone(),
        config.target_key.clone(),
    );
    crawler.crawl(config.seed.as_str()).await;
    info!(backlinks = crawler.backlinks_found(), "crawl finished");
    let report = crawler.finish();

    let output = config
        .output
        .clone()
        .unwrap_or_else(|| report::output_filename(&target_title));
    report::write_csv(&output, &report.backlinks)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if config.json {
        report::print_json(&report)?;
    } else {
        report::print_table(&report.backlinks);
        report::print_summary(&report, config.target.as_str(), &output);
    }

    Ok(())
}
