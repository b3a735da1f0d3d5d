// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below is the CLI, each field is an
// argument, and the doc comments become the --help text.
//
// Everything here is raw user input. config.rs turns it into a validated
// CrawlConfig before anything touches the network.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "backlink-scout",
    version,
    about = "Find every page in a site section that links to a target page",
    long_about = "backlink-scout crawls one section of a website (one host, one path prefix) \
                  and reports every page that links to the given target URL. \
                  Results are written to CSV."
)]
pub struct Cli {
    /// The page to find backlinks for (e.g., https://www.example.com/health/advising/)
    pub target_url: String,

    /// Where to start crawling
    ///
    /// Defaults to the target's parent directory:
    /// https://ex.com/health/advising/ starts at https://ex.com/health/
    #[arg(long)]
    pub seed: Option<String>,

    /// Only crawl pages on this host (defaults to the seed's host)
    #[arg(long)]
    pub domain: Option<String>,

    /// Only crawl paths starting with this prefix (defaults to the seed's path)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Pause after each page, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,

    /// Use a token bucket of N pages per second instead of a fixed delay
    #[arg(long, value_name = "N")]
    pub rate: Option<u32>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = concat!("backlink-scout/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// CSV output path (defaults to backlinks_for_<target title>.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the crawl report as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// More logging (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
