// src/report.rs
// =============================================================================
// Output of a finished crawl.
//
// - CSV file with header `Linking Page Title,Linking Page URL`
// - File name derived from the target page's title:
//     "Academic Advising | York U" -> backlinks_for_academic_advising__york_u.csv
// - Human-readable table + summary on stdout, or the whole report as JSON
// =============================================================================

use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};

use crate::crawl::{BacklinkRecord, CrawlReport};

pub const CSV_HEADER: [&str; 2] = ["Linking Page Title", "Linking Page URL"];

/// Reduces a page title to something safe for a file name.
///
/// Keeps word characters, hyphens and spaces, trims, turns spaces into
/// underscores and lowercases the result.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == ' ')
        .collect::<String>()
        .trim()
        .replace(' ', "_")
        .to_lowercase()
}

/// Default CSV path for a target page titled `title`.
pub fn output_filename(title: &str) -> PathBuf {
    let mut name = sanitize_filename(title);
    if name.is_empty() {
        name = crate::crawl::PLACEHOLDER_TITLE.to_string();
    }
    PathBuf::from(format!("backlinks_for_{}.csv", name))
}

/// Writes the header and one row per record to `writer`.
pub fn write_records<W: io::Write>(writer: W, records: &[BacklinkRecord]) -> csv::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for record in records {
        csv.write_record([record.title.as_str(), record.url.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, records: &[BacklinkRecord]) -> csv::Result<()> {
    let file = std::fs::File::create(path)?;
    write_records(file, records)
}

pub fn print_json(report: &CrawlReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

// Prints backlinks as a table in the terminal
pub fn print_table(records: &[BacklinkRecord]) {
    println!("{:<50} {:<60}", "TITLE", "URL");
    println!("{}", "=".repeat(110));

    for record in records {
        println!("{:<50} {:<60}", truncate(&record.title, 47), record.url);
    }

    println!();
}

pub fn print_summary(report: &CrawlReport, target: &str, output: &Path) {
    println!("✅ Finished crawling {} pages.", report.pages_crawled());
    if !report.failures.is_empty() {
        println!("⚠️  {} page(s) could not be fetched:", report.failures.len());
        for failure in &report.failures {
            println!("   {} ({})", failure.url, failure.error);
        }
    }
    println!("🔗 Found {} backlinks to: {}", report.backlinks.len(), target);
    println!("📁 Saved to: {}", output.display());
}

// Cuts on a char boundary so multi-byte titles don't panic
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
