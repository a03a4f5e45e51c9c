//! The two batch jobs: HTML to intermediate CSV, and intermediate CSV merged
//! into the published calendar.

use crate::csv_store::{
    ensure_published, read_events, write_intermediate, write_published, CsvDialect,
};
use crate::error::{EventsError, Result};
use crate::merger::{EventMerger, MergeOutcome};
use crate::models::{Config, CsvEventRow};
use crate::scraper::{format_for_csv, sort_records, EventScraper};

const SAMPLE_SIZE: usize = 5;

/// Scrapes `config.html_source` and writes the intermediate CSV.
///
/// An unreadable source is not fatal: a warning is logged and an empty
/// intermediate file is written so the merge can still run.
pub fn run_extract(config: &Config) -> Result<Vec<CsvEventRow>> {
    println!("📄 Parsing events from: {}", config.html_source.display());

    let scraper = EventScraper::new(&config.extraction, &config.default_city)?;
    let mut events = match scraper.scrape_file(&config.html_source) {
        Ok(events) => events,
        Err(e @ (EventsError::MissingInput(_) | EventsError::Read { .. })) => {
            tracing::warn!("{e}");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    if events.is_empty() {
        tracing::warn!("no events found in HTML file");
        write_intermediate(&config.intermediate_csv, &[])?;
        return Ok(Vec::new());
    }
    println!("✅ Parsed {} events", events.len());

    sort_records(&mut events);
    let rows = format_for_csv(&events, &config.attribution_marker);
    write_intermediate(&config.intermediate_csv, &rows)?;
    println!(
        "💾 Saved {} events to {}",
        rows.len(),
        config.intermediate_csv.display()
    );

    println!("\nSample of parsed events:");
    for row in rows.iter().take(SAMPLE_SIZE) {
        println!("  - {}", row.event);
        println!("    Date: {}, Time: {}", row.date, row.time);
        println!("    Location: {}", row.location);
    }

    Ok(rows)
}

/// Merges the intermediate CSV into the published calendar and rewrites it.
pub fn run_merge(config: &Config) -> Result<MergeOutcome> {
    let published = &config.published_csv;
    if ensure_published(published, &config.banner)? {
        tracing::warn!(
            path = %published.display(),
            "published events file not found, created an empty one"
        );
    }

    println!("🔀 Merging events...");
    let existing = read_events(published, CsvDialect::PUBLISHED)?;
    let candidates = read_events(&config.intermediate_csv, CsvDialect::Intermediate)?;
    println!("📋 Loaded {} existing events", existing.len());
    println!("📋 Loaded {} new candidate events", candidates.len());

    let outcome = EventMerger::new(&config.attribution_marker).merge(existing, candidates);
    println!("\n➕ Added {} new events", outcome.added);
    println!("⏭️  Skipped {} duplicate events", outcome.skipped);

    write_published(published, &config.banner, &outcome.events)?;
    println!(
        "\n💾 Wrote {} total events to {}",
        outcome.events.len(),
        published.display()
    );

    Ok(outcome)
}
