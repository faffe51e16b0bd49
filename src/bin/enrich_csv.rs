//! Batch CLI: enrich a contact CSV without the HTTP surface.
//!
//! Usage: `enrich_csv <input.csv> [output.csv]`. Credentials come from the
//! environment (`ENRICH_KEY_NAME`, `ENRICH_KEY_PASSWORD`).

use anyhow::{bail, Context, Result};
use contact_enrich_api::batch::BatchProcessor;
use contact_enrich_api::config::Config;
use contact_enrich_api::services::EnrichmentClient;
use contact_enrich_api::{ingest, report};
use std::fs::File;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let input = match args.next() {
        Some(path) => path,
        None => bail!("usage: enrich_csv <input.csv> [output.csv]"),
    };
    let output = args.next();

    let config = Config::from_env()?;

    println!("=== Contact Enrichment ===\n");

    let file = File::open(&input).with_context(|| format!("failed to open {}", input))?;
    let table = ingest::parse_contacts(file)?;

    let total = table.rows.len();
    println!("Loaded {} contacts from {}", total, input);
    println!("Estimated cost: ${:.2}\n", report::estimated_cost(total));

    let client = EnrichmentClient::new(config.enrich_base_url.clone(), config.credentials())?;
    let processor = BatchProcessor::new(client, config.row_failure_policy);

    let enriched = processor.enrich_table(table).await?;
    let summary = report::summarize(&enriched);

    println!("=== Enrichment Complete ===");
    println!("Run time: {:.2} seconds", summary.elapsed_seconds);
    println!("Matched phone numbers: {}", summary.phone_match_display());
    println!("Matched emails: {}", summary.email_match_display());
    println!("Actual cost: ${:.2}", summary.actual_cost);
    if summary.failed_rows > 0 {
        println!("✗ Failed rows: {}", summary.failed_rows);
    }

    if let Some(path) = output {
        let mut writer =
            csv::Writer::from_path(&path).with_context(|| format!("failed to create {}", path))?;
        writer.write_record(&enriched.headers)?;
        for row in &enriched.rows {
            let cells: Vec<String> = row
                .cells()
                .into_iter()
                .map(|cell| cell.unwrap_or_default())
                .collect();
            writer.write_record(&cells)?;
        }
        writer.flush()?;
        println!("✓ Enriched table written to {}", path);
    }

    Ok(())
}
