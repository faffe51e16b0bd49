use crate::address::compose_address;
use crate::errors::{AppError, ResultExt};
use crate::ingest::ColumnIndex;
use crate::models::{
    ContactTable, EnrichedRecord, EnrichedTable, EnrichmentResult, NormalizedAddress,
    NormalizedName, ENRICHMENT_COLUMNS,
};
use crate::name::split_name;
use crate::report;
use crate::services::EnrichmentClient;
use std::time::Instant;

/// What to do when a single row's remote lookup fails.
///
/// The source tool let the first failing row abort the whole batch; that
/// behavior is preserved as [`RowFailurePolicy::FailFast`], but the hardened
/// default isolates the failure so prior work is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowFailurePolicy {
    /// Log the failure, mark the row all-absent, continue the batch.
    #[default]
    MarkUnmatched,
    /// Abort the batch on the first failing row.
    FailFast,
}

impl RowFailurePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mark-unmatched" | "mark_unmatched" => Some(Self::MarkUnmatched),
            "fail-fast" | "fail_fast" => Some(Self::FailFast),
            _ => None,
        }
    }
}

/// A contact after pure pre-processing, ready for its remote lookup.
#[derive(Debug, Clone)]
pub struct PreparedContact {
    pub name: NormalizedName,
    pub address: NormalizedAddress,
}

/// Orchestrates the batch: pre-process each row, look each one up in order,
/// assemble the enriched table.
pub struct BatchProcessor {
    client: EnrichmentClient,
    policy: RowFailurePolicy,
}

impl BatchProcessor {
    pub fn new(client: EnrichmentClient, policy: RowFailurePolicy) -> Self {
        Self { client, policy }
    }

    /// Derives the normalized name and address for every row.
    ///
    /// Pure pre-processing, no network. Unparseable fields resolve to absent
    /// components, never an error; only a missing required column fails.
    pub fn prepare(table: &ContactTable) -> Result<Vec<PreparedContact>, AppError> {
        let columns = ColumnIndex::resolve(&table.headers)?;

        Ok(table
            .rows
            .iter()
            .map(|row| {
                let name = split_name(&row.fields[columns.name]);
                let address = compose_address(
                    &row.fields[columns.line_one],
                    columns.line_two.map(|idx| row.fields[idx].as_str()),
                    &row.fields[columns.city],
                    &row.fields[columns.state],
                    &row.fields[columns.zip],
                );
                PreparedContact { name, address }
            })
            .collect())
    }

    /// Runs the full batch and assembles the enriched table.
    ///
    /// Rows are looked up sequentially in upload order; each call blocks
    /// until its response returns. Output row count and order always equal
    /// the input, with the five enrichment columns appended.
    pub async fn enrich_table(&self, table: ContactTable) -> Result<EnrichedTable, AppError> {
        let prepared = Self::prepare(&table)?;

        let total = table.rows.len();
        tracing::info!(
            "Starting enrichment of {} contacts (estimated cost ${:.2})",
            total,
            report::estimated_cost(total)
        );

        // Timing covers the enrichment phase only, not pre-processing.
        let started = Instant::now();

        let mut rows = Vec::with_capacity(total);
        let mut failed_rows = 0usize;

        for (idx, (record, contact)) in table.rows.into_iter().zip(prepared).enumerate() {
            let enrichment = match self.client.enrich(&contact.name, &contact.address).await {
                Ok(result) => result,
                Err(e) => match self.policy {
                    RowFailurePolicy::FailFast => {
                        return Err(e)
                            .context(format!("enrichment failed at row {}", idx + 1));
                    }
                    RowFailurePolicy::MarkUnmatched => {
                        tracing::warn!("Row {} lookup failed, marking unmatched: {}", idx + 1, e);
                        failed_rows += 1;
                        EnrichmentResult::no_match()
                    }
                },
            };

            rows.push(EnrichedRecord {
                fields: record.fields,
                enrichment,
            });
        }

        let enrich_elapsed = started.elapsed();
        tracing::info!(
            "Enriched {} contacts in {:.2}s ({} failed)",
            total,
            enrich_elapsed.as_secs_f64(),
            failed_rows
        );

        let mut headers = table.headers;
        headers.extend(ENRICHMENT_COLUMNS.iter().map(|column| column.to_string()));

        Ok(EnrichedTable {
            headers,
            rows,
            enrich_elapsed,
            failed_rows,
        })
    }
}
