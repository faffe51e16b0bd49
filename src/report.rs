use crate::models::EnrichedTable;
use serde::Serialize;

/// What the service bills per lookup, and per matched row.
pub const COST_PER_LOOKUP: f64 = 0.10;

/// Cost of a batch before any call is made.
pub fn estimated_cost(total_rows: usize) -> f64 {
    total_rows as f64 * COST_PER_LOOKUP
}

/// Aggregate match statistics over an enriched table.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub total_rows: usize,
    pub matched_phones: usize,
    pub matched_emails: usize,
    /// Rows matched on phone OR email; the billable set.
    pub matched_rows: usize,
    pub failed_rows: usize,
    pub percent_matched_phones: f64,
    pub percent_matched_emails: f64,
    /// Wall-clock seconds of the enrichment phase.
    pub elapsed_seconds: f64,
    pub estimated_cost: f64,
    pub actual_cost: f64,
}

impl BatchReport {
    /// Phone match rate rounded to the nearest whole percent, e.g. "67%".
    pub fn phone_match_display(&self) -> String {
        format!("{:.0}%", self.percent_matched_phones)
    }

    /// Email match rate rounded to the nearest whole percent.
    pub fn email_match_display(&self) -> String {
        format!("{:.0}%", self.percent_matched_emails)
    }
}

/// Computes the report for an enriched table. Pure given the table.
pub fn summarize(table: &EnrichedTable) -> BatchReport {
    let total_rows = table.rows.len();
    let matched_phones = table
        .rows
        .iter()
        .filter(|row| row.enrichment.has_phone())
        .count();
    let matched_emails = table
        .rows
        .iter()
        .filter(|row| row.enrichment.has_email())
        .count();
    let matched_rows = table
        .rows
        .iter()
        .filter(|row| row.enrichment.has_phone() || row.enrichment.has_email())
        .count();

    let percent = |matched: usize| {
        if total_rows == 0 {
            0.0
        } else {
            (matched as f64 / total_rows as f64) * 100.0
        }
    };

    BatchReport {
        total_rows,
        matched_phones,
        matched_emails,
        matched_rows,
        failed_rows: table.failed_rows,
        percent_matched_phones: percent(matched_phones),
        percent_matched_emails: percent(matched_emails),
        elapsed_seconds: table.enrich_elapsed.as_secs_f64(),
        estimated_cost: estimated_cost(total_rows),
        actual_cost: matched_rows as f64 * COST_PER_LOOKUP,
    }
}
