use crate::batch::BatchProcessor;
use crate::config::Config;
use crate::errors::AppError;
use crate::ingest;
use crate::report::{self, BatchReport};
use crate::services::{ApiCredentials, EnrichmentClient};
use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Shared application state for the HTTP surface.
pub struct AppState {
    pub config: Config,
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Response body of the enrichment endpoint: the report plus the enriched
/// table as columns and rows. Absent enrichment cells are JSON null.
#[derive(Debug, Serialize)]
pub struct EnrichmentResponseBody {
    pub report: BatchReport,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Enriches an uploaded contact CSV.
///
/// The request body is the CSV itself (header row required). Credentials are
/// passed through the same headers the remote service uses
/// (`galaxy-ap-name`, `galaxy-ap-password`, `galaxy-search-type`), falling
/// back to the server's configured defaults.
pub async fn enrich_contacts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<EnrichmentResponseBody>, AppError> {
    let table = ingest::parse_contacts(body.as_bytes())?;
    tracing::info!("Received upload with {} contact rows", table.rows.len());

    let credentials = credentials_from_headers(&headers, &state.config);
    let client = EnrichmentClient::new(state.config.enrich_base_url.clone(), credentials)?;
    let processor = BatchProcessor::new(client, state.config.row_failure_policy);

    let enriched = processor.enrich_table(table).await?;
    let report = report::summarize(&enriched);

    Ok(Json(EnrichmentResponseBody {
        report,
        columns: enriched.headers.clone(),
        rows: enriched.rows.iter().map(|row| row.cells()).collect(),
    }))
}

fn credentials_from_headers(headers: &HeaderMap, config: &Config) -> ApiCredentials {
    ApiCredentials {
        key_name: header_string(headers, "galaxy-ap-name")
            .or_else(|| config.api_key_name.clone())
            .unwrap_or_default(),
        key_password: header_string(headers, "galaxy-ap-password")
            .or_else(|| config.api_key_password.clone())
            .unwrap_or_default(),
        search_type: header_string(headers, "galaxy-search-type")
            .unwrap_or_else(|| config.search_type.clone()),
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .filter(|value| !value.is_empty())
}
