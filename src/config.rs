use crate::batch::RowFailurePolicy;
use crate::services::{ApiCredentials, DEFAULT_ENRICH_BASE_URL, DEFAULT_SEARCH_TYPE};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub enrich_base_url: String,
    /// Default credentials used when a request does not carry its own.
    pub api_key_name: Option<String>,
    pub api_key_password: Option<String>,
    pub search_type: String,
    pub row_failure_policy: RowFailurePolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            enrich_base_url: std::env::var("ENRICH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ENRICH_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key_name: std::env::var("ENRICH_KEY_NAME")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            api_key_password: std::env::var("ENRICH_KEY_PASSWORD")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            search_type: std::env::var("ENRICH_SEARCH_TYPE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SEARCH_TYPE.to_string()),
            row_failure_policy: match std::env::var("ROW_FAILURE_POLICY") {
                Ok(raw) => RowFailurePolicy::parse(&raw).ok_or_else(|| {
                    anyhow::anyhow!(
                        "ROW_FAILURE_POLICY must be 'mark-unmatched' or 'fail-fast', got '{}'",
                        raw
                    )
                })?,
                Err(_) => RowFailurePolicy::default(),
            },
        };

        if !config.enrich_base_url.starts_with("http://")
            && !config.enrich_base_url.starts_with("https://")
        {
            anyhow::bail!("ENRICH_BASE_URL must start with http:// or https://");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Enrich base URL: {}", config.enrich_base_url);
        tracing::debug!("Search type: {}", config.search_type);
        tracing::debug!("Row failure policy: {:?}", config.row_failure_policy);
        tracing::debug!("Server port: {}", config.port);
        if config.api_key_name.is_none() {
            tracing::warn!(
                "No default API credentials configured; requests must supply their own"
            );
        }

        Ok(config)
    }

    /// The server-side default credentials. Empty strings when unset: the
    /// remote treats bad credentials as "no match" rather than rejecting the
    /// request locally.
    pub fn credentials(&self) -> ApiCredentials {
        ApiCredentials {
            key_name: self.api_key_name.clone().unwrap_or_default(),
            key_password: self.api_key_password.clone().unwrap_or_default(),
            search_type: self.search_type.clone(),
        }
    }
}
