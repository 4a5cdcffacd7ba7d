use anyhow::{Context, Result};

/// Where the summarization requests go. Read once at startup; there is no
/// runtime reconfiguration.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub api_url: String,
    pub api_key: String,
}

impl SummaryConfig {
    /// Loads config from env vars:
    /// - `SUMMARY_API_URL` — endpoint the expense text is POSTed to
    /// - `SUMMARY_API_KEY` — bearer credential for that endpoint
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("SUMMARY_API_URL").context("SUMMARY_API_URL is not set")?;
        let api_key = std::env::var("SUMMARY_API_KEY").context("SUMMARY_API_KEY is not set")?;
        Ok(Self { api_url, api_key })
    }
}
