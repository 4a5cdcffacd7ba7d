use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::config::SummaryConfig;

/// Shown instead of a summary whenever the endpoint call fails.
pub const FAILURE_MESSAGE: &str = "Failed to summarize expenses";

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Turns the expense narrative into human-readable text.
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// HTTP client for the external summarization endpoint.
#[derive(Debug, Clone)]
pub struct SummaryClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl SummaryClient {
    pub fn new(config: SummaryConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.api_url)
            .with_context(|| format!("Invalid SUMMARY_API_URL: {}", config.api_url))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl Summarizer for SummaryClient {
    async fn summarize(&self, text: &str) -> Result<String> {
        let request = SummarizeRequest { text };

        let response: SummarizeResponse = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.endpoint))?
            .error_for_status()
            .with_context(|| format!("POST {} returned non-success status", self.endpoint))?
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", self.endpoint))?;

        Ok(response.summary)
    }
}

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    summary: String,
}

/// Result of one summarize call, tagged with the generation it was
/// dispatched for.
#[derive(Debug)]
pub struct SummaryOutcome {
    pub generation: u64,
    pub result: Result<String>,
}

/// Fires summarize calls on the runtime and reports outcomes back over a
/// channel drained by the event loop. Tasks never touch app state directly.
pub struct SummaryDispatcher {
    client: Option<Arc<dyn Summarizer>>,
    tx: UnboundedSender<SummaryOutcome>,
}

impl SummaryDispatcher {
    pub fn new(client: Option<Arc<dyn Summarizer>>) -> (Self, UnboundedReceiver<SummaryOutcome>) {
        let (tx, rx) = unbounded_channel();
        (Self { client, tx }, rx)
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Fire-and-forget. Without a configured client the outcome is an
    /// immediate failure, so the UI still settles.
    pub fn dispatch(&self, generation: u64, text: String) {
        let Some(client) = self.client.clone() else {
            let _ = self.tx.send(SummaryOutcome {
                generation,
                result: Err(anyhow::anyhow!("summary endpoint not configured")),
            });
            return;
        };

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tracing::debug!(generation, "dispatching summarize request");
            let result = client.summarize(&text).await;
            if let Err(err) = &result {
                tracing::warn!(generation, error = %err, "summarize request failed");
            }
            let _ = tx.send(SummaryOutcome { generation, result });
        });
    }
}

/// Summary text as the UI sees it. Overlapping requests are allowed; only
/// the outcome matching the latest generation is ever applied.
#[derive(Debug, Default)]
pub struct SummaryState {
    pub text: Option<String>,
    pub loading: bool,
    generation: u64,
}

impl SummaryState {
    /// Starts a new request generation and returns its number.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Applies an outcome. Outcomes from superseded generations are dropped
    /// so the summary always reflects the most recent list state.
    pub fn settle(&mut self, outcome: SummaryOutcome) {
        if outcome.generation != self.generation {
            tracing::debug!(
                stale = outcome.generation,
                current = self.generation,
                "dropping superseded summary response"
            );
            return;
        }
        self.loading = false;
        self.text = Some(match outcome.result {
            Ok(summary) => summary,
            Err(_) => FAILURE_MESSAGE.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_stores_summary_and_clears_loading() {
        let mut state = SummaryState::default();
        let generation = state.begin();
        assert!(state.loading);

        state.settle(SummaryOutcome {
            generation,
            result: Ok("You spent ₹50 on Coffee.".into()),
        });

        assert!(!state.loading);
        assert_eq!(state.text.as_deref(), Some("You spent ₹50 on Coffee."));
    }

    #[test]
    fn settle_replaces_failures_with_fixed_message() {
        let mut state = SummaryState::default();
        let generation = state.begin();

        state.settle(SummaryOutcome {
            generation,
            result: Err(anyhow::anyhow!("connection refused")),
        });

        assert!(!state.loading);
        assert_eq!(state.text.as_deref(), Some(FAILURE_MESSAGE));
    }

    #[test]
    fn stale_outcome_is_dropped() {
        let mut state = SummaryState::default();
        let old = state.begin();
        let current = state.begin();

        state.settle(SummaryOutcome {
            generation: old,
            result: Ok("stale summary".into()),
        });
        assert!(state.loading);
        assert_eq!(state.text, None);

        state.settle(SummaryOutcome {
            generation: current,
            result: Ok("fresh summary".into()),
        });
        assert!(!state.loading);
        assert_eq!(state.text.as_deref(), Some("fresh summary"));
    }

    #[test]
    fn late_stale_response_does_not_overwrite_fresh_summary() {
        let mut state = SummaryState::default();
        let old = state.begin();
        let current = state.begin();

        state.settle(SummaryOutcome {
            generation: current,
            result: Ok("fresh summary".into()),
        });
        state.settle(SummaryOutcome {
            generation: old,
            result: Err(anyhow::anyhow!("timed out")),
        });

        assert!(!state.loading);
        assert_eq!(state.text.as_deref(), Some("fresh summary"));
    }

    #[tokio::test]
    async fn unconfigured_dispatcher_reports_immediate_failure() {
        let (dispatcher, mut rx) = SummaryDispatcher::new(None);
        assert!(!dispatcher.is_configured());

        dispatcher.dispatch(1, "Description: Coffee, Amount: ₹50.00 on 2024-01-01".into());

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.generation, 1);
        assert!(outcome.result.is_err());
    }
}
