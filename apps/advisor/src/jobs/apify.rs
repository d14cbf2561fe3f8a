//! Apify REST client: start an actor run, wait for it, read its dataset.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::jobs::JobSearchError;

/// Longest server-side wait Apify allows per status request.
const MAX_WAIT_PER_POLL_SECS: u64 = 60;
const DATASET_PAGE_SIZE: usize = 1000;

#[derive(Debug, Deserialize)]
struct RunEnvelope {
    data: ActorRun,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRun {
    pub id: String,
    pub status: String,
    pub default_dataset_id: String,
}

impl ActorRun {
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status.as_str(),
            "SUCCEEDED" | "FAILED" | "ABORTED" | "TIMED-OUT"
        )
    }

    pub fn succeeded(&self) -> bool {
        self.status == "SUCCEEDED"
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct ApifyClient {
    client: Client,
    base_url: String,
    token: String,
    run_timeout: Option<Duration>,
    page_size: usize,
}

impl ApifyClient {
    pub fn from_config(config: &Config) -> Result<Self, JobSearchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(MAX_WAIT_PER_POLL_SECS + 30))
                .build()?,
            base_url: config.apify_api_url.trim_end_matches('/').to_string(),
            token: config.apify_api_token.clone(),
            run_timeout: config.apify_run_timeout,
            page_size: DATASET_PAGE_SIZE,
        })
    }

    #[cfg(test)]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Runs an actor to completion and returns every item of its default dataset.
    pub async fn call_actor(&self, actor_id: &str, input: &Value) -> Result<Vec<Value>, JobSearchError> {
        let run = self.start_run(actor_id, input).await?;
        info!(actor_id, run_id = %run.id, "Scraper run started");

        let run = self.wait_for_run(run).await?;
        if !run.succeeded() {
            warn!(actor_id, run_id = %run.id, status = %run.status, "Scraper run did not succeed");
            return Err(JobSearchError::RunFailed {
                run_id: run.id,
                status: run.status,
            });
        }

        let items = self.dataset_items(&run.default_dataset_id).await?;
        info!(actor_id, run_id = %run.id, items = items.len(), "Scraper dataset collected");
        Ok(items)
    }

    pub async fn start_run(&self, actor_id: &str, input: &Value) -> Result<ActorRun, JobSearchError> {
        let url = format!("{}/v2/acts/{}/runs", self.base_url, actor_id);
        let response = self.send(self.client.post(url).json(input)).await?;
        Ok(response.json::<RunEnvelope>().await?.data)
    }

    /// Polls until the run reaches a terminal status. Each poll asks the
    /// platform to hold the request open until the run finishes or the
    /// per-request wait elapses.
    pub async fn wait_for_run(&self, mut run: ActorRun) -> Result<ActorRun, JobSearchError> {
        let deadline = self.run_timeout.map(|t| Instant::now() + t);

        while !run.is_finished() {
            let wait_secs = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(JobSearchError::WaitExceeded { run_id: run.id });
                    }
                    remaining.as_secs().clamp(1, MAX_WAIT_PER_POLL_SECS)
                }
                None => MAX_WAIT_PER_POLL_SECS,
            };

            debug!(run_id = %run.id, status = %run.status, wait_secs, "Waiting for scraper run");
            let url = format!("{}/v2/actor-runs/{}", self.base_url, run.id);
            let request = self
                .client
                .get(url)
                .query(&[("waitForFinish", wait_secs.to_string())]);
            run = self.send(request).await?.json::<RunEnvelope>().await?.data;
        }

        Ok(run)
    }

    /// Reads a dataset page by page, preserving dataset order.
    pub async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, JobSearchError> {
        let url = format!("{}/v2/datasets/{}/items", self.base_url, dataset_id);
        let mut items = Vec::new();

        loop {
            let request = self.client.get(&url).query(&[
                ("format", "json".to_string()),
                ("offset", items.len().to_string()),
                ("limit", self.page_size.to_string()),
            ]);
            let page: Vec<Value> = self.send(request).await?.json().await?;
            let page_len = page.len();
            items.extend(page);

            if page_len < self.page_size {
                break;
            }
        }

        Ok(items)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, JobSearchError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(JobSearchError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
