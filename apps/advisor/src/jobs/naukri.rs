use async_trait::async_trait;
use serde_json::{json, Value};

use crate::jobs::{ApifyClient, JobBoard, JobRecord, JobSearchError, JobSource};

/// Apify actor that scrapes Naukri job search results.
pub const NAUKRI_ACTOR_ID: &str = "alpcnRV9YI9lYVPWk";

pub struct NaukriJobs {
    apify: ApifyClient,
    max_jobs: u32,
}

impl NaukriJobs {
    pub fn new(apify: ApifyClient, max_jobs: u32) -> Self {
        Self { apify, max_jobs }
    }

    // Filters are fixed: every posting age, relevance order, any experience level.
    fn run_input(&self, keyword: &str) -> Value {
        json!({
            "keyword": keyword,
            "maxJobs": self.max_jobs,
            "freshness": "all",
            "sortBy": "relevance",
            "experience": "all",
        })
    }
}

#[async_trait]
impl JobBoard for NaukriJobs {
    fn source(&self) -> JobSource {
        JobSource::Naukri
    }

    async fn search(&self, keywords: &str) -> Result<Vec<JobRecord>, JobSearchError> {
        let items = self
            .apify
            .call_actor(NAUKRI_ACTOR_ID, &self.run_input(keywords))
            .await?;

        Ok(items
            .into_iter()
            .map(|item| JobRecord::from_item(item, "url"))
            .collect())
    }
}
