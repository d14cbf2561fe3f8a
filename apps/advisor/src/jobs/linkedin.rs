use async_trait::async_trait;
use serde_json::{json, Value};

use crate::jobs::{ApifyClient, JobBoard, JobRecord, JobSearchError, JobSource};

/// Apify actor that scrapes LinkedIn job search results.
pub const LINKEDIN_ACTOR_ID: &str = "BHzefUZlZRKWxkTck";

/// LinkedIn search through the residential proxy pool.
pub struct LinkedInJobs {
    apify: ApifyClient,
    location: String,
    rows: u32,
}

impl LinkedInJobs {
    pub fn new(apify: ApifyClient, location: impl Into<String>, rows: u32) -> Self {
        Self {
            apify,
            location: location.into(),
            rows,
        }
    }

    fn run_input(&self, title: &str) -> Value {
        json!({
            "title": title,
            "location": self.location,
            "rows": self.rows,
            "proxy": {
                "useApifyProxy": true,
                "apifyProxyGroups": ["RESIDENTIAL"],
            },
        })
    }
}

#[async_trait]
impl JobBoard for LinkedInJobs {
    fn source(&self) -> JobSource {
        JobSource::LinkedIn
    }

    async fn search(&self, keywords: &str) -> Result<Vec<JobRecord>, JobSearchError> {
        let items = self
            .apify
            .call_actor(LINKEDIN_ACTOR_ID, &self.run_input(keywords))
            .await?;

        Ok(items
            .into_iter()
            .map(|item| JobRecord::from_item(item, "link"))
            .collect())
    }
}
