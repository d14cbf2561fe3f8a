//! Job boards — LinkedIn and Naukri searches, both run as scraping actors on
//! the Apify platform.
//!
//! Each board turns a keyword string into a list of `JobRecord`s in the order
//! the remote dataset returned them. An empty list is a valid answer.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod apify;
pub mod linkedin;
pub mod naukri;

pub use apify::ApifyClient;
pub use linkedin::LinkedInJobs;
pub use naukri::NaukriJobs;

pub const DEFAULT_LOCATION: &str = "India";
pub const DEFAULT_MAX_JOBS: u32 = 60;

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scraper API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Scraper run {run_id} finished with status {status}")]
    RunFailed { run_id: String, status: String },

    #[error("Scraper run {run_id} did not finish in time")]
    WaitExceeded { run_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSource {
    LinkedIn,
    Naukri,
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobSource::LinkedIn => f.write_str("LinkedIn"),
            JobSource::Naukri => f.write_str("Naukri"),
        }
    }
}

/// One posting as returned by a board, with the display fields pulled out.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    /// The dataset item exactly as the actor produced it.
    pub raw: Value,
}

impl JobRecord {
    /// Maps a dataset item. Boards disagree on where the posting link lives,
    /// so the caller names the field.
    pub fn from_item(item: Value, link_field: &str) -> Self {
        Self {
            title: text_field(&item, "title"),
            company: text_field(&item, "companyName"),
            location: text_field(&item, "location"),
            url: text_field(&item, link_field),
            raw: item,
        }
    }
}

fn text_field(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let parts: Vec<&str> = parts.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => Some(other.to_string()),
    }
}

/// A searchable job board.
#[async_trait]
pub trait JobBoard: Send + Sync {
    fn source(&self) -> JobSource;

    async fn search(&self, keywords: &str) -> Result<Vec<JobRecord>, JobSearchError>;
}
