//! Shared fakes for unit tests: scripted backends and a local fake scraper API.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::extractor::{DocumentExtractor, ExtractionError};
use crate::jobs::{JobBoard, JobRecord, JobSearchError, JobSource};
use crate::llm_client::{Completion, CompletionError, TextGenerator};
use crate::workflow::{Phase, ProgressSink};

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_config(completions_url: &str, apify_url: &str) -> Config {
    Config::from_lookup(|key| match key {
        "EURI_API_KEY" => Some("test-euri-key".to_string()),
        "APIFY_API_TOKEN" => Some("test-apify-token".to_string()),
        "EURI_API_URL" => Some(completions_url.to_string()),
        "APIFY_API_URL" => Some(apify_url.to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn job(title: &str, company: &str) -> JobRecord {
    JobRecord::from_item(
        json!({
            "title": title,
            "companyName": company,
            "location": "Bengaluru",
            "url": format!("https://jobs.example.com/{}", title.replace(' ', "-")),
        }),
        "url",
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Workflow fakes
// ────────────────────────────────────────────────────────────────────────────

pub struct FixedPagesExtractor {
    pages: Vec<String>,
}

impl FixedPagesExtractor {
    pub fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl DocumentExtractor for FixedPagesExtractor {
    fn pages(&self, _document: &[u8]) -> Result<Vec<String>, ExtractionError> {
        Ok(self.pages.clone())
    }
}

pub struct FailingExtractor;

impl DocumentExtractor for FailingExtractor {
    fn pages(&self, _document: &[u8]) -> Result<Vec<String>, ExtractionError> {
        Err(ExtractionError::NotPdf)
    }
}

/// Replies with queued results in order and records every prompt.
/// An exhausted queue answers with empty text.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<Completion, CompletionError>>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<Completion, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, CompletionError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Completion::Text(String::new())))
    }
}

/// A board with a fixed answer that records the keywords it was asked for.
pub struct StaticBoard {
    source: JobSource,
    outcome: Result<Vec<JobRecord>, String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl StaticBoard {
    pub fn found(source: JobSource, jobs: Vec<JobRecord>) -> Self {
        Self {
            source,
            outcome: Ok(jobs),
            queries: Arc::default(),
        }
    }

    pub fn failing(source: JobSource, message: &str) -> Self {
        Self {
            source,
            outcome: Err(message.to_string()),
            queries: Arc::default(),
        }
    }

    pub fn queries(&self) -> Arc<Mutex<Vec<String>>> {
        self.queries.clone()
    }
}

#[async_trait]
impl JobBoard for StaticBoard {
    fn source(&self) -> JobSource {
        self.source
    }

    async fn search(&self, keywords: &str) -> Result<Vec<JobRecord>, JobSearchError> {
        self.queries.lock().unwrap().push(keywords.to_string());
        self.outcome.clone().map_err(|message| JobSearchError::Api {
            status: 502,
            message,
        })
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    phases: Mutex<Vec<Phase>>,
}

impl RecordingProgress {
    pub fn phases(&self) -> Vec<Phase> {
        self.phases.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn enter(&self, phase: Phase) {
        self.phases.lock().unwrap().push(phase);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fake scraper platform
// ────────────────────────────────────────────────────────────────────────────

const RUN_ID: &str = "run-1";
const DATASET_ID: &str = "dataset-1";

struct FakeApifyState {
    items: Vec<Value>,
    final_status: &'static str,
    pending_polls: usize,
    polls: Mutex<usize>,
    inputs: Mutex<Vec<(String, Value)>>,
}

/// In-process stand-in for the actor run and dataset endpoints.
#[derive(Clone)]
pub struct FakeApify {
    state: Arc<FakeApifyState>,
}

#[derive(Deserialize)]
struct PageQuery {
    offset: usize,
    limit: usize,
}

impl FakeApify {
    pub fn new(items: Vec<Value>, final_status: &'static str) -> Self {
        Self {
            state: Arc::new(FakeApifyState {
                items,
                final_status,
                pending_polls: 0,
                polls: Mutex::new(0),
                inputs: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Number of status polls that still report RUNNING.
    pub fn with_pending_polls(self, pending_polls: usize) -> Self {
        let state = Arc::try_unwrap(self.state).unwrap_or_else(|_| panic!("fake already shared"));
        Self {
            state: Arc::new(FakeApifyState {
                pending_polls,
                ..state
            }),
        }
    }

    pub fn inputs(&self) -> Vec<(String, Value)> {
        self.state.inputs.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        *self.state.polls.lock().unwrap()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/v2/acts/:actor/runs", post(start_run))
            .route("/v2/actor-runs/:run_id", get(get_run))
            .route("/v2/datasets/:dataset_id/items", get(dataset_items))
            .with_state(self.state.clone())
    }
}

fn run_body(status: &str) -> Json<Value> {
    Json(json!({
        "data": {
            "id": RUN_ID,
            "status": status,
            "defaultDatasetId": DATASET_ID,
        }
    }))
}

async fn start_run(
    State(state): State<Arc<FakeApifyState>>,
    Path(actor): Path<String>,
    Json(input): Json<Value>,
) -> Json<Value> {
    state.inputs.lock().unwrap().push((actor, input));
    run_body("RUNNING")
}

async fn get_run(State(state): State<Arc<FakeApifyState>>) -> Json<Value> {
    let mut polls = state.polls.lock().unwrap();
    *polls += 1;
    if *polls <= state.pending_polls {
        run_body("RUNNING")
    } else {
        run_body(state.final_status)
    }
}

async fn dataset_items(
    State(state): State<Arc<FakeApifyState>>,
    Query(page): Query<PageQuery>,
) -> Json<Vec<Value>> {
    let items = state
        .items
        .iter()
        .skip(page.offset)
        .take(page.limit)
        .cloned()
        .collect();
    Json(items)
}
