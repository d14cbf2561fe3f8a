//! Workflow orchestrator — sequences extraction, analyses, keyword derivation
//! and job search.
//!
//! Flow (upload):      extract → summary → gaps → roadmap → ResultsReady
//! Flow (fetch jobs):  keywords(summary) → LinkedIn ‖ Naukri → JobsReady
//!
//! Only an extraction failure aborts a run. Each analysis and each job board
//! fails on its own and the failure travels to the page in its slot.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::extractor::{extract_text, DocumentExtractor, ExtractionError};
use crate::jobs::{JobBoard, JobRecord, JobSearchError};
use crate::llm_client::{Completion, CompletionError, TextGenerator};
use crate::workflow::prompts::{
    gaps_prompt, keywords_prompt, roadmap_prompt, summary_prompt, GAPS_MAX_TOKENS,
    KEYWORDS_MAX_TOKENS, ROADMAP_MAX_TOKENS, SUMMARY_MAX_TOKENS,
};
use crate::workflow::{Phase, ProgressSink};

// ────────────────────────────────────────────────────────────────────────────
// Reports
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of the upload action: one slot per analysis panel.
#[derive(Debug)]
pub struct AnalysisReport {
    pub summary: Result<String, CompletionError>,
    pub gaps: Result<String, CompletionError>,
    pub roadmap: Result<String, CompletionError>,
    pub resume_chars: usize,
    pub generated_at: DateTime<Utc>,
}

/// Outcome of the "fetch jobs" action: one slot per board.
#[derive(Debug)]
pub struct JobsReport {
    pub keywords: String,
    pub linkedin: Result<Vec<JobRecord>, JobSearchError>,
    pub naukri: Result<Vec<JobRecord>, JobSearchError>,
}

/// The keyword step failed, so no board was searched.
#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("Keyword extraction failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("The model returned no usable search keywords")]
    Empty,
}

// ────────────────────────────────────────────────────────────────────────────
// Advisor
// ────────────────────────────────────────────────────────────────────────────

/// Built once at startup and shared read-only across requests.
pub struct Advisor {
    extractor: Arc<dyn DocumentExtractor>,
    llm: Arc<dyn TextGenerator>,
    linkedin: Arc<dyn JobBoard>,
    naukri: Arc<dyn JobBoard>,
}

impl Advisor {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        llm: Arc<dyn TextGenerator>,
        linkedin: Arc<dyn JobBoard>,
        naukri: Arc<dyn JobBoard>,
    ) -> Self {
        Self {
            extractor,
            llm,
            linkedin,
            naukri,
        }
    }

    /// Extracts the resume and requests the three analyses in order.
    ///
    /// All three analyses are always attempted; only extraction failure
    /// returns early, before any completion call.
    pub async fn analyze(
        &self,
        document: Bytes,
        progress: &dyn ProgressSink,
    ) -> Result<AnalysisReport, ExtractionError> {
        progress.enter(Phase::Extracting);
        let resume_text = extract_text(self.extractor.clone(), document)
            .await
            .map_err(|e| {
                warn!("Resume extraction failed: {e}");
                e
            })?;
        let resume_chars = resume_text.chars().count();
        info!(chars = resume_chars, "Resume text extracted");

        progress.enter(Phase::Summarizing);
        let summary = self
            .ask("summary", &summary_prompt(&resume_text), SUMMARY_MAX_TOKENS)
            .await;

        progress.enter(Phase::GapAnalysis);
        let gaps = self
            .ask("gaps", &gaps_prompt(&resume_text), GAPS_MAX_TOKENS)
            .await;

        progress.enter(Phase::Roadmapping);
        let roadmap = self
            .ask("roadmap", &roadmap_prompt(&resume_text), ROADMAP_MAX_TOKENS)
            .await;

        progress.enter(Phase::ResultsReady);
        Ok(AnalysisReport {
            summary,
            gaps,
            roadmap,
            resume_chars,
            generated_at: Utc::now(),
        })
    }

    /// Derives search keywords from the summary and queries both boards.
    pub async fn find_jobs(
        &self,
        summary: &str,
        progress: &dyn ProgressSink,
    ) -> Result<JobsReport, KeywordError> {
        progress.enter(Phase::ExtractingKeywords);
        let raw = self
            .llm
            .complete(&keywords_prompt(summary), KEYWORDS_MAX_TOKENS)
            .await
            .map_err(|e| {
                warn!("Keyword extraction failed: {e}");
                e
            })?;

        let keywords = clean_keywords(&raw.into_text());
        if keywords.is_empty() {
            warn!("Keyword extraction returned nothing usable");
            return Err(KeywordError::Empty);
        }
        info!(%keywords, "Search keywords extracted");

        progress.enter(Phase::SearchingJobs);
        let (linkedin, naukri) = tokio::join!(
            search_board(self.linkedin.as_ref(), &keywords),
            search_board(self.naukri.as_ref(), &keywords),
        );

        progress.enter(Phase::JobsReady);
        Ok(JobsReport {
            keywords,
            linkedin,
            naukri,
        })
    }

    async fn ask(&self, panel: &str, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        match self.llm.complete(prompt, max_tokens).await {
            Ok(completion) => {
                if let Completion::Raw(_) = &completion {
                    warn!(panel, "Completion response had no choices; showing raw value");
                }
                Ok(completion.into_text())
            }
            Err(e) => {
                warn!(panel, "Analysis failed: {e}");
                Err(e)
            }
        }
    }
}

async fn search_board(board: &dyn JobBoard, keywords: &str) -> Result<Vec<JobRecord>, JobSearchError> {
    let source = board.source();
    match board.search(keywords).await {
        Ok(jobs) => {
            info!(%source, count = jobs.len(), "Job search finished");
            Ok(jobs)
        }
        Err(e) => {
            warn!(%source, "Job search failed: {e}");
            Err(e)
        }
    }
}

/// Drops every line break and surrounding whitespace from the model's keyword list.
pub fn clean_keywords(raw: &str) -> String {
    raw.replace(['\r', '\n'], "").trim().to_string()
}
