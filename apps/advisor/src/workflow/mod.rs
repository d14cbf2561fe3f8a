// Resume workflow: extraction → three analyses → (on request) keywords → job search.
// All text generation goes through the TextGenerator seam; no direct HTTP here.

pub mod orchestrator;
pub mod prompts;

use tracing::info;
use uuid::Uuid;

pub use orchestrator::{Advisor, AnalysisReport, JobsReport, KeywordError};

/// A named step of the workflow, each bound to a busy message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Extracting,
    Summarizing,
    GapAnalysis,
    Roadmapping,
    ResultsReady,
    ExtractingKeywords,
    SearchingJobs,
    JobsReady,
}

impl Phase {
    /// Phases a resume upload passes through while the user waits.
    pub const ANALYSIS: [Phase; 4] = [
        Phase::Extracting,
        Phase::Summarizing,
        Phase::GapAnalysis,
        Phase::Roadmapping,
    ];

    /// Phases the "fetch jobs" action passes through while the user waits.
    pub const JOB_SEARCH: [Phase; 2] = [Phase::ExtractingKeywords, Phase::SearchingJobs];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Extracting => "Extracting text from resume...",
            Phase::Summarizing => "Summarizing resume...",
            Phase::GapAnalysis => "Finding skill gaps...",
            Phase::Roadmapping => "Creating future roadmap...",
            Phase::ResultsReady => "Analysis completed successfully!",
            Phase::ExtractingKeywords => "Extracting best keywords from resume...",
            Phase::SearchingJobs => "Fetching jobs from LinkedIn and Naukri...",
            Phase::JobsReady => "Job search finished",
        }
    }
}

/// Receives every phase transition of a workflow run.
pub trait ProgressSink: Send + Sync {
    fn enter(&self, phase: Phase);
}

/// Logs phase transitions, tagged with a per-run id.
pub struct TracingProgress {
    run_id: Uuid,
}

impl TracingProgress {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
        }
    }
}

impl Default for TracingProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TracingProgress {
    fn enter(&self, phase: Phase) {
        info!(run_id = %self.run_id, ?phase, "{}", phase.label());
    }
}
