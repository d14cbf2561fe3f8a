mod config;
mod errors;
mod extractor;
mod jobs;
mod llm_client;
mod render;
mod routes;
mod state;
mod workflow;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extractor::PdfExtractor;
use crate::jobs::{ApifyClient, LinkedInJobs, NaukriJobs};
use crate::llm_client::CompletionClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::Advisor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Advisor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion client
    let llm = CompletionClient::from_config(&config)?;
    info!("Completion client initialized (model: {})", llm.model());

    // Initialize job boards over one scraper client
    let apify = ApifyClient::from_config(&config)?;
    let linkedin = LinkedInJobs::new(apify.clone(), config.job_location.clone(), config.max_jobs);
    let naukri = NaukriJobs::new(apify, config.max_jobs);
    info!(
        "Job boards initialized (location: {}, max jobs: {})",
        config.job_location, config.max_jobs
    );

    let advisor = Advisor::new(
        Arc::new(PdfExtractor),
        Arc::new(llm),
        Arc::new(linkedin),
        Arc::new(naukri),
    );

    // Build app state
    let state = AppState {
        advisor: Arc::new(advisor),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
