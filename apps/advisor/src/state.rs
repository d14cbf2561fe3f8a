use std::sync::Arc;

use crate::config::Config;
use crate::workflow::Advisor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup from the configured credentials; read-only afterwards.
    pub advisor: Arc<Advisor>,
    pub config: Config,
}
