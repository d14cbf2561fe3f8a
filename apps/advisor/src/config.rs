use std::time::Duration;

use thiserror::Error;

use crate::jobs::{DEFAULT_LOCATION, DEFAULT_MAX_JOBS};
use crate::llm_client::{DEFAULT_COMPLETIONS_URL, DEFAULT_MODEL};

pub const DEFAULT_APIFY_URL: &str = "https://api.apify.com";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("Environment variable '{key}' has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
/// Startup aborts if either credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub euri_api_key: String,
    pub euri_api_url: String,
    pub euri_model: String,
    pub completion_timeout: Duration,
    pub apify_api_token: String,
    pub apify_api_url: String,
    /// `None` waits for as long as the platform keeps the run alive.
    pub apify_run_timeout: Option<Duration>,
    pub job_location: String,
    pub max_jobs: u32,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            euri_api_key: require("EURI_API_KEY")?,
            euri_api_url: or_default("EURI_API_URL", DEFAULT_COMPLETIONS_URL),
            euri_model: or_default("EURI_MODEL", DEFAULT_MODEL),
            completion_timeout: Duration::from_secs(parse_or(
                &lookup,
                "COMPLETION_TIMEOUT_SECS",
                120,
            )?),
            apify_api_token: require("APIFY_API_TOKEN")?,
            apify_api_url: or_default("APIFY_API_URL", DEFAULT_APIFY_URL),
            apify_run_timeout: parse_opt(&lookup, "APIFY_RUN_TIMEOUT_SECS")?
                .map(Duration::from_secs),
            job_location: or_default("JOB_LOCATION", DEFAULT_LOCATION),
            max_jobs: parse_or(&lookup, "MAX_JOBS", DEFAULT_MAX_JOBS)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

fn parse_opt<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}
