//! LLM API client configuration.
//!
//! All remote calls (embeddings and chat completions) go through an
//! OpenAI-compatible API authenticated with the `LLM_API_KEY` environment
//! variable.

use crate::error::{Result, SluglineError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for LLM API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an API client with the configured timeout.
///
/// Fails if `LLM_API_KEY` is not set; the key is read once at construction.
pub fn create_client() -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an API client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let api_key = std::env::var("LLM_API_KEY").map_err(|_| {
        SluglineError::Config(
            "LLM_API_KEY not set. Set it with: export LLM_API_KEY='sk-...'".to_string(),
        )
    })?;

    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    Ok(Client::with_config(OpenAIConfig::default().with_api_key(api_key))
        .with_http_client(http_client))
}
