//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{Result, SluglineError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Ingestion requires the API key for embeddings.
    Ingest,
    /// Generation and consultation require the API key.
    Generate,
    /// Search requires the API key for the query embedding.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Ingest | Operation::Generate | Operation::Search => {
            check_api_key()?;
        }
    }
    Ok(())
}

/// Check if the LLM API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("LLM_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SluglineError::Config(
            "LLM_API_KEY is empty. Set it with: export LLM_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(SluglineError::Config(
            "LLM_API_KEY not set. Set it with: export LLM_API_KEY='sk-...'".to_string(),
        )),
    }
}
