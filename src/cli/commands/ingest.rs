//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::ingest::Ingestor;
use anyhow::Result;

/// Run the ingest command.
pub async fn run_ingest(settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ingest) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let ingestor = Ingestor::new(settings.clone())?;

    Output::info(&format!(
        "Ingesting documents from {}",
        settings.data_dir().display()
    ));

    let spinner = Output::spinner("Indexing library...");
    let report = ingestor.ingest_all().await;
    spinner.finish_and_clear();

    match report {
        Ok(report) => {
            Output::success("Ingestion complete.");
            Output::kv("Files indexed", &report.files_indexed.to_string());
            Output::kv("Files skipped", &report.files_skipped.to_string());
            Output::kv("Files failed", &report.files_failed.to_string());
            Output::kv("Chunks written", &report.chunks_indexed.to_string());
        }
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
