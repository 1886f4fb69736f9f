//! Consult command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::service::ScreenwriterService;
use crate::vector_store::SqliteVectorStore;
use anyhow::Result;
use std::sync::Arc;

/// Run the consult command.
pub async fn run_consult(question: &str, chunks: usize, mut settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Generate) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    settings.generation.context_chunks = chunks;

    let store = Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?);
    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    )?);

    let service = ScreenwriterService::new(store, embedder, &settings)?;

    let spinner = Output::spinner("Consulting the library...");

    match service.consult(question).await {
        Ok(reply) => {
            spinner.finish_and_clear();

            println!("\n{}\n", reply.answer);

            if reply.context_used {
                Output::info("Answer grounded in your library.");
            } else {
                Output::warning("No matching material found; answer is ungrounded.");
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate advice: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
