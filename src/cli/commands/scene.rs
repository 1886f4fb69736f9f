//! Scene command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::service::ScreenwriterService;
use crate::vector_store::SqliteVectorStore;
use anyhow::Result;
use std::sync::Arc;

/// Run the scene command.
pub async fn run_scene(
    plot_outline: &str,
    genre: &str,
    characters: &str,
    tone: &str,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Generate) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let store = Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?);
    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    )?);

    let service = ScreenwriterService::new(store, embedder, &settings)?;

    let spinner = Output::spinner("Drafting scene...");

    match service
        .generate_scene(genre, characters, plot_outline, tone)
        .await
    {
        Ok(scene) => {
            spinner.finish_and_clear();
            println!("\n{}\n", scene);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate scene: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
