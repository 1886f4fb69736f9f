//! Retrieval of grounding context from the knowledge library.
//!
//! A consultation first pulls the most similar indexed chunks, then embeds
//! them into the prompt sent to the model.

pub mod context;

pub use context::ContextRetriever;

use crate::extract::Category;
use crate::vector_store::SearchResult;

/// A retrieved chunk with the metadata shown to the model and the user.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// Source file name.
    pub source: String,
    /// Library category.
    pub category: Option<Category>,
    /// Text content.
    pub content: String,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for RetrievedChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            source: result.record.source_name().to_string(),
            category: result.record.category,
            content: result.record.content.clone(),
            score: result.score,
        }
    }
}
