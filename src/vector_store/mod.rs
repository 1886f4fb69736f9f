//! Vector store abstraction for slugline.
//!
//! Provides a trait-based interface for different vector database backends.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use crate::extract::Category;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An indexed chunk stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk id: `{source file name}_{sequential index}`.
    pub id: String,
    /// Path of the source file this chunk came from.
    pub source: String,
    /// Library category, if the source lived in a category folder.
    pub category: Option<Category>,
    /// Sequential position of this chunk within its document.
    pub chunk_index: usize,
    /// Text content of this chunk.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this chunk was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl ChunkRecord {
    /// Create a new chunk record. The id is derived from the source file
    /// name and the chunk's sequential index.
    pub fn new(
        source: &Path,
        category: Option<Category>,
        chunk_index: usize,
        content: String,
        embedding: Vec<f32>,
    ) -> Self {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());

        Self {
            id: format!("{}_{}", file_name, chunk_index),
            source: source.display().to_string(),
            category,
            chunk_index,
            content,
            embedding,
            indexed_at: Utc::now(),
        }
    }

    /// File name component of the source path, for display.
    pub fn source_name(&self) -> &str {
        Path::new(&self.source)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.source)
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched chunk.
    pub record: ChunkRecord,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Summary information about an indexed source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedSource {
    /// Source file path.
    pub source: String,
    /// Library category.
    pub category: Option<Category>,
    /// Number of indexed chunks.
    pub chunk_count: u32,
    /// When the source was indexed.
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk upsert chunk records.
    async fn upsert_batch(&self, records: &[ChunkRecord]) -> Result<usize>;

    /// Search for the most similar chunks, ranked by score descending.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Check whether any chunk of the given source path is indexed.
    async fn contains_source(&self, source: &str) -> Result<bool>;

    /// Delete all chunks of a source path.
    async fn delete_by_source(&self, source: &str) -> Result<usize>;

    /// List all indexed sources.
    async fn list_sources(&self) -> Result<Vec<IndexedSource>>;

    /// Get total chunk count.
    async fn chunk_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Rank results by score descending; ties break on chunk id so repeated
/// queries over an unchanged collection return a stable order.
pub(crate) fn rank_results(results: &mut Vec<SearchResult>, limit: usize) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.record.id.cmp(&b.record.id))
    });
    results.truncate(limit);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_chunk_id_format() {
        let record = ChunkRecord::new(
            Path::new("/data/theory/story.txt"),
            Some(Category::Theory),
            2,
            "content".to_string(),
            vec![],
        );

        assert_eq!(record.id, "story.txt_2");
        assert_eq!(record.source, "/data/theory/story.txt");
        assert_eq!(record.source_name(), "story.txt");
    }
}
