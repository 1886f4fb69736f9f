//! Context building for grounded consultations.

use super::RetrievedChunk;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Delimiter between excerpts in the prompt context.
pub const EXCERPT_DELIMITER: &str = "\n\n--- EXCERPT ---\n";

/// Retrieves grounding context for a query.
pub struct ContextRetriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl ContextRetriever {
    /// Create a new context retriever.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    /// Retrieve the top-k chunks for a query, ranked by similarity.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let query_embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&query_embedding, k).await?;
        Ok(results.into_iter().map(RetrievedChunk::from).collect())
    }

    /// Retrieve the top-k chunks and format them as a single context string.
    ///
    /// Every failure path collapses to an empty string: callers treat empty
    /// context as "no grounding available" and answer without it.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn context_string(&self, query: &str, k: usize) -> String {
        match self.retrieve(query, k).await {
            Ok(chunks) if chunks.is_empty() => {
                debug!("No matching chunks in the library");
                String::new()
            }
            Ok(chunks) => format_context_for_prompt(&chunks),
            Err(e) => {
                warn!("Context retrieval failed, answering ungrounded: {}", e);
                String::new()
            }
        }
    }
}

/// Format retrieved chunks for the model prompt.
pub fn format_context_for_prompt(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            let category = chunk
                .category
                .map(|c| c.to_string())
                .unwrap_or_else(|| "general".to_string());
            format!(
                "[Source: {}, Category: {}]\n{}",
                chunk.source, category, chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join(EXCERPT_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SluglineError;
    use crate::extract::Category;
    use crate::vector_store::{ChunkRecord, IndexedSource, MemoryVectorStore, SearchResult};
    use async_trait::async_trait;
    use std::path::Path;

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            // Axis depends on the first letter so queries can target chunks
            match text.chars().next() {
                Some(c) if c < 'm' => Ok(vec![1.0, 0.0]),
                _ => Ok(vec![0.0, 1.0]),
            }
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    /// Store whose every operation fails, for the fallback path.
    struct BrokenStore;

    #[async_trait]
    impl VectorStore for BrokenStore {
        async fn upsert_batch(&self, _records: &[ChunkRecord]) -> Result<usize> {
            Err(SluglineError::VectorStore("unreachable".to_string()))
        }

        async fn search(&self, _query: &[f32], _limit: usize) -> Result<Vec<SearchResult>> {
            Err(SluglineError::VectorStore("unreachable".to_string()))
        }

        async fn contains_source(&self, _source: &str) -> Result<bool> {
            Err(SluglineError::VectorStore("unreachable".to_string()))
        }

        async fn delete_by_source(&self, _source: &str) -> Result<usize> {
            Err(SluglineError::VectorStore("unreachable".to_string()))
        }

        async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
            Err(SluglineError::VectorStore("unreachable".to_string()))
        }

        async fn chunk_count(&self) -> Result<usize> {
            Err(SluglineError::VectorStore("unreachable".to_string()))
        }
    }

    async fn seeded_store() -> Arc<MemoryVectorStore> {
        let store = Arc::new(MemoryVectorStore::new());
        let records = vec![
            ChunkRecord::new(
                Path::new("/data/theory/arc.txt"),
                Some(Category::Theory),
                0,
                "act structure".to_string(),
                vec![1.0, 0.0],
            ),
            ChunkRecord::new(
                Path::new("/data/fiction/story.txt"),
                Some(Category::Fiction),
                0,
                "the pause before the reply".to_string(),
                vec![0.0, 1.0],
            ),
        ];
        store.upsert_batch(&records).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_context_string_annotates_source_and_category() {
        let retriever = ContextRetriever::new(seeded_store().await, Arc::new(StubEmbedder));

        let context = retriever.context_string("arc of the hero", 1).await;
        assert!(context.starts_with("[Source: arc.txt, Category: theory]"));
        assert!(context.contains("act structure"));
    }

    #[tokio::test]
    async fn test_context_string_joins_chunks_with_delimiter() {
        let retriever = ContextRetriever::new(seeded_store().await, Arc::new(StubEmbedder));

        let context = retriever.context_string("arc of the hero", 2).await;
        assert!(context.contains(EXCERPT_DELIMITER));
        assert!(context.contains("[Source: story.txt, Category: fiction]"));
    }

    #[tokio::test]
    async fn test_empty_collection_yields_empty_context() {
        let store = Arc::new(MemoryVectorStore::new());
        let retriever = ContextRetriever::new(store, Arc::new(StubEmbedder));

        let context = retriever.context_string("anything", 3).await;
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn test_broken_store_yields_empty_context() {
        let retriever = ContextRetriever::new(Arc::new(BrokenStore), Arc::new(StubEmbedder));

        let context = retriever.context_string("anything", 3).await;
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_queries_return_identical_context() {
        let retriever = ContextRetriever::new(seeded_store().await, Arc::new(StubEmbedder));

        let first = retriever.context_string("structure of act two", 2).await;
        let second = retriever.context_string("structure of act two", 2).await;
        assert_eq!(first, second);
    }
}
