//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, rank_results, ChunkRecord, IndexedSource, SearchResult, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    records: RwLock<HashMap<String, ChunkRecord>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, records: &[ChunkRecord]) -> Result<usize> {
        let mut store = self.records.write().unwrap();
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let records = self.records.read().unwrap();

        let mut results: Vec<SearchResult> = records
            .values()
            .map(|record| {
                let score = cosine_similarity(query_embedding, &record.embedding);
                SearchResult {
                    record: record.clone(),
                    score,
                }
            })
            .collect();

        rank_results(&mut results, limit);

        Ok(results)
    }

    async fn contains_source(&self, source: &str) -> Result<bool> {
        let records = self.records.read().unwrap();
        Ok(records.values().any(|r| r.source == source))
    }

    async fn delete_by_source(&self, source: &str) -> Result<usize> {
        let mut records = self.records.write().unwrap();
        let initial_len = records.len();
        records.retain(|_, record| record.source != source);
        Ok(initial_len - records.len())
    }

    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let records = self.records.read().unwrap();

        let mut source_map: HashMap<String, IndexedSource> = HashMap::new();

        for record in records.values() {
            let entry = source_map
                .entry(record.source.clone())
                .or_insert_with(|| IndexedSource {
                    source: record.source.clone(),
                    category: record.category,
                    chunk_count: 0,
                    indexed_at: record.indexed_at,
                });

            entry.chunk_count += 1;
            if record.indexed_at > entry.indexed_at {
                entry.indexed_at = record.indexed_at;
            }
        }

        let mut sources: Vec<IndexedSource> = source_map.into_values().collect();
        sources.sort_by(|a, b| a.source.cmp(&b.source));

        Ok(sources)
    }

    async fn chunk_count(&self) -> Result<usize> {
        let records = self.records.read().unwrap();
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Category;
    use std::path::Path;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        let chunk0 = ChunkRecord::new(
            Path::new("/data/psychology/games.txt"),
            Some(Category::Psychology),
            0,
            "Hidden motive".to_string(),
            vec![1.0, 0.0, 0.0],
        );

        let chunk1 = ChunkRecord::new(
            Path::new("/data/psychology/games.txt"),
            Some(Category::Psychology),
            1,
            "Behavior pattern".to_string(),
            vec![0.0, 1.0, 0.0],
        );

        store.upsert_batch(&[chunk0, chunk1]).await.unwrap();

        assert_eq!(store.chunk_count().await.unwrap(), 2);
        assert!(store
            .contains_source("/data/psychology/games.txt")
            .await
            .unwrap());

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].chunk_count, 2);

        let deleted = store
            .delete_by_source("/data/psychology/games.txt")
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert!(store.list_sources().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_order_is_stable() {
        let store = MemoryVectorStore::new();

        // Three chunks with identical embeddings tie on score
        let records: Vec<ChunkRecord> = (0..3)
            .map(|i| {
                ChunkRecord::new(
                    Path::new("/data/ties.txt"),
                    None,
                    i,
                    format!("chunk {}", i),
                    vec![1.0, 0.0],
                )
            })
            .collect();
        store.upsert_batch(&records).await.unwrap();

        let first = store.search(&[1.0, 0.0], 3).await.unwrap();
        let second = store.search(&[1.0, 0.0], 3).await.unwrap();

        let first_ids: Vec<_> = first.iter().map(|r| r.record.id.clone()).collect();
        let second_ids: Vec<_> = second.iter().map(|r| r.record.id.clone()).collect();
        assert_eq!(first_ids, second_ids);
        assert_eq!(first_ids, vec!["ties.txt_0", "ties.txt_1", "ties.txt_2"]);
    }
}
