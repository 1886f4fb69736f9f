//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! For production use cases with large datasets, consider using sqlite-vec
//! extension or a dedicated vector database.

use super::{cosine_similarity, rank_results, ChunkRecord, IndexedSource, SearchResult, VectorStore};
use crate::error::{Result, SluglineError};
use crate::extract::Category;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    source TEXT NOT NULL,
    category TEXT,
    chunk_index INTEGER NOT NULL,
    content TEXT NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Create a new SQLite vector store.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChunkRecord> {
        let category_str: Option<String> = row.get(2)?;
        let chunk_index: i64 = row.get(3)?;
        let embedding_bytes: Vec<u8> = row.get(5)?;
        let indexed_at_str: String = row.get(6)?;

        Ok(ChunkRecord {
            id: row.get(0)?,
            source: row.get(1)?,
            category: category_str.and_then(|s| s.parse::<Category>().ok()),
            chunk_index: chunk_index as usize,
            content: row.get(4)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, records))]
    async fn upsert_batch(&self, records: &[ChunkRecord]) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SluglineError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let tx = conn.unchecked_transaction()?;

        for record in records {
            let embedding_bytes = Self::embedding_to_bytes(&record.embedding);

            tx.execute(
                r#"
                INSERT OR REPLACE INTO chunks
                (id, source, category, chunk_index, content, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.id,
                    record.source,
                    record.category.map(|c| c.dir_name()),
                    record.chunk_index as i64,
                    record.content,
                    embedding_bytes,
                    record.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} chunks", records.len());
        Ok(records.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SluglineError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, source, category, chunk_index, content, embedding, indexed_at
            FROM chunks
            "#,
        )?;

        let records = stmt.query_map([], Self::row_to_record)?;

        let mut results: Vec<SearchResult> = records
            .filter_map(|record| record.ok())
            .map(|record| {
                let score = cosine_similarity(query_embedding, &record.embedding);
                SearchResult { record, score }
            })
            .collect();

        rank_results(&mut results, limit);

        debug!("Found {} matching chunks", results.len());
        Ok(results)
    }

    async fn contains_source(&self, source: &str) -> Result<bool> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SluglineError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE source = ?1",
            params![source],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_by_source(&self, source: &str) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SluglineError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let deleted = conn.execute("DELETE FROM chunks WHERE source = ?1", params![source])?;

        info!("Deleted {} chunks for {}", deleted, source);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SluglineError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source, category, COUNT(*) as chunk_count, MAX(indexed_at) as indexed_at
            FROM chunks
            GROUP BY source
            ORDER BY source
            "#,
        )?;

        let sources = stmt.query_map([], |row| {
            let category_str: Option<String> = row.get(1)?;
            let indexed_at_str: String = row.get(3)?;
            Ok(IndexedSource {
                source: row.get(0)?,
                category: category_str.and_then(|s| s.parse::<Category>().ok()),
                chunk_count: row.get(2)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let result: Vec<IndexedSource> = sources.filter_map(|s| s.ok()).collect();
        Ok(result)
    }

    async fn chunk_count(&self) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SluglineError::VectorStore(format!("Failed to acquire lock: {}", e)))?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, index: usize, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord::new(
            Path::new(source),
            Some(Category::Theory),
            index,
            format!("chunk {}", index),
            embedding,
        )
    }

    #[tokio::test]
    async fn test_sqlite_vector_store_roundtrip() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let records = vec![
            record("/data/theory/arc.txt", 0, vec![1.0, 0.0, 0.0]),
            record("/data/theory/arc.txt", 1, vec![0.0, 1.0, 0.0]),
        ];
        store.upsert_batch(&records).await.unwrap();

        assert_eq!(store.chunk_count().await.unwrap(), 2);
        assert!(store.contains_source("/data/theory/arc.txt").await.unwrap());
        assert!(!store.contains_source("/data/theory/other.txt").await.unwrap());

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.id, "arc.txt_0");
        assert!((results[0].score - 1.0).abs() < 0.001);
        assert_eq!(results[0].record.category, Some(Category::Theory));

        let deleted = store.delete_by_source("/data/theory/arc.txt").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.chunk_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upsert_same_id_does_not_duplicate() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let first = vec![record("/data/notes.txt", 0, vec![1.0, 0.0])];
        let second = vec![record("/data/notes.txt", 0, vec![0.5, 0.5])];

        store.upsert_batch(&first).await.unwrap();
        store.upsert_batch(&second).await.unwrap();

        assert_eq!(store.chunk_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_sources_aggregates_chunks() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store
            .upsert_batch(&[
                record("/data/theory/arc.txt", 0, vec![1.0]),
                record("/data/theory/arc.txt", 1, vec![1.0]),
                record("/data/theory/beat.txt", 0, vec![1.0]),
            ])
            .await
            .unwrap();

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].source, "/data/theory/arc.txt");
        assert_eq!(sources[0].chunk_count, 2);
        assert_eq!(sources[1].chunk_count, 1);
    }
}
