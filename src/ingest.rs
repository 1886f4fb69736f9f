//! Document ingestion pipeline.
//!
//! Coordinates the process from source discovery to indexing: extract text,
//! chunk, embed in bounded batches, and persist. A failure in one file or
//! one batch is logged and the run continues.

use crate::chunking::{split_text, ChunkingConfig};
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::extract::{discover_documents, extract_text, SourceDocument};
use crate::vector_store::{ChunkRecord, SqliteVectorStore, VectorStore};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The ingestion pipeline.
pub struct Ingestor {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl Ingestor {
    /// Create a new ingestor with default components.
    pub fn new(settings: Settings) -> Result<Self> {
        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        )?);

        let store = Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?);

        Ok(Self {
            settings,
            embedder,
            store,
        })
    }

    /// Create an ingestor with injected components.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            settings,
            embedder,
            store,
        }
    }

    /// Get a reference to the vector store.
    pub fn store(&self) -> Arc<dyn VectorStore> {
        self.store.clone()
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ingest every new document under the data directory.
    #[instrument(skip(self))]
    pub async fn ingest_all(&self) -> Result<IngestReport> {
        let data_dir = self.settings.data_dir();
        let documents = discover_documents(&data_dir)?;

        info!("Found {} documents under {:?}", documents.len(), data_dir);

        let mut report = IngestReport::default();

        for document in &documents {
            match self.ingest_document(document).await {
                Ok(None) => {
                    info!("Skipping {} (already indexed)", document.file_name());
                    report.files_skipped += 1;
                }
                Ok(Some(chunks)) => {
                    report.files_indexed += 1;
                    report.chunks_indexed += chunks;
                }
                Err(e) => {
                    warn!("Failed to ingest {}: {}", document.file_name(), e);
                    report.files_failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Ingest a single document. Returns `None` when the source is already
    /// indexed, otherwise the number of chunks written.
    #[instrument(skip(self, document), fields(source = %document.file_name()))]
    pub async fn ingest_document(&self, document: &SourceDocument) -> Result<Option<usize>> {
        let source = document.path.display().to_string();

        if self.store.contains_source(&source).await? {
            return Ok(None);
        }

        let text = extract_text(&document.path)?;
        if text.trim().is_empty() {
            warn!("No extractable text in {}, skipping", document.file_name());
            return Ok(Some(0));
        }

        let chunking = ChunkingConfig {
            chunk_size: self.settings.ingest.chunk_size,
            overlap: self.settings.ingest.chunk_overlap,
        };
        let chunks = split_text(&text, &chunking);

        info!(
            "Indexing {} ({} chunks)",
            document.file_name(),
            chunks.len()
        );

        let batch_size = self.settings.ingest.embed_batch_size.max(1);
        let mut indexed = 0;

        for (batch_no, batch) in chunks.chunks(batch_size).enumerate() {
            let offset = batch_no * batch_size;

            let embeddings = match self.embedder.embed_batch(batch).await {
                Ok(embeddings) => embeddings,
                Err(e) => {
                    warn!(
                        "Embedding batch {} of {} failed: {}",
                        batch_no,
                        document.file_name(),
                        e
                    );
                    continue;
                }
            };

            let records: Vec<ChunkRecord> = batch
                .iter()
                .zip(embeddings)
                .enumerate()
                .map(|(i, (content, embedding))| {
                    ChunkRecord::new(
                        &document.path,
                        document.category,
                        offset + i,
                        content.clone(),
                        embedding,
                    )
                })
                .collect();

            match self.store.upsert_batch(&records).await {
                Ok(count) => indexed += count,
                Err(e) => {
                    warn!(
                        "Inserting batch {} of {} failed: {}",
                        batch_no,
                        document.file_name(),
                        e
                    );
                }
            }
        }

        Ok(Some(indexed))
    }
}

/// Result of an ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Files newly indexed in this run.
    pub files_indexed: usize,
    /// Files skipped because their source path was already indexed.
    pub files_skipped: usize,
    /// Files whose ingestion failed.
    pub files_failed: usize,
    /// Total chunks written.
    pub chunks_indexed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::error::SluglineError;
    use crate::vector_store::MemoryVectorStore;
    use async_trait::async_trait;

    /// Deterministic embedder: maps each text onto a fixed-length vector
    /// derived from its bytes.
    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let sum: u32 = text.bytes().map(u32::from).sum();
            Ok(vec![text.len() as f32, (sum % 977) as f32, 1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    /// Embedder that always fails, to exercise batch-failure tolerance.
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(SluglineError::Embedding("stub failure".to_string()))
        }

        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(SluglineError::Embedding("stub failure".to_string()))
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn test_settings(data_dir: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.general.data_dir = data_dir.display().to_string();
        settings
    }

    fn test_ingestor(data_dir: &std::path::Path) -> (Ingestor, Arc<MemoryVectorStore>) {
        let store = Arc::new(MemoryVectorStore::new());
        let ingestor = Ingestor::with_components(
            test_settings(data_dir),
            Arc::new(StubEmbedder),
            store.clone(),
        );
        (ingestor, store)
    }

    #[tokio::test]
    async fn test_ingest_chunk_ids_are_sequential() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("theory")).unwrap();
        std::fs::write(dir.path().join("theory/arc.txt"), "z".repeat(2500)).unwrap();

        let (ingestor, store) = test_ingestor(dir.path());
        let report = ingestor.ingest_all().await.unwrap();

        assert_eq!(report.files_indexed, 1);
        assert_eq!(report.chunks_indexed, 3);

        let results = store.search(&[2500.0, 0.0, 1.0], 10).await.unwrap();
        let mut ids: Vec<_> = results.iter().map(|r| r.record.id.clone()).collect();
        ids.sort();
        assert_eq!(ids, vec!["arc.txt_0", "arc.txt_1", "arc.txt_2"]);
    }

    #[tokio::test]
    async fn test_reingestion_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("fiction")).unwrap();
        std::fs::write(dir.path().join("fiction/chekhov.txt"), "a".repeat(1500)).unwrap();

        let (ingestor, store) = test_ingestor(dir.path());

        let first = ingestor.ingest_all().await.unwrap();
        assert_eq!(first.files_indexed, 1);
        let count_after_first = store.chunk_count().await.unwrap();

        let second = ingestor.ingest_all().await.unwrap();
        assert_eq!(second.files_indexed, 0);
        assert_eq!(second.files_skipped, 1);
        assert_eq!(store.chunk_count().await.unwrap(), count_after_first);
    }

    #[tokio::test]
    async fn test_empty_file_is_skipped_without_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("theory")).unwrap();
        std::fs::write(dir.path().join("theory/blank.txt"), "   \n").unwrap();

        let (ingestor, store) = test_ingestor(dir.path());
        let report = ingestor.ingest_all().await.unwrap();

        assert_eq!(report.files_failed, 0);
        assert_eq!(report.chunks_indexed, 0);
        assert_eq!(store.chunk_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_does_not_abort_the_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("theory")).unwrap();
        std::fs::write(dir.path().join("theory/a.txt"), "first document").unwrap();
        std::fs::write(dir.path().join("theory/b.txt"), "second document").unwrap();

        let store = Arc::new(MemoryVectorStore::new());
        let ingestor = Ingestor::with_components(
            test_settings(dir.path()),
            Arc::new(FailingEmbedder),
            store.clone(),
        );

        // Both files are visited; failed batches leave nothing indexed
        let report = ingestor.ingest_all().await.unwrap();
        assert_eq!(report.files_indexed, 2);
        assert_eq!(report.chunks_indexed, 0);
        assert_eq!(store.chunk_count().await.unwrap(), 0);
    }
}
