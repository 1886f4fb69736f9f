//! Slugline - Screenwriting Assistant with RAG
//!
//! A CLI tool and HTTP service for drafting screenplay scenes and answering
//! screenwriting-craft questions grounded in an indexed library of books.
//!
//! A "slugline" is the scene heading of a screenplay (INT. KITCHEN - NIGHT).
//!
//! # Overview
//!
//! Slugline allows you to:
//! - Index PDF and text books into a searchable knowledge library
//! - Generate screenplay scene drafts from structured prompts
//! - Ask craft questions and get advice grounded in your library
//! - Serve both operations over a small JSON HTTP API
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt template management
//! - `extract` - Source document discovery and text extraction
//! - `chunking` - Fixed-size text chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `rag` - Context retrieval for grounded answers
//! - `ingest` - Ingestion pipeline coordination
//! - `service` - Scene generation and consultation
//!
//! # Example
//!
//! ```rust,no_run
//! use slugline::config::Settings;
//! use slugline::ingest::Ingestor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let ingestor = Ingestor::new(settings)?;
//!
//!     // Index every new document under the data directory
//!     let report = ingestor.ingest_all().await?;
//!     println!("Indexed {} chunks", report.chunks_indexed);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod openai;
pub mod rag;
pub mod service;
pub mod vector_store;

pub use error::{Result, SluglineError};
