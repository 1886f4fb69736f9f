//! CLI module for slugline.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Slugline - Screenwriting Assistant with RAG
///
/// A CLI tool for drafting screenplay scenes and answering craft questions
/// grounded in an indexed library of books on screenwriting, psychology,
/// and classic fiction.
#[derive(Parser, Debug)]
#[command(name = "slugline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize slugline: create the library folders and default config
    Init,

    /// Index new documents from the data directory into the knowledge library
    Ingest,

    /// Generate a screenplay scene draft
    Scene {
        /// What happens in the scene
        plot_outline: String,

        /// Scene genre
        #[arg(short, long, default_value = "Drama")]
        genre: String,

        /// Characters in the scene
        #[arg(long, default_value = "Hero, Antagonist")]
        characters: String,

        /// Emotional tone
        #[arg(short, long, default_value = "dramatic")]
        tone: String,
    },

    /// Ask a craft question, answered from your library when possible
    Consult {
        /// The question to ask
        question: String,

        /// Number of context chunks to retrieve
        #[arg(long, default_value = "3")]
        chunks: usize,
    },

    /// Search the knowledge library directly
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Start an interactive chat session against a running server
    Chat {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,
    },

    /// List indexed sources
    List,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
