//! Configuration module for slugline.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{MentorPrompts, Prompts, ScenePrompts};
pub use settings::{
    EmbeddingSettings, GeneralSettings, GenerationSettings, IngestSettings, PromptSettings,
    Settings, StoreSettings,
};
