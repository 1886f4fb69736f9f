//! Scene generation and craft consultation.
//!
//! Both operations are single synchronous round trips to the chat-completion
//! API: no retries, no streaming, no post-validation of the generated text.

use crate::config::{Prompts, Settings};
use crate::embedding::Embedder;
use crate::error::{Result, SluglineError};
use crate::openai::create_client;
use crate::rag::ContextRetriever;
use crate::vector_store::VectorStore;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default tone when a scene request leaves it unset.
pub const DEFAULT_TONE: &str = "dramatic";

/// The screenwriting service: scene drafts and grounded consultations.
pub struct ScreenwriterService {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    context_chunks: usize,
    retriever: ContextRetriever,
    prompts: Prompts,
}

impl ScreenwriterService {
    /// Create a new service over the given store and embedder.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        settings: &Settings,
    ) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        Ok(Self {
            client: create_client()?,
            model: settings.generation_model(),
            temperature: settings.generation.temperature,
            context_chunks: settings.generation.context_chunks,
            retriever: ContextRetriever::new(store, embedder),
            prompts,
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Generate a screenplay scene draft from structured fields.
    ///
    /// Returns the model's text verbatim; format compliance is the style
    /// guide's job, not validated here.
    #[instrument(skip(self), fields(genre = %genre, tone = %tone))]
    pub async fn generate_scene(
        &self,
        genre: &str,
        characters: &str,
        plot_outline: &str,
        tone: &str,
    ) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("genre".to_string(), genre.to_string());
        vars.insert("characters".to_string(), characters.to_string());
        vars.insert("plot_outline".to_string(), plot_outline.to_string());
        vars.insert("tone".to_string(), tone.to_string());

        let user_prompt = self
            .prompts
            .render_with_custom(&self.prompts.scene.user, &vars);

        info!("Generating scene draft");
        self.complete(&self.prompts.scene.system, &user_prompt)
            .await
    }

    /// Answer a craft question, grounded in the knowledge library when
    /// matching material exists.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn consult(&self, question: &str) -> Result<ConsultReply> {
        let context = self
            .retriever
            .context_string(question, self.context_chunks)
            .await;
        let context_used = !context.is_empty();

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context);

        let user_prompt = self
            .prompts
            .render_with_custom(&self.prompts.mentor.user, &vars);

        debug!("Consulting (context_used = {})", context_used);
        let answer = self
            .complete(&self.prompts.mentor.system, &user_prompt)
            .await?;

        Ok(ConsultReply {
            answer,
            context_used,
        })
    }

    /// One chat-completion round trip.
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| SluglineError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user.to_string())
                .build()
                .map_err(|e| SluglineError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| SluglineError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SluglineError::Api(format!("Generation API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .cloned()
            .ok_or_else(|| SluglineError::Generation("Empty response from LLM".to_string()))
    }
}

/// A consultation reply with its grounding flag.
#[derive(Debug, Clone)]
pub struct ConsultReply {
    /// The generated advice.
    pub answer: String,
    /// Whether library context was embedded in the prompt.
    pub context_used: bool,
}
