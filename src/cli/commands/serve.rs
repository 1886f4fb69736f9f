//! HTTP API server.
//!
//! Exposes scene generation, consultation, and raw library search as JSON
//! endpoints.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::rag::ContextRetriever;
use crate::service::{ScreenwriterService, DEFAULT_TONE};
use crate::vector_store::{SqliteVectorStore, VectorStore};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    service: ScreenwriterService,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Generate) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?);
    let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    )?);

    let service = ScreenwriterService::new(store.clone(), embedder.clone(), &settings)?;

    let state = Arc::new(AppState {
        service,
        store,
        embedder,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/generate/scene", post(generate_scene))
        .route("/consult", post(consult))
        .route("/search", post(search))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Slugline API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Status", "GET  /");
    Output::kv("Generate scene", "POST /generate/scene");
    Output::kv("Consult", "POST /consult");
    Output::kv("Search", "POST /search");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ScenarioRequest {
    genre: String,
    characters: String,
    plot_outline: String,
    #[serde(default = "default_tone")]
    tone: String,
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

#[derive(Serialize)]
struct SceneResponse {
    scene_script: String,
}

#[derive(Deserialize)]
struct ConsultRequest {
    question: String,
}

#[derive(Serialize)]
struct ConsultResponse {
    response: String,
    context_used: bool,
}

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    5
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

#[derive(Serialize)]
struct SearchHit {
    source: String,
    category: Option<String>,
    content: String,
    score: f32,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "slugline" }))
}

async fn generate_scene(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScenarioRequest>,
) -> impl IntoResponse {
    match state
        .service
        .generate_scene(&req.genre, &req.characters, &req.plot_outline, &req.tone)
        .await
    {
        Ok(scene) => Json(SceneResponse {
            scene_script: scene,
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn consult(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConsultRequest>,
) -> impl IntoResponse {
    match state.service.consult(&req.question).await {
        Ok(reply) => Json(ConsultResponse {
            response: reply.answer,
            context_used: reply.context_used,
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> impl IntoResponse {
    let retriever = ContextRetriever::new(state.store.clone(), state.embedder.clone());

    match retriever.retrieve(&req.query, req.limit).await {
        Ok(chunks) => Json(SearchResponse {
            results: chunks
                .into_iter()
                .map(|c| SearchHit {
                    source: c.source,
                    category: c.category.map(|cat| cat.to_string()),
                    content: c.content,
                    score: c.score,
                })
                .collect(),
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
