// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP SERVER - Formulário web + API JSON com SSE Streaming
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!
//! ## Endpoints
//!
//! - `GET /` - Formulário (tópico + "Generate Content")
//! - `POST /generate` - Submissão do formulário, devolve HTML
//! - `POST /api/generate` - Mesmo pipeline, resposta JSON
//! - `GET /api/generate/stream?topic=` - Progresso por estágio via SSE
//! - `GET /health` - Health check
//!
//! ## Uso
//!
//! ```bash
//! cargo run -- --server --port=8501
//! SERVER_SECRET=minha-chave cargo run -- --server
//! ```

#[allow(missing_docs)]
pub mod handlers;
pub mod page;
#[allow(missing_docs)]
pub mod sse;
pub mod types;
mod auth;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::CrewConfig;
use crate::crew::ContentCrew;
use crate::llm::LlmClient;
use crate::stages::CrewBlueprint;

pub use types::*;

/// Estado compartilhado entre todos os handlers
///
/// Só configuração imutável: cada requisição monta seu próprio crew.
pub struct AppState {
    /// Cliente LLM compartilhado
    pub llm: Arc<dyn LlmClient>,
    /// Definições dos estágios
    pub blueprint: CrewBlueprint,
    /// Configuração do coordenador
    pub crew_config: CrewConfig,
    /// Token de autenticação opcional (Bearer) para `/api`
    pub secret: Option<String>,
}

impl AppState {
    /// Cria estado com os estágios padrão
    pub fn new(llm: Arc<dyn LlmClient>, crew_config: CrewConfig, secret: Option<String>) -> Self {
        Self {
            llm,
            blueprint: CrewBlueprint::default(),
            crew_config,
            secret,
        }
    }

    /// Crew novo para uma requisição
    pub fn crew(&self) -> ContentCrew {
        ContentCrew::new(self.llm.clone())
            .with_blueprint(self.blueprint.clone())
            .with_config(self.crew_config)
    }
}

/// Monta o router completo (usado pelo servidor e pelos testes)
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/generate", post(handlers::api_generate))
        .route("/api/generate/stream", get(handlers::api_generate_stream));

    // Auth middleware condicional, só nas rotas /api
    let api = if state.secret.is_some() {
        api.layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
    } else {
        api
    };

    Router::new()
        .route("/", get(handlers::index))
        .route("/generate", post(handlers::generate_form))
        .route("/health", get(handlers::health))
        .merge(api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Inicia o servidor HTTP no endereço especificado.
///
/// Entry point chamado de main.rs quando `--server` é passado.
pub async fn start_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Content Crew server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
