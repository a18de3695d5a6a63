// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ENDPOINT HANDLERS - formulário web + API JSON
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::page;
use super::sse;
use super::types::*;
use super::AppState;
use crate::crew::{CrewError, CrewOutput};
use crate::types::Topic;

// ── GET /health ─────────────────────────────────

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "provider": state.llm.provider_name(),
        "version": crate::VERSION,
    }))
}

// ── GET / ───────────────────────────────────────

/// Formulário vazio
pub async fn index() -> Html<String> {
    Html(page::index_page())
}

// ── POST /generate ──────────────────────────────

/// Submissão do formulário: roda o crew e devolve a página renderizada
pub async fn generate_form(
    State(state): State<Arc<AppState>>,
    Form(body): Form<GenerateRequest>,
) -> Response {
    log::info!("[form] Gerando conteúdo: {:?}", body.topic);

    match run_crew(&state, body.topic.clone()).await {
        Ok(output) => Html(page::result_page(&output.topic, &output.raw)).into_response(),
        Err(RunError::Crew(err @ CrewError::EmptyTopic)) => (
            StatusCode::BAD_REQUEST,
            Html(page::error_page(&body.topic, &err.to_string())),
        )
            .into_response(),
        Err(RunError::Crew(err)) => (
            StatusCode::BAD_GATEWAY,
            Html(page::error_page(
                &body.topic,
                &format!("An error occurred: {}", err),
            )),
        )
            .into_response(),
        Err(RunError::Panicked(msg)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(page::error_page(
                &body.topic,
                &format!("An error occurred: {}", msg),
            )),
        )
            .into_response(),
    }
}

// ── POST /api/generate ──────────────────────────

/// Versão JSON do formulário
pub async fn api_generate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateRequest>,
) -> Response {
    log::info!("[JSON] Gerando conteúdo: {:?}", body.topic);

    match run_crew(&state, body.topic).await {
        Ok(output) => Json(GenerateResponse::from(&output)).into_response(),
        Err(RunError::Crew(err)) => {
            let (status, body) = ApiError::from_crew_error(&err);
            (status, Json(body)).into_response()
        }
        Err(RunError::Panicked(msg)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(
                format!("Internal error: {}", msg),
                "internal_error",
                None,
            )),
        )
            .into_response(),
    }
}

// ── GET /api/generate/stream ────────────────────

/// Progresso por estágio via SSE
pub async fn api_generate_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GenerateRequest>,
) -> Response {
    // Tópico vazio responde 400 direto, sem abrir stream
    if Topic::parse(&query.topic).is_none() {
        let (status, body) = ApiError::from_crew_error(&CrewError::EmptyTopic);
        return (status, Json(body)).into_response();
    }

    log::info!("[SSE] Gerando conteúdo: {:?}", query.topic);
    sse::handle_streaming(state, query.topic)
}

// ── Helpers ─────────────────────────────────────

enum RunError {
    Crew(CrewError),
    Panicked(String),
}

/// Roda o kickoff em task própria; um panic vira erro 500
async fn run_crew(state: &AppState, topic: String) -> Result<CrewOutput, RunError> {
    let crew = state.crew();
    match tokio::spawn(async move { crew.kickoff(&topic).await }).await {
        Ok(result) => result.map_err(RunError::Crew),
        Err(e) => {
            log::error!("[generate] Crew task panicked: {}", e);
            Err(RunError::Panicked(e.to_string()))
        }
    }
}
