// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE LLM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para o colaborador de geração de texto.
// Provedores: Google Gemini, OpenAI (e compatíveis) e um cliente
// roteirizado para testes.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod gemini;
mod openai;
mod prompt;
mod scripted;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use scripted::ScriptedLlmClient;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{LlmConfig, LlmProvider};
use crate::types::{StageKind, TokenUsage};
use crate::utils::truncate_safe;

/// Erros do cliente LLM
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("Missing API key: set {0}")]
    MissingCredentials(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    ParseError(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),
}

/// Texto de um estágio anterior passado como contexto
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageContext {
    /// Estágio que produziu o texto
    pub from: StageKind,
    /// Papel do agente que produziu o texto
    pub role: String,
    /// Saída bruta
    pub text: String,
}

/// Tudo que o colaborador recebe para gerar a saída de um estágio
///
/// Os campos já vêm com `{topic}` substituído.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Estágio em execução
    pub stage: StageKind,
    /// Papel do agente
    pub role: String,
    /// Objetivo do agente
    pub goal: String,
    /// Persona do agente
    pub backstory: String,
    /// Descrição da tarefa
    pub task: String,
    /// Critério do resultado esperado
    pub expected_output: String,
    /// Tópico, quando o estágio o recebe como entrada
    pub topic: Option<String>,
    /// Saídas de estágios anteriores
    pub context: Vec<StageContext>,
}

impl GenerationRequest {
    /// Verifica se algum contexto contém o texto dado
    pub fn context_contains(&self, needle: &str) -> bool {
        self.context.iter().any(|c| c.text.contains(needle))
    }
}

/// Resposta gerada pelo LLM
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Texto gerado (markdown livre)
    pub text: String,
    /// Tokens consumidos
    pub usage: TokenUsage,
    /// Modelo que respondeu
    pub model: String,
}

/// Trait principal para clientes LLM
///
/// Uma chamada = um estágio. O cliente não faz retry: qualquer falha volta
/// direto para o coordenador.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Nome do provedor para logs
    fn provider_name(&self) -> &'static str;

    /// Gera o texto de um estágio
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse, LlmError>;
}

/// Cria o cliente do provedor configurado
pub fn build_client(config: &LlmConfig) -> Arc<dyn LlmClient> {
    match config.provider {
        LlmProvider::Gemini => Arc::new(GeminiClient::from_config(config)),
        LlmProvider::OpenAi => Arc::new(OpenAiClient::from_config(config)),
    }
}

/// Cliente HTTP com timeout; cai para o cliente padrão se o builder falhar
fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("⚠ Falha ao configurar cliente HTTP ({}), usando padrão", e);
            reqwest::Client::new()
        })
}

/// Converte erro de transporte do reqwest
fn map_transport_error(err: reqwest::Error, timeout_secs: u64) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout(timeout_secs)
    } else {
        LlmError::NetworkError(err.to_string())
    }
}

/// Classifica uma resposta HTTP não-2xx
///
/// O Gemini responde chave inválida com 400 + `API_KEY_INVALID`.
fn classify_status(status: u16, body: &str) -> LlmError {
    let message = sanitize_api_error(body);
    match status {
        401 | 403 => LlmError::AuthError(message),
        400 if body.contains("API_KEY_INVALID") => LlmError::AuthError(message),
        429 => LlmError::RateLimitError,
        _ => LlmError::ApiError(format!("HTTP {}: {}", status, message)),
    }
}

/// Limita mensagens de erro do provedor
fn sanitize_api_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() > 300 {
        format!("{}...(truncated)", truncate_safe(trimmed, 300))
    } else {
        trimmed.to_string()
    }
}

/// Recusa chamada sem chave antes de qualquer I/O
fn require_api_key<'a>(key: Option<&'a str>, var: &str) -> Result<&'a str, LlmError> {
    match key.map(str::trim) {
        Some(k) if !k.is_empty() => Ok(k),
        _ => Err(LlmError::MissingCredentials(var.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(matches!(classify_status(401, "bad key"), LlmError::AuthError(_)));
        assert!(matches!(classify_status(403, ""), LlmError::AuthError(_)));
        assert_eq!(classify_status(429, "quota"), LlmError::RateLimitError);
        assert_eq!(
            classify_status(500, " boom "),
            LlmError::ApiError("HTTP 500: boom".into())
        );
    }

    #[test]
    fn test_classify_gemini_invalid_key() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.",
            "status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        assert!(matches!(classify_status(400, body), LlmError::AuthError(_)));
        assert!(matches!(
            classify_status(400, r#"{"error":{"status":"INVALID_ARGUMENT"}}"#),
            LlmError::ApiError(_)
        ));
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(1000);
        let sanitized = sanitize_api_error(&body);
        assert!(sanitized.ends_with("...(truncated)"));
        assert!(sanitized.len() < 400);
    }

    #[test]
    fn test_require_api_key() {
        assert_eq!(require_api_key(Some("k"), "X"), Ok("k"));
        assert_eq!(
            require_api_key(None, "GOOGLE_API_KEY"),
            Err(LlmError::MissingCredentials("GOOGLE_API_KEY".into()))
        );
        assert!(require_api_key(Some("   "), "X").is_err());
    }

    #[test]
    fn test_build_client_by_provider() {
        let gemini = build_client(&LlmConfig::for_provider(LlmProvider::Gemini));
        assert_eq!(gemini.provider_name(), "gemini");

        let openai = build_client(&LlmConfig::for_provider(LlmProvider::OpenAi));
        assert_eq!(openai.provider_name(), "openai");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LlmError::MissingCredentials("GOOGLE_API_KEY".into()).to_string(),
            "Missing API key: set GOOGLE_API_KEY"
        );
        assert_eq!(LlmError::Timeout(30).to_string(), "Request timed out after 30s");
    }
}
