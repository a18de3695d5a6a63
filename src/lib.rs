//! # Content Crew
//!
//! Pipeline de três agentes LLM que escreve um post de blog a partir de um
//! único tópico:
//!
//! 1. **Planner** - pesquisa o tópico e monta um plano de conteúdo
//! 2. **Writer** - escreve o rascunho a partir do plano
//! 3. **Editor** - revisa o rascunho e entrega o post final em markdown
//!
//! Os estágios rodam em sequência estrita; a saída de um vira contexto do
//! próximo e a primeira falha aborta a execução inteira.
//!
//! ## Arquitetura
//!
//! - [`stages`]: definições (papel, objetivo, persona, tarefa) com `{topic}`
//! - [`llm`]: trait [`llm::LlmClient`] e clientes Gemini / OpenAI / roteirizado
//! - [`crew`]: coordenador [`ContentCrew`] e seus estados
//! - `server`: formulário web + API JSON + SSE (feature `server`)
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use content_crew::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let llm = content_crew::llm::build_client(&load_llm_config());
//!     let output = ContentCrew::new(llm).kickoff("Rust for web backends").await?;
//!     println!("{}", output.raw);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos fundamentais compartilhados.
///
/// - [`Topic`]: tópico validado (não-vazio)
/// - [`StageKind`]: os três estágios fixos
/// - [`TokenUsage`]: tokens reportados pelo provedor
pub mod types;

/// Definições dos estágios e renderização de templates `{topic}`.
pub mod stages;

/// Clientes para Large Language Models (LLMs).
///
/// Define a trait `LlmClient` e implementações para:
/// - Google Gemini (padrão)
/// - OpenAI e servidores compatíveis
/// - Cliente roteirizado para testes e modo offline
pub mod llm;

/// Coordenador do pipeline Planner → Writer → Editor.
pub mod crew;

/// Utilitários diversos.
///
/// - Tracking de uso de tokens por estágio
/// - Timing de estágios
/// - Helpers de texto para logs
pub mod utils;

/// Configuração do runtime, LLM, crew e servidor.
///
/// **LLM:**
/// - `LLM_PROVIDER`: "gemini" (padrão) ou "openai"
/// - `LLM_MODEL`: modelo (padrão depende do provider)
/// - `LLM_API_BASE_URL`: URL base customizada (opcional)
/// - `LLM_TEMPERATURE`: temperatura (padrão: 0.7)
/// - `LLM_TIMEOUT_SECS`: timeout por chamada (padrão: 120)
/// - `GOOGLE_API_KEY` / `OPENAI_API_KEY`
///
/// **Crew:**
/// - `CREW_VERBOSE`: loga a saída completa de cada estágio
///
/// **Servidor:**
/// - `SERVER_HOST` (padrão: 127.0.0.1), `SERVER_PORT` (padrão: 8501)
/// - `SERVER_SECRET`: Bearer token opcional para `/api`
///
/// **Runtime Tokio:**
/// - `TOKIO_THREADS`, `TOKIO_MAX_THREADS`, `TOKIO_MAX_BLOCKING`
pub mod config;

/// Servidor HTTP (formulário web + API JSON com SSE).
#[cfg(feature = "server")]
pub mod server;

// Re-exports principais
pub use config::{
    create_tokio_runtime, install_panic_hook, load_crew_config, load_llm_config,
    load_runtime_config, load_server_config, CrewConfig, LlmConfig, LlmProvider, RuntimeConfig,
    ServerConfig,
};
pub use crew::{ContentCrew, CrewError, CrewOutput, CrewProgress, CrewState, StageOutput};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// ```rust,ignore
/// use content_crew::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{load_crew_config, load_llm_config, CrewConfig, LlmConfig};
    pub use crate::crew::{ContentCrew, CrewError, CrewOutput, CrewProgress, ProgressCallback};
    pub use crate::llm::{build_client, GeminiClient, LlmClient, LlmError, OpenAiClient};
    pub use crate::stages::CrewBlueprint;
    pub use crate::types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
