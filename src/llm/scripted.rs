// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE ROTEIRIZADO (TESTES E MODO OFFLINE)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{GenerationRequest, LlmClient, LlmError, LlmResponse};
use crate::types::{StageKind, TokenUsage};
use crate::utils::estimate_tokens;

/// Cliente determinístico: cada estágio devolve a resposta roteirizada
/// (texto ou erro) e toda chamada fica registrada.
///
/// Estágios sem roteiro respondem `"[<stage>] mock output"`.
///
/// ```rust,ignore
/// let client = ScriptedLlmClient::new()
///     .reply(StageKind::Planner, "outline")
///     .fail(StageKind::Writer, LlmError::RateLimitError);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    replies: HashMap<StageKind, Result<String, LlmError>>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedLlmClient {
    /// Cria cliente sem roteiro
    pub fn new() -> Self {
        Self::default()
    }

    /// Roteiriza os três estágios de uma vez
    pub fn with_replies(planner: &str, writer: &str, editor: &str) -> Self {
        Self::new()
            .reply(StageKind::Planner, planner)
            .reply(StageKind::Writer, writer)
            .reply(StageKind::Editor, editor)
    }

    /// Define o texto devolvido por um estágio
    pub fn reply(mut self, stage: StageKind, text: &str) -> Self {
        self.replies.insert(stage, Ok(text.to_string()));
        self
    }

    /// Faz um estágio falhar
    pub fn fail(mut self, stage: StageKind, error: LlmError) -> Self {
        self.replies.insert(stage, Err(error));
        self
    }

    /// Cópia das requisições recebidas, em ordem
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.lock_calls().clone()
    }

    /// Estágios chamados, em ordem
    pub fn called_stages(&self) -> Vec<StageKind> {
        self.lock_calls().iter().map(|r| r.stage).collect()
    }

    /// Número de chamadas
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Descarta o histórico de chamadas
    pub fn clear_calls(&self) {
        self.lock_calls().clear();
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<GenerationRequest>> {
        // lock envenenado só acontece se um teste entrou em panic segurando o guard
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse, LlmError> {
        self.lock_calls().push(request.clone());

        let text = match self.replies.get(&request.stage) {
            Some(Ok(text)) => text.clone(),
            Some(Err(e)) => return Err(e.clone()),
            None => format!("[{}] mock output", request.stage),
        };

        let prompt_tokens =
            estimate_tokens(&request.system_prompt()) + estimate_tokens(&request.user_prompt());

        Ok(LlmResponse {
            usage: TokenUsage::new(prompt_tokens, estimate_tokens(&text)),
            text,
            model: "scripted".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(stage: StageKind) -> GenerationRequest {
        GenerationRequest {
            stage,
            role: "r".into(),
            goal: "g".into(),
            backstory: "b".into(),
            task: "t".into(),
            expected_output: "e".into(),
            topic: None,
            context: vec![],
        }
    }

    #[test]
    fn test_scripted_reply_and_record() {
        let client = ScriptedLlmClient::with_replies("A", "B", "C");

        let response = tokio_test::block_on(client.generate(&request(StageKind::Writer)));
        assert_eq!(response.map(|r| r.text), Ok("B".to_string()));
        assert_eq!(client.called_stages(), vec![StageKind::Writer]);
    }

    #[test]
    fn test_scripted_failure() {
        let client = ScriptedLlmClient::new().fail(StageKind::Planner, LlmError::RateLimitError);

        let result = tokio_test::block_on(client.generate(&request(StageKind::Planner)));
        assert_eq!(result, Err(LlmError::RateLimitError));
        assert_eq!(client.call_count(), 1);

        client.clear_calls();
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unscripted_stage_default() {
        let client = ScriptedLlmClient::new();
        let response = client.generate(&request(StageKind::Editor)).await.unwrap();
        assert_eq!(response.text, "[editor] mock output");
        assert!(response.usage.total_tokens > 0);
    }
}
