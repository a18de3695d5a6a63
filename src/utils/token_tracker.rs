// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TOKEN TRACKER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Agrega o uso de tokens reportado pelo provedor em cada estágio.
// Só diagnóstico: não existe budget nem corte por consumo.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::types::{StageKind, TokenUsage};

/// Tracker de uso de tokens de uma execução
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl TokenTracker {
    /// Cria um tracker vazio
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra uso de tokens de um estágio
    pub fn track(&mut self, stage: StageKind, usage: TokenUsage) {
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;

        log::debug!(
            "Token usage [{}]: {} + {} = {} total",
            stage,
            usage.prompt_tokens,
            usage.completion_tokens,
            self.total_tokens()
        );
    }

    /// Retorna tokens totais utilizados
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// Retorna uso total formatado
    pub fn get_total_usage(&self) -> TokenUsage {
        TokenUsage::new(self.prompt_tokens, self.completion_tokens)
    }
}
