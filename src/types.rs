// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tópico do post (sempre não-vazio após trim)
///
/// A única entrada obrigatória do pipeline. Só pode ser construído via
/// [`Topic::parse`], então qualquer `Topic` em mãos já foi validado.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Topic(String);

impl Topic {
    /// Valida e cria um tópico.
    ///
    /// Retorna `None` para strings vazias ou só com espaços.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Texto do tópico
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Os três estágios fixos do pipeline, em ordem de execução
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Gera o plano de conteúdo
    Planner,
    /// Escreve o rascunho a partir do plano
    Writer,
    /// Revisa e poli o rascunho
    Editor,
}

impl StageKind {
    /// Todos os estágios na ordem em que rodam
    pub const ALL: [StageKind; 3] = [StageKind::Planner, StageKind::Writer, StageKind::Editor];

    /// Nome curto para logs e eventos
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planner => "planner",
            Self::Writer => "writer",
            Self::Editor => "editor",
        }
    }

    /// Posição (1-based) do estágio no pipeline
    pub fn position(&self) -> usize {
        match self {
            Self::Planner => 1,
            Self::Writer => 2,
            Self::Editor => 3,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uso de tokens reportado pelo provedor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens de prompt
    pub prompt_tokens: u64,
    /// Tokens de completion
    pub completion_tokens: u64,
    /// Total
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Cria um uso a partir de prompt + completion
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_trims_whitespace() {
        let topic = Topic::parse("  Rust async  ").unwrap();
        assert_eq!(topic.as_str(), "Rust async");
    }

    #[test]
    fn test_topic_rejects_blank() {
        assert!(Topic::parse("").is_none());
        assert!(Topic::parse("   \n\t").is_none());
    }

    #[test]
    fn test_stage_order() {
        let positions: Vec<usize> = StageKind::ALL.iter().map(|s| s.position()).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(StageKind::Writer.to_string(), "writer");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(120, 80);
        assert_eq!(usage.total_tokens, 200);
    }
}
