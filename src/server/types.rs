// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SCHEMAS API - geração de posts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#![allow(missing_docs)]

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crew::{CrewError, CrewOutput, StageOutput};
use crate::types::{StageKind, TokenUsage};
use crate::utils::word_count;

// ─────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────

/// Corpo de POST /generate (form) e POST /api/generate (JSON)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: String,
}

// ─────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────

/// Resumo de um estágio (sem o texto intermediário)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: StageKind,
    pub role: String,
    pub elapsed_ms: u64,
    pub words: usize,
    pub usage: TokenUsage,
}

impl From<&StageOutput> for StageSummary {
    fn from(output: &StageOutput) -> Self {
        Self {
            stage: output.stage,
            role: output.role.clone(),
            elapsed_ms: output.elapsed_ms,
            words: word_count(&output.raw),
            usage: output.usage,
        }
    }
}

/// Resposta de POST /api/generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub run_id: Uuid,
    pub topic: String,
    /// Post final em markdown
    pub content: String,
    pub stages: Vec<StageSummary>,
    pub usage: TokenUsage,
    pub total_time_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&CrewOutput> for GenerateResponse {
    fn from(output: &CrewOutput) -> Self {
        Self {
            run_id: output.run_id,
            topic: output.topic.clone(),
            content: output.raw.clone(),
            stages: output.stages.iter().map(StageSummary::from).collect(),
            usage: output.token_usage,
            total_time_ms: output.total_time_ms,
            created_at: output.created_at,
        }
    }
}

// ─────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────

/// Corpo de erro da API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, error_type: &str, code: Option<&str>) -> Self {
        Self {
            error: ApiErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
                stage: None,
                code: code.map(Into::into),
            },
        }
    }

    /// Status HTTP + corpo para um erro do pipeline
    pub fn from_crew_error(err: &CrewError) -> (StatusCode, Self) {
        match err {
            CrewError::EmptyTopic => (
                StatusCode::BAD_REQUEST,
                Self::new(err.to_string(), "invalid_request_error", Some("empty_topic")),
            ),
            CrewError::StageFailed { stage, .. } => {
                let mut body = Self::new(err.to_string(), "upstream_error", Some("stage_failed"));
                body.error.stage = Some(*stage);
                (StatusCode::BAD_GATEWAY, body)
            }
        }
    }
}
