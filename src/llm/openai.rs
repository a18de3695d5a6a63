// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// OPENAI - /chat/completions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Funciona com qualquer servidor compatível (vLLM, Ollama, OpenRouter...)
// via LLM_API_BASE_URL.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    classify_status, http_client, map_transport_error, require_api_key, GenerationRequest,
    LlmClient, LlmError, LlmResponse,
};
use crate::config::{mask_api_key, LlmConfig, LlmProvider};
use crate::types::TokenUsage;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

/// Cliente para OpenAI API
pub struct OpenAiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Cria cliente com a configuração padrão da OpenAI
    pub fn new(api_key: Option<String>) -> Self {
        let config = LlmConfig::for_provider(LlmProvider::OpenAi);
        Self::from_config(&LlmConfig { api_key, ..config })
    }

    /// Cria cliente a partir da configuração carregada
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
            client: http_client(config.timeout_secs),
        }
    }

    /// Troca o modelo
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_body(&self, request: &GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: request.user_prompt(),
                },
            ],
            temperature: self.temperature,
        }
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse, LlmError> {
        let api_key = require_api_key(self.api_key.as_deref(), "OPENAI_API_KEY")?;

        log::debug!("OpenAI request: model={} stage={}", self.model, request.stage);

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, self.timeout_secs))?;

        if !status.is_success() {
            log::warn!("OpenAI API error: status={}", status);
            return Err(classify_status(status.as_u16(), &body));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::ParseError(e.to_string()))?;

        let text = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        let usage = parsed
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(LlmResponse {
            text,
            usage,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StageKind;

    fn request() -> GenerationRequest {
        GenerationRequest {
            stage: StageKind::Planner,
            role: "Content Planner".into(),
            goal: "Plan content on Rust".into(),
            backstory: "You plan.".into(),
            task: "Outline it.".into(),
            expected_output: "A plan.".into(),
            topic: Some("Rust".into()),
            context: vec![],
        }
    }

    #[test]
    fn test_endpoint_custom_base() {
        let config = LlmConfig::for_provider(LlmProvider::OpenAi).with_base_url("http://localhost:11434/v1/");
        let client = OpenAiClient::from_config(&config);
        assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_request_body_roles() {
        let client = OpenAiClient::new(Some("sk-test".into())).with_model("gpt-4o-mini");
        let body = serde_json::to_value(client.build_body(&request())).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("Topic: Rust"));
    }

    #[test]
    fn test_parse_response() {
        let parsed: ChatResponse = serde_json::from_str(
            r##"{"model":"gpt-4.1-mini","choices":[{"message":{"role":"assistant","content":"# Plan"}}],
                "usage":{"prompt_tokens":5,"completion_tokens":3,"total_tokens":8}}"##,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("# Plan"));
        assert_eq!(parsed.usage.unwrap().completion_tokens, 3);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = OpenAiClient::new(None);
        assert_eq!(
            client.generate(&request()).await,
            Err(LlmError::MissingCredentials("OPENAI_API_KEY".into()))
        );
    }
}
