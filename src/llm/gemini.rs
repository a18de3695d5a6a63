// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GOOGLE GEMINI - generateContent
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

// ─────────────────────────────────────────────────
// API Types
// ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiContent,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    /// Pode faltar em respostas vazias
    #[serde(default)]
    candidates_token_count: u64,
}

// ─────────────────────────────────────────────────
// Cliente
// ─────────────────────────────────────────────────

/// Cliente para a Generative Language API do Google
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Cria cliente com a configuração padrão do Gemini
    pub fn new(api_key: Option<String>) -> Self {
        let config = LlmConfig::for_provider(LlmProvider::Gemini);
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
        self.model = crate::config::normalize_model_name(model);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_body(&self, request: &GenerationRequest) -> GeminiRequest {
        GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: request.system_prompt(),
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user".into()),
                parts: vec![GeminiPart {
                    text: request.user_prompt(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Junta o texto de todas as parts do primeiro candidato
fn extract_text(response: &GeminiResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse, LlmError> {
        let api_key = require_api_key(self.api_key.as_deref(), "GOOGLE_API_KEY")?;

        // A chave vai no header, nunca na URL (URL aparece em logs)
        log::debug!("Gemini request: model={} stage={}", self.model, request.stage);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
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
            log::warn!("Gemini API error: status={}", status);
            return Err(classify_status(status.as_u16(), &body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        let text = extract_text(&parsed).ok_or(LlmError::EmptyResponse)?;
        let usage = parsed
            .usage_metadata
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        Ok(LlmResponse {
            text,
            usage,
            model: self.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::StageContext;
    use crate::types::StageKind;

    fn request() -> GenerationRequest {
        GenerationRequest {
            stage: StageKind::Editor,
            role: "Editor".into(),
            goal: "Edit".into(),
            backstory: "You edit.".into(),
            task: "Proofread.".into(),
            expected_output: "Polished post.".into(),
            topic: None,
            context: vec![StageContext {
                from: StageKind::Writer,
                role: "Content Writer".into(),
                text: "DRAFT".into(),
            }],
        }
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(None).with_model("models/gemini-pro");
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let client = GeminiClient::new(Some("key".into()));
        let body = serde_json::to_value(client.build_body(&request())).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("DRAFT"));
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("You are Editor."));
        assert!(body["systemInstruction"].get("role").is_none());
        assert!(body["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"world"}]}}],
                "usageMetadata":{"promptTokenCount":10,"candidatesTokenCount":2,"totalTokenCount":12}}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response), Some("Hello world".into()));
        assert_eq!(response.usage_metadata.unwrap().candidates_token_count, 2);
    }

    #[test]
    fn test_extract_text_empty() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(extract_text(&response), None);

        let blocked: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(extract_text(&blocked), None);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = GeminiClient::new(None);
        let result = client.generate(&request()).await;
        assert_eq!(
            result,
            Err(LlmError::MissingCredentials("GOOGLE_API_KEY".into()))
        );
    }

    #[test]
    fn test_debug_masks_key() {
        let client = GeminiClient::new(Some("AIzaSyVerySecret".into()));
        let debug = format!("{:?}", client);
        assert!(!debug.contains("VerySecret"));
    }
}
