use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        food_analysis::{
            ports::LLMClient,
            value_objects::{GenerationOptions, ResponseFormat},
        },
    },
    infrastructure::llm::gemini_client::build_http_client,
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Client for any OpenAI Chat Completions compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiLLMClient {
    api_key: Option<String>,
    model_name: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiLLMClient {
    pub fn new(
        api_key: Option<String>,
        model_name: String,
        base_url: String,
        timeout_secs: u64,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            api_key,
            model_name,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_http_client(timeout_secs)?,
        })
    }

    fn build_request(&self, content: Value, options: GenerationOptions) -> ChatRequest {
        let response_format = match options.response_format {
            ResponseFormat::Json => Some(json!({ "type": "json_object" })),
            ResponseFormat::Text => None,
        };

        ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            temperature: options.temperature,
            response_format,
        }
    }

    async fn call_chat_api(&self, request: ChatRequest) -> Result<String, CoreError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("OpenAI API request failed: {}", e);
            CoreError::ExternalServiceError(format!("LLM API error: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI API error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }
}

impl LLMClient for OpenAiLLMClient {
    async fn generate_with_image(
        &self,
        prompt: String,
        image_data: Vec<u8>,
        mime_type: String,
        options: GenerationOptions,
    ) -> Result<String, CoreError> {
        let data_url = format!(
            "data:{};base64,{}",
            mime_type,
            general_purpose::STANDARD.encode(&image_data)
        );
        let content = json!([
            { "type": "text", "text": prompt },
            { "type": "image_url", "image_url": { "url": data_url } }
        ]);

        self.call_chat_api(self.build_request(content, options))
            .await
    }

    async fn generate_with_text(
        &self,
        prompt: String,
        options: GenerationOptions,
    ) -> Result<String, CoreError> {
        self.call_chat_api(self.build_request(Value::String(prompt), options))
            .await
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiLLMClient {
        OpenAiLLMClient::new(
            None,
            DEFAULT_OPENAI_MODEL.to_string(),
            "http://localhost:9/v1/".to_string(),
            5,
        )
        .unwrap()
    }

    #[test]
    fn test_json_mode_request() {
        let request = client().build_request(
            Value::String("hi".to_string()),
            GenerationOptions::json(None),
        );
        let value = serde_json::to_value(request).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["content"], "hi");
        assert!(value.get("temperature").is_none());
    }

    #[test]
    fn test_deterministic_request() {
        let request = client().build_request(
            Value::String("classify".to_string()),
            GenerationOptions::deterministic(),
        );
        let value = serde_json::to_value(request).unwrap();

        assert_eq!(value["temperature"], 0.0);
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_base_url_is_trimmed() {
        assert_eq!(client().base_url, "http://localhost:9/v1");
    }
}
