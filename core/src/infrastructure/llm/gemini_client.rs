use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        ports::LLMClient,
        value_objects::{GenerationOptions, ResponseFormat},
    },
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiLLMClient {
    api_key: String,
    model_name: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

impl GenerationConfig {
    fn from_options(options: GenerationOptions) -> Option<Self> {
        let config = match options.response_format {
            ResponseFormat::Json => GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: options.response_schema,
                temperature: options.temperature,
            },
            ResponseFormat::Text => GenerationConfig {
                temperature: options.temperature,
                ..GenerationConfig::default()
            },
        };

        let is_empty = config.response_mime_type.is_none()
            && config.response_schema.is_none()
            && config.temperature.is_none();

        (!is_empty).then_some(config)
    }
}

/// Pick the model to use from a model listing: a `flash` Gemini model first,
/// then any Gemini model. The `models/` prefix is stripped.
pub fn select_model<S: AsRef<str>>(names: &[S]) -> Option<String> {
    let clean = |name: &str| name.trim_start_matches("models/").to_string();

    names
        .iter()
        .map(AsRef::as_ref)
        .find(|name| name.contains("flash") && name.contains("gemini"))
        .or_else(|| {
            names
                .iter()
                .map(AsRef::as_ref)
                .find(|name| name.contains("gemini"))
        })
        .map(clean)
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, CoreError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| CoreError::InvalidConfiguration(format!("failed to build HTTP client: {}", e)))
}

impl GeminiLLMClient {
    pub fn new(
        api_key: String,
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

    /// Build a client whose model is discovered from the account's model list.
    pub async fn discover(
        api_key: String,
        base_url: String,
        timeout_secs: u64,
    ) -> Result<Self, CoreError> {
        let mut client = Self::new(
            api_key,
            DEFAULT_GEMINI_MODEL.to_string(),
            base_url,
            timeout_secs,
        )?;
        client.model_name = client.resolve_model_name().await;
        Ok(client)
    }

    /// Lists the available models and picks one, falling back to
    /// [`DEFAULT_GEMINI_MODEL`] when listing fails or nothing matches.
    pub async fn resolve_model_name(&self) -> String {
        tracing::info!("Finding available Gemini model");

        match self.list_models().await {
            Ok(names) => match select_model(names.as_slice()) {
                Some(model) => {
                    if model.contains("flash") {
                        tracing::info!(model = %model, "Found preferred model");
                    } else {
                        tracing::warn!(model = %model, "No flash model available, using fallback");
                    }
                    model
                }
                None => {
                    tracing::warn!(
                        model = DEFAULT_GEMINI_MODEL,
                        "No Gemini model listed, using default"
                    );
                    DEFAULT_GEMINI_MODEL.to_string()
                }
            },
            Err(e) => {
                tracing::error!("Error listing models: {}", e);
                DEFAULT_GEMINI_MODEL.to_string()
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, CoreError> {
        let url = format!("{}/v1beta/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                CoreError::ExternalServiceError(format!("LLM API error: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            return Err(CoreError::ExternalServiceError(format!(
                "model listing returned {}",
                response.status()
            )));
        }

        let list: ModelList = response.json().await.map_err(|e| {
            CoreError::ExternalServiceError(format!(
                "Failed to parse model list: {}",
                e.without_url()
            ))
        })?;

        Ok(list.models.into_iter().map(|m| m.name).collect())
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, CoreError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model_name
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // the URL carries the API key
                let e = e.without_url();
                tracing::error!("Gemini API request failed: {}", e);
                CoreError::ExternalServiceError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to parse Gemini response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        response_text(gemini_response)
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }
}

/// Text parts of the first candidate, joined. `None` when there is no text.
fn response_text(response: GeminiResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .filter(|text| !text.is_empty())
}

impl LLMClient for GeminiLLMClient {
    async fn generate_with_image(
        &self,
        prompt: String,
        image_data: Vec<u8>,
        mime_type: String,
        options: GenerationOptions,
    ) -> Result<String, CoreError> {
        let base64_image = general_purpose::STANDARD.encode(&image_data);

        let request = GeminiRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type,
                            data: base64_image,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig::from_options(options),
        };

        self.call_gemini_api(request).await
    }

    async fn generate_with_text(
        &self,
        prompt: String,
        options: GenerationOptions,
    ) -> Result<String, CoreError> {
        let request = GeminiRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text { text: prompt }],
            }],
            generation_config: GenerationConfig::from_options(options),
        };

        self.call_gemini_api(request).await
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}
