pub mod gemini_client;
pub mod openai_client;

use crate::domain::{
    common::{LLMConfig, LLMProvider, entities::app_errors::CoreError},
    food_analysis::{ports::LLMClient, value_objects::GenerationOptions},
};

pub use gemini_client::GeminiLLMClient;
pub use openai_client::OpenAiLLMClient;

/// The configured LLM provider.
#[derive(Debug, Clone)]
pub enum AnyLLMClient {
    Gemini(GeminiLLMClient),
    OpenAi(OpenAiLLMClient),
}

impl AnyLLMClient {
    /// Build the client for the configured provider. For Gemini without an
    /// explicit model the model list is queried once here.
    pub async fn from_config(config: &LLMConfig) -> Result<Self, CoreError> {
        match config.provider {
            LLMProvider::Gemini => {
                if config.gemini_api_key.trim().is_empty() {
                    return Err(CoreError::InvalidConfiguration(
                        "GOOGLE_API_KEY is required for the gemini provider".to_string(),
                    ));
                }

                let client = match &config.gemini_model {
                    Some(model) => GeminiLLMClient::new(
                        config.gemini_api_key.clone(),
                        model.clone(),
                        config.gemini_base_url.clone(),
                        config.timeout_secs,
                    )?,
                    None => {
                        GeminiLLMClient::discover(
                            config.gemini_api_key.clone(),
                            config.gemini_base_url.clone(),
                            config.timeout_secs,
                        )
                        .await?
                    }
                };
                Ok(AnyLLMClient::Gemini(client))
            }
            LLMProvider::OpenAi => Ok(AnyLLMClient::OpenAi(OpenAiLLMClient::new(
                config.openai_api_key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
                config.timeout_secs,
            )?)),
        }
    }

    pub fn provider(&self) -> LLMProvider {
        match self {
            AnyLLMClient::Gemini(_) => LLMProvider::Gemini,
            AnyLLMClient::OpenAi(_) => LLMProvider::OpenAi,
        }
    }
}

impl LLMClient for AnyLLMClient {
    async fn generate_with_image(
        &self,
        prompt: String,
        image_data: Vec<u8>,
        mime_type: String,
        options: GenerationOptions,
    ) -> Result<String, CoreError> {
        match self {
            AnyLLMClient::Gemini(client) => {
                client
                    .generate_with_image(prompt, image_data, mime_type, options)
                    .await
            }
            AnyLLMClient::OpenAi(client) => {
                client
                    .generate_with_image(prompt, image_data, mime_type, options)
                    .await
            }
        }
    }

    async fn generate_with_text(
        &self,
        prompt: String,
        options: GenerationOptions,
    ) -> Result<String, CoreError> {
        match self {
            AnyLLMClient::Gemini(client) => client.generate_with_text(prompt, options).await,
            AnyLLMClient::OpenAi(client) => client.generate_with_text(prompt, options).await,
        }
    }

    fn model_name(&self) -> String {
        match self {
            AnyLLMClient::Gemini(client) => client.model_name(),
            AnyLLMClient::OpenAi(client) => client.model_name(),
        }
    }
}
