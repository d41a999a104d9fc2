use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, Default)]
pub struct AnalyzeFoodInput {
    pub product_name: Option<String>,
    pub image: Option<UploadedImage>,
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl UploadedImage {
    pub fn new(data: Vec<u8>, mime_type: Option<String>, file_name: Option<String>) -> Self {
        Self {
            data,
            mime_type: mime_type
                .filter(|m| m.starts_with("image/"))
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME_TYPE.to_string()),
            file_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

/// Per-call generation settings passed to the LLM client.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationOptions {
    pub response_format: ResponseFormat,
    pub temperature: Option<f32>,
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationOptions {
    pub fn text() -> Self {
        Self::default()
    }

    pub fn deterministic() -> Self {
        Self {
            temperature: Some(0.0),
            ..Self::default()
        }
    }

    pub fn json(response_schema: Option<serde_json::Value>) -> Self {
        Self {
            response_format: ResponseFormat::Json,
            temperature: None,
            response_schema,
        }
    }
}
