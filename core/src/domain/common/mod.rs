use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

pub mod entities;
pub mod services;

#[derive(Clone, Debug)]
pub struct IncognitoConfig {
    pub llm: LLMConfig,
    pub product_database: ProductDatabaseConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LLMProvider {
    #[default]
    Gemini,
    OpenAi,
}

impl fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LLMProvider::Gemini),
            "openai" | "openai_compat" => Ok(LLMProvider::OpenAi),
            other => Err(format!("unknown LLM provider: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub gemini_api_key: String,
    /// Explicit model; when absent the model is discovered from the model list.
    pub gemini_model: Option<String>,
    pub gemini_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ProductDatabaseConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AnalysisConfig {
    /// Validate LLM verdicts against the typed schema instead of only
    /// checking that they parse as a JSON object.
    pub strict_schema: bool,
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, now.timestamp_subsec_nanos());

    (now, timestamp)
}

pub fn generate_uuid_v7() -> Uuid {
    let (_, timestamp) = generate_timestamp();
    Uuid::new_v7(timestamp)
}
