use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::{AnalysisOutcome, FoodCategory},
        value_objects::{AnalyzeFoodInput, GenerationOptions},
    },
};

/// Text and vision completion capability of an LLM provider
pub trait LLMClient: Send + Sync {
    fn generate_with_image(
        &self,
        prompt: String,
        image_data: Vec<u8>,
        mime_type: String,
        options: GenerationOptions,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn generate_with_text(
        &self,
        prompt: String,
        options: GenerationOptions,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Model identifier used for every call of this client.
    fn model_name(&self) -> String;
}

/// Service trait for food analysis business logic
pub trait FoodAnalysisService: Send + Sync {
    /// Resolve, classify and analyze one query.
    fn analyze_food(
        &self,
        input: AnalyzeFoodInput,
    ) -> impl Future<Output = Result<AnalysisOutcome, CoreError>> + Send;

    /// Best-guess product name for an image; never fails.
    fn recognize_product(
        &self,
        image_data: Vec<u8>,
        mime_type: String,
    ) -> impl Future<Output = String> + Send;

    /// Bucket a query into a food category; never fails.
    fn classify(&self, query: String) -> impl Future<Output = FoodCategory> + Send;
}
