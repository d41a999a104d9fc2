use serde_json::{Map, Value};
use tracing::{error, info, instrument, warn};

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    food_analysis::{
        entities::{
            AnalysisOutcome, AnalysisReport, FoodCategory, HealthVerdict, InputEcho,
            NaturalFoodEstimate, RejectedReport,
        },
        helpers::parse_json_object,
        ports::{FoodAnalysisService, LLMClient},
        prompts::{
            RECOGNITION_PROMPT, UNKNOWN_PRODUCT, classification_prompt, health_analysis_prompt,
            natural_food_prompt,
        },
        schema::{get_health_verdict_schema, get_natural_food_schema},
        value_objects::{AnalyzeFoodInput, GenerationOptions, InputType},
    },
    product::ports::ProductRepository,
};

impl<P, LLM> FoodAnalysisService for Service<P, LLM>
where
    P: ProductRepository,
    LLM: LLMClient,
{
    #[instrument(
        skip(self, input),
        fields(
            has_text = input.product_name.is_some(),
            has_image = input.image.is_some()
        )
    )]
    async fn analyze_food(&self, input: AnalyzeFoodInput) -> Result<AnalysisOutcome, CoreError> {
        // 1. Resolve the query: text wins, the image is only read when no text was sent
        let text = input
            .product_name
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let query = match (text, &input.image) {
            (Some(text), _) => text,
            (None, Some(image)) => {
                self.recognize_product(image.data.clone(), image.mime_type.clone())
                    .await
            }
            (None, None) => return Err(CoreError::MissingInput),
        };

        let input_image = input.image.as_ref().map(|image| {
            image
                .file_name
                .clone()
                .unwrap_or_else(|| "User Uploaded".to_string())
        });

        // 2. Classify
        let category = self.classify(query.clone()).await;
        info!(query = %query, category = %category, "query classified");

        let echo = InputEcho {
            product_name: query,
            input_type: if input.image.is_some() {
                InputType::Image
            } else {
                InputType::Text
            },
            image_provided: input.image.is_some(),
            category,
        };

        // 3. Branch
        match category {
            FoodCategory::PackagedFood => self.analyze_packaged(echo, input_image).await,
            FoodCategory::NaturalFood => self.analyze_natural(echo, input_image).await,
            FoodCategory::NonFood => Ok(AnalysisOutcome::Rejected(RejectedReport::non_food(
                echo,
            ))),
        }
    }

    async fn recognize_product(&self, image_data: Vec<u8>, mime_type: String) -> String {
        let result = self
            .llm_client
            .generate_with_image(
                RECOGNITION_PROMPT.to_string(),
                image_data,
                mime_type,
                GenerationOptions::text(),
            )
            .await;

        match result {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(
                    model = %self.llm_client.model_name(),
                    "image recognition returned an empty answer"
                );
                UNKNOWN_PRODUCT.to_string()
            }
            Err(e) => {
                warn!(
                    model = %self.llm_client.model_name(),
                    error = %e,
                    "image recognition failed"
                );
                UNKNOWN_PRODUCT.to_string()
            }
        }
    }

    async fn classify(&self, query: String) -> FoodCategory {
        let result = self
            .llm_client
            .generate_with_text(
                classification_prompt(&query),
                GenerationOptions::deterministic(),
            )
            .await;

        match result {
            Ok(answer) => FoodCategory::from_classifier_output(&answer),
            Err(e) => {
                warn!(query = %query, error = %e, "category check failed, assuming packaged food");
                FoodCategory::PackagedFood
            }
        }
    }
}

impl<P, LLM> Service<P, LLM>
where
    P: ProductRepository,
    LLM: LLMClient,
{
    async fn analyze_packaged(
        &self,
        echo: InputEcho,
        input_image: Option<String>,
    ) -> Result<AnalysisOutcome, CoreError> {
        let product = match self
            .product_repository
            .search_product(echo.product_name.clone())
            .await
        {
            Ok(product) => product,
            Err(e) => {
                warn!(query = %echo.product_name, error = %e, "product lookup failed");
                None
            }
        }
        .ok_or(CoreError::ProductNotFound)?;

        let schema = self
            .analysis
            .strict_schema
            .then(get_health_verdict_schema);
        let verdict = self
            .generate_json(health_analysis_prompt(&product, &echo.product_name), schema)
            .await?;

        if self.analysis.strict_schema {
            HealthVerdict::from_json_object(&verdict)?;
        }

        Ok(AnalysisOutcome::Report(Box::new(AnalysisReport::packaged(
            echo,
            &product,
            verdict,
            input_image,
        ))))
    }

    async fn analyze_natural(
        &self,
        echo: InputEcho,
        input_image: Option<String>,
    ) -> Result<AnalysisOutcome, CoreError> {
        let schema = self.analysis.strict_schema.then(get_natural_food_schema);
        let raw = self
            .generate_json(natural_food_prompt(&echo.product_name), schema)
            .await?;
        let estimate = NaturalFoodEstimate::from_json_object(raw);

        if self.analysis.strict_schema {
            HealthVerdict::from_json_object(&estimate.analysis)?;
        }

        Ok(AnalysisOutcome::Report(Box::new(AnalysisReport::natural(
            echo,
            estimate,
            input_image,
        ))))
    }

    /// One JSON-mode call. Transport and parse failures both become
    /// `GenerationFailed`.
    async fn generate_json(
        &self,
        prompt: String,
        schema: Option<Value>,
    ) -> Result<Map<String, Value>, CoreError> {
        let raw = self
            .llm_client
            .generate_with_text(prompt, GenerationOptions::json(schema))
            .await
            .map_err(|e| {
                error!(model = %self.llm_client.model_name(), error = %e, "AI generation failed");
                CoreError::GenerationFailed(e.to_string())
            })?;

        parse_json_object(&raw).inspect_err(|e| {
            error!(model = %self.llm_client.model_name(), error = %e, "AI returned unusable JSON");
        })
    }
}
