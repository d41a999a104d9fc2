use crate::{
    domain::{
        common::{IncognitoConfig, entities::app_errors::CoreError, services::Service},
        food_analysis::ports::LLMClient,
    },
    infrastructure::{llm::AnyLLMClient, product::OpenFoodFactsRepository},
};

pub type IncognitoService = Service<OpenFoodFactsRepository, AnyLLMClient>;

/// Wire the adapters together. Model discovery happens here, once per process.
pub async fn create_service(config: IncognitoConfig) -> Result<IncognitoService, CoreError> {
    let product_repository = OpenFoodFactsRepository::new(&config.product_database)?;
    let llm_client = AnyLLMClient::from_config(&config.llm).await?;

    tracing::info!(
        provider = %llm_client.provider(),
        model = %llm_client.model_name(),
        strict_schema = config.analysis.strict_schema,
        "food analysis service ready"
    );

    Ok(Service::new(product_repository, llm_client, config.analysis))
}
