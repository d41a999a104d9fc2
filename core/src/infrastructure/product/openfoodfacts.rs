use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    domain::{
        common::{ProductDatabaseConfig, entities::app_errors::CoreError},
        product::{entities::ProductRecord, ports::ProductRepository},
    },
    infrastructure::llm::gemini_client::build_http_client,
};

pub const DEFAULT_OPENFOODFACTS_BASE_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_USER_AGENT: &str = "IncognitoHealthAI/1.0";

#[derive(Debug, Clone)]
pub struct OpenFoodFactsRepository {
    base_url: String,
    user_agent: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<ProductRecord>,
}

impl OpenFoodFactsRepository {
    pub fn new(config: &ProductDatabaseConfig) -> Result<Self, CoreError> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            client: build_http_client(config.timeout_secs)?,
        })
    }
}

impl ProductRepository for OpenFoodFactsRepository {
    #[instrument(skip(self))]
    async fn search_product(&self, query: String) -> Result<Option<ProductRecord>, CoreError> {
        let url = format!("{}/cgi/search.pl", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .query(&[
                ("search_terms", query.as_str()),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", "1"),
            ])
            .send()
            .await
            .map_err(|e| {
                CoreError::ExternalServiceError(format!("OpenFoodFacts request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(CoreError::ExternalServiceError(format!(
                "OpenFoodFacts returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            CoreError::ExternalServiceError(format!("Failed to parse OpenFoodFacts response: {}", e))
        })?;

        Ok(body.products.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_first_product() {
        let body: SearchResponse = serde_json::from_value(json!({
            "count": 2,
            "page_size": 1,
            "products": [
                { "product_name": "Horlicks", "code": "1" },
                { "product_name": "Boost", "code": "2" }
            ]
        }))
        .unwrap();

        let first = body.products.into_iter().next().unwrap();
        assert_eq!(first.product_name.as_deref(), Some("Horlicks"));
    }

    #[test]
    fn test_search_hit_with_null_tags_is_still_found() {
        let body: SearchResponse = serde_json::from_value(json!({
            "count": 1,
            "products": [{
                "product_name": "Horlicks",
                "labels_tags": null,
                "additives_tags": null,
                "categories_tags": null,
                "nutriments": { "salt_100g": 1.2 }
            }]
        }))
        .unwrap();

        let product = body.products.into_iter().next().unwrap();
        assert_eq!(product.product_name.as_deref(), Some("Horlicks"));
        assert!(product.labels_tags.is_empty());
        assert_eq!(product.nutriments.salt_100g, Some(1.2));
    }

    #[test]
    fn test_search_response_without_products() {
        let body: SearchResponse = serde_json::from_value(json!({ "count": 0 })).unwrap();
        assert!(body.products.is_empty());
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let repository = OpenFoodFactsRepository::new(&ProductDatabaseConfig {
            base_url: "https://world.openfoodfacts.org/".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 20,
        })
        .unwrap();

        assert_eq!(repository.base_url, DEFAULT_OPENFOODFACTS_BASE_URL);
    }
}
